use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
    Destructive,
}

impl ButtonVariant {
    fn class(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "bg-primary-600 text-white hover:bg-primary-700",
            ButtonVariant::Secondary => "bg-neutral-100 text-neutral-800 hover:bg-neutral-200",
            ButtonVariant::Outline => {
                "bg-white border border-neutral-300 text-neutral-800 hover:bg-neutral-50"
            }
            ButtonVariant::Ghost => "bg-transparent text-neutral-700 hover:bg-neutral-100",
            ButtonVariant::Destructive => "bg-red-600 text-white hover:bg-red-700",
        }
    }
}

#[component]
pub fn Button(
    #[props(default)] variant: ButtonVariant,
    #[props(default)] class: String,
    #[props(default = "button".to_string())] r#type: String,
    #[props(default)] disabled: bool,
    onclick: Option<EventHandler<MouseEvent>>,
    children: Element,
) -> Element {
    let kind = r#type;
    let variant_class = variant.class();
    rsx! {
        button {
            class: "inline-flex items-center justify-center gap-2 rounded px-4 py-2 text-sm font-medium cursor-pointer transition-colors disabled:opacity-50 disabled:cursor-not-allowed {variant_class} {class}",
            r#type: kind,
            disabled,
            onclick: move |evt| {
                if let Some(handler) = onclick {
                    handler.call(evt);
                }
            },
            {children}
        }
    }
}
