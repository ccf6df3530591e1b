use dioxus::prelude::*;

const FIELD_CLASS: &str = "bg-white border border-neutral-300 rounded px-3 py-2 text-sm text-neutral-800 outline-none font-[inherit] focus:border-primary-500 focus:shadow-[0_0_0_1px_var(--color-primary-500)]";

#[component]
pub fn Input(
    #[props(default)] id: String,
    #[props(default)] class: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] placeholder: String,
    #[props(default)] value: String,
    #[props(default)] disabled: bool,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    let kind = r#type;
    rsx! {
        input {
            id,
            class: "{FIELD_CLASS} {class}",
            r#type: kind,
            placeholder,
            value,
            disabled,
            oninput: move |evt| {
                if let Some(handler) = oninput {
                    handler.call(evt);
                }
            },
        }
    }
}

#[component]
pub fn TextArea(
    #[props(default)] id: String,
    #[props(default)] class: String,
    #[props(default)] placeholder: String,
    #[props(default)] value: String,
    #[props(default = 4)] rows: u32,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    rsx! {
        textarea {
            id,
            class: "{FIELD_CLASS} resize-y {class}",
            placeholder,
            rows: "{rows}",
            value,
            oninput: move |evt| {
                if let Some(handler) = oninput {
                    handler.call(evt);
                }
            },
        }
    }
}

#[component]
pub fn Label(#[props(default)] html_for: String, children: Element) -> Element {
    rsx! {
        label {
            r#for: html_for,
            class: "block text-sm font-medium text-neutral-700",
            {children}
        }
    }
}

/// A labelled input, the common shape of every form row.
#[component]
pub fn Field(
    id: String,
    label: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] placeholder: String,
    value: String,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        div {
            class: "flex flex-col gap-1.5",
            Label { html_for: id.clone(), "{label}" }
            Input {
                id,
                class: "w-full",
                r#type: r#type,
                placeholder,
                value,
                oninput: move |evt: FormEvent| oninput.call(evt.value()),
            }
        }
    }
}
