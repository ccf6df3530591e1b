use dioxus::prelude::*;

/// A full-screen overlay that centers its children in a modal card.
/// Clicking the backdrop or pressing Escape triggers `on_close`.
#[component]
pub fn ModalOverlay(
    on_close: EventHandler<()>,
    #[props(default = "max-w-md".to_string())] width: String,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: "fixed inset-0 flex items-center justify-center bg-black/40 overflow-y-auto py-8",
            style: "z-index: 2000",
            tabindex: "-1",
            onclick: move |_| on_close.call(()),
            onkeydown: move |evt: Event<KeyboardData>| {
                if evt.key() == Key::Escape {
                    on_close.call(());
                }
            },
            div {
                class: "bg-white rounded-lg shadow-lg w-full mx-4 {width}",
                role: "dialog",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                {children}
            }
        }
    }
}
