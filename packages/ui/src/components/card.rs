use dioxus::prelude::*;

#[component]
pub fn Card(#[props(default)] class: String, children: Element) -> Element {
    rsx! {
        div {
            class: "bg-white border border-neutral-200 rounded-lg shadow-sm p-6 {class}",
            {children}
        }
    }
}

/// Headline number with a caption, as used on the admin overview.
#[component]
pub fn StatCard(label: String, value: usize, icon: Element) -> Element {
    rsx! {
        Card {
            class: "flex items-center justify-between",
            div {
                p { class: "m-0 text-sm text-neutral-500", "{label}" }
                p { class: "m-0 mt-1 text-2xl font-bold text-neutral-800", "{value}" }
            }
            div { class: "text-primary-600", {icon} }
        }
    }
}

#[component]
pub fn Spinner(#[props(default)] class: String) -> Element {
    rsx! {
        div {
            class: "w-8 h-8 border-4 border-primary-200 border-t-primary-600 rounded-full animate-spin {class}",
        }
    }
}
