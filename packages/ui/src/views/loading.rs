use dioxus::prelude::*;

use crate::components::Spinner;

/// Neutral placeholder while the session resolves. Shows no role-specific chrome.
#[component]
pub fn LoadingScreen() -> Element {
    rsx! {
        div {
            class: "flex items-center justify-center min-h-screen bg-white",
            Spinner {}
        }
    }
}
