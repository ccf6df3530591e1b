use dioxus::prelude::*;
use ui::views::ResetPassword;

use crate::Route;

#[component]
pub fn ResetPasswordPage() -> Element {
    let nav = use_navigator();
    rsx! {
        ResetPassword {
            on_done: move |_| {
                nav.replace(Route::home());
            },
        }
    }
}
