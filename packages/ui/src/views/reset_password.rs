use std::time::Duration;

use dioxus::prelude::*;
use session::forms::{NewPasswordForm, RecoveryFragment};

use crate::components::{Button, ButtonVariant, Card, Field, Spinner};
use crate::icons::{FaCircleCheck, FaTriangleExclamation};
use crate::toast::{show_toast, sleep, use_toasts, ToastKind};
use crate::{use_session_store, Icon};

#[derive(Clone, Copy, PartialEq)]
enum Stage {
    Verifying,
    Invalid,
    Ready,
    Done,
}

/// Landing page for the emailed reset link. `on_done` fires a few seconds after the
/// password is changed.
#[component]
pub fn ResetPassword(on_done: EventHandler<()>) -> Element {
    let store = use_session_store();
    let mut toasts = use_toasts();
    let mut stage = use_signal(|| Stage::Verifying);
    let mut form = use_signal(NewPasswordForm::default);
    let mut saving = use_signal(|| false);

    let recover_store = store.clone();
    use_hook(move || {
        spawn(async move {
            let Some(fragment) = location_fragment().as_deref().and_then(RecoveryFragment::parse)
            else {
                // A session installed by an earlier visit is still good enough.
                let state = recover_store.wait_until_loaded().await;
                stage.set(if state.is_signed_in() { Stage::Ready } else { Stage::Invalid });
                return;
            };
            clear_location_fragment();
            match recover_store
                .recover_session(&fragment.access_token, &fragment.refresh_token)
                .await
            {
                Ok(()) => stage.set(Stage::Ready),
                Err(e) => {
                    tracing::warn!("recovery link rejected: {e}");
                    stage.set(Stage::Invalid);
                }
            }
        });
    });

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let store = store.clone();
        spawn(async move {
            let current = form();
            if let Err(e) = current.validate() {
                show_toast(&mut toasts, ToastKind::Error, "Error", &e.to_string());
                return;
            }
            saving.set(true);
            let result = store.update_password(&current.password).await;
            saving.set(false);
            match result {
                Ok(()) => {
                    stage.set(Stage::Done);
                    show_toast(
                        &mut toasts,
                        ToastKind::Success,
                        "Password updated!",
                        "Your password has been successfully reset.",
                    );
                    sleep(Duration::from_secs(3)).await;
                    on_done.call(());
                }
                Err(e) => show_toast(&mut toasts, ToastKind::Error, "Error", &e.to_string()),
            }
        });
    };

    rsx! {
        div {
            class: "flex items-center justify-center min-h-screen bg-neutral-50 px-4",
            Card {
                class: "w-full max-w-md flex flex-col gap-4",
                h1 { class: "m-0 text-xl font-bold text-neutral-900 text-center", "Set New Password" }

                match stage() {
                    Stage::Verifying => rsx! {
                        div { class: "flex justify-center py-6", Spinner {} }
                    },
                    Stage::Invalid => rsx! {
                        div {
                            class: "flex flex-col items-center gap-3 text-center",
                            span { class: "text-red-600", Icon { width: 28, height: 28, icon: FaTriangleExclamation } }
                            p { class: "m-0 font-medium text-neutral-800", "Invalid or expired reset link" }
                            p { class: "m-0 text-sm text-neutral-600", "Please request a new password reset link." }
                            Button {
                                variant: ButtonVariant::Outline,
                                onclick: move |_| on_done.call(()),
                                "Back to Home"
                            }
                        }
                    },
                    Stage::Done => rsx! {
                        div {
                            class: "flex flex-col items-center gap-3 text-center",
                            span { class: "text-green-600", Icon { width: 28, height: 28, icon: FaCircleCheck } }
                            p { class: "m-0 font-medium text-neutral-800", "Password updated" }
                            p { class: "m-0 text-sm text-neutral-600", "Redirecting you to the home page..." }
                        }
                    },
                    Stage::Ready => rsx! {
                        form {
                            onsubmit: handle_submit,
                            class: "flex flex-col gap-4",
                            Field {
                                id: "reset-password",
                                label: "New Password",
                                r#type: "password",
                                placeholder: "At least 6 characters",
                                value: form().password,
                                oninput: move |v: String| form.write().password = v,
                            }
                            Field {
                                id: "reset-confirm",
                                label: "Confirm Password",
                                r#type: "password",
                                value: form().confirm_password,
                                oninput: move |v: String| form.write().confirm_password = v,
                            }
                            Button {
                                variant: ButtonVariant::Primary,
                                r#type: "submit",
                                disabled: saving(),
                                if saving() { "Updating..." } else { "Update Password" }
                            }
                        }
                    },
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn location_fragment() -> Option<String> {
    web_sys::window()?.location().hash().ok().filter(|hash| !hash.is_empty())
}

#[cfg(not(target_arch = "wasm32"))]
fn location_fragment() -> Option<String> {
    None
}

/// Drop the tokens from the address bar once they have been read.
#[cfg(target_arch = "wasm32")]
fn clear_location_fragment() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(path) = window.location().pathname() else {
        return;
    };
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn clear_location_fragment() {}
