//! Sign-in / sign-up / forgot-password dialog.

use dioxus::prelude::*;
use session::forms::{AuthView, LoginForm, LoginIntent, SignUpForm};
use session::Role;

use crate::components::{Button, ButtonVariant, Field};
use crate::toast::{show_toast, use_toasts, ToastKind};
use crate::views::ModalOverlay;
use crate::{use_session_store, Icon};

#[component]
pub fn AuthDialog(
    #[props(default)] initial_view: AuthView,
    on_close: EventHandler<()>,
) -> Element {
    let store = use_session_store();
    let mut toasts = use_toasts();

    let mut view = use_signal(move || initial_view);
    let mut login = use_signal(LoginForm::default);
    let mut sign_up = use_signal(SignUpForm::default);
    let mut reset_email = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let mut switch_to = move |next: AuthView| {
        error.set(None);
        view.set(next);
    };

    let handle_login = {
        let store = store.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let store = store.clone();
            spawn(async move {
                let form = login();
                if let Err(e) = form.validate() {
                    error.set(Some(e.to_string()));
                    return;
                }
                error.set(None);
                loading.set(true);
                let result = store.sign_in(&form.email, &form.password).await;
                loading.set(false);
                match result {
                    Ok(()) => {
                        show_toast(&mut toasts, ToastKind::Success, "Welcome back!", "You have successfully logged in.");
                        on_close.call(());
                    }
                    Err(e) => show_toast(&mut toasts, ToastKind::Error, "Login failed", &e.to_string()),
                }
            });
        }
    };

    let handle_sign_up = {
        let store = store.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let store = store.clone();
            spawn(async move {
                let form = sign_up();
                if let Err(e) = form.validate() {
                    error.set(Some(e.to_string()));
                    return;
                }
                error.set(None);
                loading.set(true);
                let result = store
                    .sign_up(&form.email, &form.password, &form.full_name, form.role, Some(form.phone.clone()))
                    .await;
                loading.set(false);
                match result {
                    Ok(()) => {
                        show_toast(
                            &mut toasts,
                            ToastKind::Success,
                            "Account created!",
                            "Please check your email to verify your account.",
                        );
                        on_close.call(());
                    }
                    Err(e) => show_toast(&mut toasts, ToastKind::Error, "Sign up failed", &e.to_string()),
                }
            });
        }
    };

    let handle_reset = move |evt: FormEvent| {
        evt.prevent_default();
        let store = store.clone();
        spawn(async move {
            let email = reset_email();
            if email.trim().is_empty() || !email.contains('@') {
                error.set(Some("Please enter a valid email address".to_string()));
                return;
            }
            loading.set(true);
            let result = store.reset_password_for_email(&email).await;
            loading.set(false);
            match result {
                Ok(()) => {
                    show_toast(&mut toasts, ToastKind::Info, "Check your email", "We've sent you a password reset link.");
                    error.set(None);
                    reset_email.set(String::new());
                    view.set(AuthView::Login);
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    };

    let current = view();
    let title = current.title();

    rsx! {
        ModalOverlay {
            on_close: move |_| on_close.call(()),
            div {
                class: "p-6",
                div {
                    class: "flex items-center justify-between mb-5",
                    h2 { class: "m-0 text-lg font-semibold text-neutral-800", "{title}" }
                    button {
                        class: "bg-transparent border-none cursor-pointer text-neutral-500",
                        onclick: move |_| on_close.call(()),
                        Icon { width: 14, height: 14, icon: crate::icons::FaXmark }
                    }
                }

                if let Some(err) = error() {
                    div {
                        class: "mb-4 px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]",
                        "{err}"
                    }
                }

                match current {
                    AuthView::Login => rsx! {
                        form {
                            onsubmit: handle_login,
                            class: "flex flex-col gap-3",
                            div {
                                class: "grid grid-cols-2 gap-2",
                                IntentButton {
                                    label: "Client",
                                    active: login().intent == LoginIntent::Client,
                                    onclick: move |_| login.write().intent = LoginIntent::Client,
                                }
                                IntentButton {
                                    label: "Lawyer",
                                    active: login().intent == LoginIntent::Lawyer,
                                    onclick: move |_| login.write().intent = LoginIntent::Lawyer,
                                }
                            }
                            Field {
                                id: "login-email",
                                label: "Email",
                                r#type: "email",
                                placeholder: "you@example.com",
                                value: login().email,
                                oninput: move |v: String| login.write().email = v,
                            }
                            Field {
                                id: "login-password",
                                label: "Password",
                                r#type: "password",
                                value: login().password,
                                oninput: move |v: String| login.write().password = v,
                            }
                            button {
                                r#type: "button",
                                class: "self-end bg-transparent border-none p-0 text-sm text-primary-600 cursor-pointer",
                                onclick: move |_| switch_to(AuthView::ForgotPassword),
                                "Forgot password?"
                            }
                            Button {
                                variant: ButtonVariant::Primary,
                                class: "w-full",
                                r#type: "submit",
                                disabled: loading(),
                                if loading() { "Signing in..." } else { "Sign In" }
                            }
                            p {
                                class: "m-0 text-sm text-center text-neutral-600",
                                "Don't have an account? "
                                button {
                                    r#type: "button",
                                    class: "bg-transparent border-none p-0 text-primary-600 cursor-pointer",
                                    onclick: move |_| switch_to(AuthView::SignUp),
                                    "Sign up"
                                }
                            }
                        }
                    },
                    AuthView::SignUp => rsx! {
                        form {
                            onsubmit: handle_sign_up,
                            class: "flex flex-col gap-3",
                            div {
                                class: "grid grid-cols-2 gap-2",
                                IntentButton {
                                    label: "I need a lawyer",
                                    active: sign_up().role == Role::Client,
                                    onclick: move |_| sign_up.write().role = Role::Client,
                                }
                                IntentButton {
                                    label: "I am a lawyer",
                                    active: sign_up().role == Role::Lawyer,
                                    onclick: move |_| sign_up.write().role = Role::Lawyer,
                                }
                            }
                            Field {
                                id: "signup-name",
                                label: "Full Name",
                                value: sign_up().full_name,
                                oninput: move |v: String| sign_up.write().full_name = v,
                            }
                            Field {
                                id: "signup-email",
                                label: "Email",
                                r#type: "email",
                                value: sign_up().email,
                                oninput: move |v: String| sign_up.write().email = v,
                            }
                            Field {
                                id: "signup-phone",
                                label: "Phone",
                                r#type: "tel",
                                placeholder: "10-digit mobile number",
                                value: sign_up().phone,
                                oninput: move |v: String| sign_up.write().set_phone(&v),
                            }
                            Field {
                                id: "signup-password",
                                label: "Password",
                                r#type: "password",
                                placeholder: "At least 6 characters",
                                value: sign_up().password,
                                oninput: move |v: String| sign_up.write().password = v,
                            }
                            Button {
                                variant: ButtonVariant::Primary,
                                class: "w-full",
                                r#type: "submit",
                                disabled: loading(),
                                if loading() { "Creating account..." } else { "Create Account" }
                            }
                            p {
                                class: "m-0 text-sm text-center text-neutral-600",
                                "Already have an account? "
                                button {
                                    r#type: "button",
                                    class: "bg-transparent border-none p-0 text-primary-600 cursor-pointer",
                                    onclick: move |_| switch_to(AuthView::Login),
                                    "Sign in"
                                }
                            }
                        }
                    },
                    AuthView::ForgotPassword => rsx! {
                        form {
                            onsubmit: handle_reset,
                            class: "flex flex-col gap-3",
                            p {
                                class: "m-0 text-sm text-neutral-600",
                                "Enter your email and we'll send you a link to reset your password."
                            }
                            Field {
                                id: "reset-email",
                                label: "Email",
                                r#type: "email",
                                value: reset_email(),
                                oninput: move |v: String| reset_email.set(v),
                            }
                            Button {
                                variant: ButtonVariant::Primary,
                                class: "w-full",
                                r#type: "submit",
                                disabled: loading(),
                                if loading() { "Sending..." } else { "Send Reset Link" }
                            }
                            Button {
                                variant: ButtonVariant::Ghost,
                                class: "w-full",
                                onclick: move |_| switch_to(AuthView::Login),
                                "Back to sign in"
                            }
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn IntentButton(label: String, active: bool, onclick: EventHandler<MouseEvent>) -> Element {
    rsx! {
        Button {
            variant: if active { ButtonVariant::Primary } else { ButtonVariant::Outline },
            class: "w-full",
            onclick: move |evt| onclick.call(evt),
            "{label}"
        }
    }
}
