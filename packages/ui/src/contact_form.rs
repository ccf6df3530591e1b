use dioxus::prelude::*;
use session::{ConsultationGate, ConsultationRequest, PendingPayment, Submission};

use crate::components::{Button, ButtonVariant, Field, Label, TextArea};
use crate::payment_prompt::PaymentPrompt;
use crate::toast::{show_toast, use_toasts, ToastKind};
use crate::{use_session_store, use_settings};

/// Consultation request form. First requests go straight through; returning clients
/// get the fee prompt with their message carried over.
#[component]
pub fn ContactForm() -> Element {
    let store = use_session_store();
    let settings = use_settings();
    let mut toasts = use_toasts();

    let mut form = use_signal(ConsultationRequest::default);
    let mut pending = use_signal(|| Option::<PendingPayment>::None);
    let mut submitting = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let gate = ConsultationGate::new(store.data().clone()).with_fee(settings.fee());
        spawn(async move {
            submitting.set(true);
            let result = gate.submit(&form()).await;
            submitting.set(false);
            match result {
                Ok(Submission::Accepted) => {
                    show_toast(
                        &mut toasts,
                        ToastKind::Success,
                        "Message sent!",
                        "We'll get back to you within 24 hours.",
                    );
                    form.set(ConsultationRequest::default());
                }
                Ok(Submission::PaymentRequired(payment)) => pending.set(Some(payment)),
                Err(e) => show_toast(&mut toasts, ToastKind::Error, "Could not send message", &e.to_string()),
            }
        });
    };

    rsx! {
        form {
            onsubmit: handle_submit,
            class: "flex flex-col gap-4",
            div {
                class: "grid grid-cols-1 sm:grid-cols-2 gap-4",
                Field {
                    id: "contact-first-name",
                    label: "First Name",
                    value: form().first_name,
                    oninput: move |v: String| form.write().first_name = v,
                }
                Field {
                    id: "contact-last-name",
                    label: "Last Name",
                    value: form().last_name,
                    oninput: move |v: String| form.write().last_name = v,
                }
            }
            div {
                class: "grid grid-cols-1 sm:grid-cols-2 gap-4",
                Field {
                    id: "contact-email",
                    label: "Email",
                    r#type: "email",
                    value: form().email,
                    oninput: move |v: String| form.write().email = v,
                }
                Field {
                    id: "contact-phone",
                    label: "Phone",
                    r#type: "tel",
                    value: form().phone,
                    oninput: move |v: String| form.write().phone = v,
                }
            }
            Field {
                id: "contact-subject",
                label: "Subject",
                placeholder: "What is your legal matter about?",
                value: form().subject,
                oninput: move |v: String| form.write().subject = v,
            }
            div {
                class: "flex flex-col gap-1.5",
                Label { html_for: "contact-message", "Message" }
                TextArea {
                    id: "contact-message",
                    class: "w-full",
                    rows: 5,
                    placeholder: "Describe your situation",
                    value: form().message,
                    oninput: move |evt: FormEvent| form.write().message = evt.value(),
                }
            }
            Button {
                variant: ButtonVariant::Primary,
                class: "w-full",
                r#type: "submit",
                disabled: submitting(),
                if submitting() { "Sending..." } else { "Send Message" }
            }
        }

        if let Some(payment) = pending() {
            PaymentPrompt {
                pending: payment,
                on_paid: move |_| {
                    pending.set(None);
                    form.set(ConsultationRequest::default());
                },
                on_close: move |_| pending.set(None),
            }
        }
    }
}
