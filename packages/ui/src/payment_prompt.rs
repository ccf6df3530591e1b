use dioxus::prelude::*;
use session::{ConsultationGate, PendingPayment};

use crate::checkout::RazorpayCheckout;
use crate::components::{Button, ButtonVariant};
use crate::icons::{FaCreditCard, FaShieldHalved};
use crate::toast::{show_toast, use_toasts, ToastKind};
use crate::views::ModalOverlay;
use crate::{use_session_store, use_settings, Icon};

/// Fee prompt for a returning client. `on_paid` fires once the request is stored.
#[component]
pub fn PaymentPrompt(
    pending: PendingPayment,
    on_paid: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let store = use_session_store();
    let settings = use_settings();
    let mut toasts = use_toasts();
    let mut paying = use_signal(|| false);

    let amount = pending.fee.display();
    let client_name = pending.request.full_name();

    let handle_pay = {
        let pending = pending.clone();
        move |_: MouseEvent| {
            let gate = ConsultationGate::new(store.data().clone()).with_fee(pending.fee.clone());
            let pending = pending.clone();
            let key = settings.razorpay.key_id.clone();
            spawn(async move {
                paying.set(true);
                let result = gate.pay_and_submit(&RazorpayCheckout, &pending, &key).await;
                paying.set(false);
                match result {
                    Ok(_) => {
                        show_toast(
                            &mut toasts,
                            ToastKind::Success,
                            "Payment successful!",
                            "Your consultation request has been submitted.",
                        );
                        on_paid.call(());
                    }
                    Err(e) => {
                        tracing::warn!("checkout did not complete: {}", e);
                        show_toast(&mut toasts, ToastKind::Error, "Payment failed", &e.to_string());
                    }
                }
            });
        }
    };

    rsx! {
        ModalOverlay {
            on_close: move |_| on_close.call(()),
            div {
                class: "p-6 flex flex-col gap-4",
                div {
                    class: "flex items-center gap-3",
                    div {
                        class: "p-2 rounded-full bg-primary-50 text-primary-600",
                        Icon { width: 18, height: 18, icon: FaCreditCard }
                    }
                    h2 { class: "m-0 text-lg font-semibold text-neutral-800", "Returning Client Consultation" }
                }
                p {
                    class: "m-0 text-sm text-neutral-600",
                    "Welcome back! Your first consultation request was free. Follow-up requests carry a one-time fee of "
                    strong { "{amount}" }
                    "."
                }
                div {
                    class: "p-3 rounded bg-neutral-50 text-sm text-neutral-700",
                    p { class: "m-0 font-medium", "{pending.request.subject}" }
                    p { class: "m-0 mt-1 text-neutral-500", "{client_name} · {pending.request.email}" }
                }
                p {
                    class: "m-0 flex items-center gap-1.5 text-xs text-neutral-500",
                    Icon { width: 12, height: 12, icon: FaShieldHalved }
                    "Payments are processed securely by Razorpay."
                }
                div {
                    class: "flex gap-2",
                    Button {
                        variant: ButtonVariant::Primary,
                        class: "flex-1",
                        disabled: paying(),
                        onclick: handle_pay,
                        if paying() { "Processing..." } else { "Pay {amount}" }
                    }
                    Button {
                        variant: ButtonVariant::Outline,
                        disabled: paying(),
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                }
            }
        }
    }
}
