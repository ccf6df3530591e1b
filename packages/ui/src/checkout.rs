//! Razorpay checkout bridge.
//!
//! In the browser the hosted `checkout.js` is loaded on first use and the widget's
//! callbacks are turned into a single awaited result. Elsewhere checkout is unavailable.

use session::{CheckoutOptions, CheckoutWidget, PaymentConfirmation, SessionError};
use tokio::sync::oneshot;

#[derive(Clone, Copy, Debug, Default)]
pub struct RazorpayCheckout;

type Outcome = Result<PaymentConfirmation, SessionError>;

/// Folds the widget's callbacks into one result. A failed attempt keeps the modal
/// open for a retry, so it is only remembered; the success handler or the user
/// closing the modal decides the outcome. Later callbacks are ignored.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
struct Settlement {
    tx: Option<oneshot::Sender<Outcome>>,
    last_failure: Option<String>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl Settlement {
    fn new(tx: oneshot::Sender<Outcome>) -> Self {
        Self {
            tx: Some(tx),
            last_failure: None,
        }
    }

    fn attempt_failed(&mut self, message: String) {
        self.last_failure = Some(message);
    }

    fn succeeded(&mut self, outcome: Outcome) {
        self.settle(outcome);
    }

    fn dismissed(&mut self) {
        let message = self
            .last_failure
            .take()
            .unwrap_or_else(|| "Payment cancelled".to_string());
        self.settle(Err(SessionError::Payment(message)));
    }

    fn settle(&mut self, outcome: Outcome) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(outcome);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl CheckoutWidget for RazorpayCheckout {
    async fn open(&self, _options: CheckoutOptions) -> Result<PaymentConfirmation, SessionError> {
        Err(SessionError::Payment(
            "checkout is only available in the browser".into(),
        ))
    }
}

#[cfg(target_arch = "wasm32")]
impl CheckoutWidget for RazorpayCheckout {
    async fn open(&self, options: CheckoutOptions) -> Result<PaymentConfirmation, SessionError> {
        browser::open(options).await
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde::Deserialize;
    use session::{CheckoutOptions, PaymentConfirmation, SessionError};
    use tokio::sync::oneshot;

    use super::{Outcome, Settlement};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    const CHECKOUT_SCRIPT: &str = "https://checkout.razorpay.com/v1/checkout.js";

    #[wasm_bindgen]
    extern "C" {
        type Razorpay;

        #[wasm_bindgen(constructor, catch)]
        fn new(options: &JsValue) -> Result<Razorpay, JsValue>;

        #[wasm_bindgen(method)]
        fn open(this: &Razorpay);

        #[wasm_bindgen(method)]
        fn on(this: &Razorpay, event: &str, callback: &js_sys::Function);
    }

    #[derive(Deserialize)]
    struct SuccessResponse {
        razorpay_payment_id: String,
    }

    #[derive(Deserialize)]
    struct FailureResponse {
        error: FailureDetail,
    }

    #[derive(Deserialize)]
    struct FailureDetail {
        description: Option<String>,
    }

    fn failed(message: impl Into<String>) -> SessionError {
        SessionError::Payment(message.into())
    }

    /// Inject `checkout.js` unless `window.Razorpay` already exists.
    async fn ensure_script() -> Result<(), SessionError> {
        let window = web_sys::window().ok_or_else(|| failed("no window"))?;
        if js_sys::Reflect::has(&window, &JsValue::from_str("Razorpay")).unwrap_or(false) {
            return Ok(());
        }

        let document = window.document().ok_or_else(|| failed("no document"))?;
        let script: web_sys::HtmlScriptElement = document
            .create_element("script")
            .map_err(|_| failed("could not create script element"))?
            .unchecked_into();
        script.set_src(CHECKOUT_SCRIPT);

        let (tx, rx) = oneshot::channel::<bool>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let on_load = {
            let tx = tx.clone();
            Closure::<dyn FnMut()>::new(move || {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(true);
                }
            })
        };
        let on_error = Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(false);
            }
        });
        script.set_onload(Some(on_load.as_ref().unchecked_ref()));
        script.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        document
            .head()
            .ok_or_else(|| failed("no document head"))?
            .append_child(&script)
            .map_err(|_| failed("could not load checkout"))?;

        match rx.await {
            Ok(true) => Ok(()),
            _ => Err(failed("Could not load the payment gateway. Please try again.")),
        }
    }

    pub async fn open(options: CheckoutOptions) -> Outcome {
        ensure_script().await?;

        let (tx, rx) = oneshot::channel::<Outcome>();
        let settlement = Rc::new(RefCell::new(Settlement::new(tx)));

        // Ownership of each callback passes to JS, since the widget may still call
        // them after this future has resolved.
        let on_success = {
            let settlement = settlement.clone();
            Closure::<dyn FnMut(JsValue)>::new(move |response: JsValue| {
                let outcome = serde_wasm_bindgen::from_value::<SuccessResponse>(response)
                    .map(|r| PaymentConfirmation {
                        payment_id: r.razorpay_payment_id,
                    })
                    .map_err(|e| failed(e.to_string()));
                settlement.borrow_mut().succeeded(outcome);
            })
            .into_js_value()
        };
        let on_failure = {
            let settlement = settlement.clone();
            Closure::<dyn FnMut(JsValue)>::new(move |response: JsValue| {
                let message = serde_wasm_bindgen::from_value::<FailureResponse>(response)
                    .ok()
                    .and_then(|r| r.error.description)
                    .unwrap_or_else(|| "Payment was not completed".to_string());
                tracing::warn!("payment attempt failed: {}", message);
                settlement.borrow_mut().attempt_failed(message);
            })
            .into_js_value()
        };
        let on_dismiss = Closure::<dyn FnMut()>::new(move || {
            settlement.borrow_mut().dismissed();
        })
        .into_js_value();

        let js_options = serde_wasm_bindgen::to_value(&options).map_err(|e| failed(e.to_string()))?;
        let modal = js_sys::Object::new();
        let set = |target: &JsValue, key: &str, value: &JsValue| {
            js_sys::Reflect::set(target, &JsValue::from_str(key), value)
                .map(|_| ())
                .map_err(|_| failed("could not prepare checkout"))
        };
        set(&js_options, "handler", &on_success)?;
        set(&modal, "ondismiss", &on_dismiss)?;
        set(&js_options, "modal", &modal)?;

        let widget = Razorpay::new(&js_options).map_err(|_| failed("could not open checkout"))?;
        widget.on("payment.failed", on_failure.unchecked_ref());
        widget.open();

        rx.await.unwrap_or_else(|_| Err(failed("Payment cancelled")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirmed(payment_id: &str) -> Outcome {
        Ok(PaymentConfirmation {
            payment_id: payment_id.to_string(),
        })
    }

    #[test]
    fn test_failed_attempt_then_retry_success_is_confirmed() {
        let (tx, mut rx) = oneshot::channel();
        let mut settlement = Settlement::new(tx);

        settlement.attempt_failed("Card declined".into());
        assert!(rx.try_recv().is_err());

        settlement.succeeded(confirmed("pay_retry"));
        assert_eq!(rx.try_recv().ok(), Some(confirmed("pay_retry")));
    }

    #[test]
    fn test_closing_after_failure_reports_the_failure() {
        let (tx, mut rx) = oneshot::channel();
        let mut settlement = Settlement::new(tx);

        settlement.attempt_failed("Card declined".into());
        settlement.dismissed();
        assert_eq!(
            rx.try_recv().ok(),
            Some(Err(SessionError::Payment("Card declined".into())))
        );
    }

    #[test]
    fn test_closing_without_attempt_is_a_cancellation() {
        let (tx, mut rx) = oneshot::channel();
        let mut settlement = Settlement::new(tx);

        settlement.dismissed();
        assert_eq!(
            rx.try_recv().ok(),
            Some(Err(SessionError::Payment("Payment cancelled".into())))
        );
    }

    #[test]
    fn test_callbacks_after_success_are_ignored() {
        let (tx, mut rx) = oneshot::channel();
        let mut settlement = Settlement::new(tx);

        settlement.succeeded(confirmed("pay_1"));
        settlement.attempt_failed("late".into());
        settlement.dismissed();
        assert_eq!(rx.try_recv().ok(), Some(confirmed("pay_1")));
    }
}
