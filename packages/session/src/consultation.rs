//! # Consultation gate: returning-client fee for the contact form
//!
//! The first consultation request from an email address is free and stored right away.
//! Any later request from the same address (or from an address that already has a
//! registered profile) pauses on a one-time fee prompt. The prompt carries the exact
//! payload the visitor typed so nothing has to be re-entered after paying.
//!
//! ## Trust boundary
//!
//! Payment success is whatever the checkout widget reports in the browser. Records
//! stored after a paid flow are marked [`PaymentStatus::Unverified`]; confirming the
//! payment with the gateway has to happen server-side, outside this workspace.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::models::{ConsultationRecord, ConsultationRequest, PaymentStatus};
use crate::provider::DataStore;

/// Fee charged to returning clients, in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fee {
    pub amount_paise: u32,
    pub currency: String,
}

impl Default for Fee {
    fn default() -> Self {
        Self {
            amount_paise: 9900,
            currency: "INR".to_string(),
        }
    }
}

impl Fee {
    /// Human readable amount, e.g. `₹99`.
    pub fn display(&self) -> String {
        let rupees = self.amount_paise / 100;
        match self.amount_paise % 100 {
            0 => format!("₹{rupees}"),
            paise => format!("₹{rupees}.{paise:02}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Options handed to the checkout widget's `open` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    pub key: String,
    pub amount: u32,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub prefill: CheckoutPrefill,
}

/// What the widget's success callback reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub payment_id: String,
}

/// Third-party checkout. Resolves on the success callback, errors on the failure
/// callback or when the visitor dismisses it.
pub trait CheckoutWidget {
    fn open(
        &self,
        options: CheckoutOptions,
    ) -> impl Future<Output = Result<PaymentConfirmation, SessionError>>;
}

/// A gated submission waiting for payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPayment {
    pub request: ConsultationRequest,
    pub fee: Fee,
}

impl PendingPayment {
    pub fn checkout_options(&self, key: &str) -> CheckoutOptions {
        CheckoutOptions {
            key: key.to_string(),
            amount: self.fee.amount_paise,
            currency: self.fee.currency.clone(),
            name: "Unseen Lawyers".to_string(),
            description: "Returning Client Consultation".to_string(),
            prefill: CheckoutPrefill {
                name: self.request.full_name(),
                email: self.request.email.clone(),
                contact: self.request.phone.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Stored as a free first request.
    Accepted,
    PaymentRequired(PendingPayment),
}

/// Required contact form fields, with the email normalised for lookups.
pub fn validate_request(request: &ConsultationRequest) -> Result<ConsultationRequest, SessionError> {
    let mut request = request.clone();
    request.email = request.email.trim().to_lowercase();
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(SessionError::validation("Please enter your first and last name"));
    }
    if request.email.is_empty() || !request.email.contains('@') {
        return Err(SessionError::validation("Please enter a valid email address"));
    }
    if request.subject.trim().is_empty() || request.message.trim().is_empty() {
        return Err(SessionError::validation("Please add a subject and a message"));
    }
    Ok(request)
}

pub struct ConsultationGate<D> {
    data: D,
    fee: Fee,
}

impl<D: DataStore> ConsultationGate<D> {
    pub fn new(data: D) -> Self {
        Self {
            data,
            fee: Fee::default(),
        }
    }

    /// Builder method to override the returning-client fee.
    pub fn with_fee(mut self, fee: Fee) -> Self {
        self.fee = fee;
        self
    }

    pub fn fee(&self) -> &Fee {
        &self.fee
    }

    /// Any prior consultation request or registered profile for the email. Lookup
    /// errors count as "not seen" so a first-time visitor is never blocked.
    pub async fn has_been_seen_before(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        let (consultations, profiles) = tokio::join!(
            self.data.count_consultations_by_email(&email),
            self.data.count_profiles_by_email(&email),
        );
        let consultations = consultations.unwrap_or_else(|e| {
            tracing::error!("Error checking consultation history: {}", e);
            0
        });
        let profiles = profiles.unwrap_or_else(|e| {
            tracing::error!("Error checking profiles for returning client: {}", e);
            0
        });
        consultations + profiles > 0
    }

    /// Store a first request, or hand back the payload bound to a fee prompt.
    pub async fn submit(&self, request: &ConsultationRequest) -> Result<Submission, SessionError> {
        let request = validate_request(request)?;
        if self.has_been_seen_before(&request.email).await {
            tracing::info!("returning client, consultation needs payment");
            return Ok(Submission::PaymentRequired(PendingPayment {
                request,
                fee: self.fee.clone(),
            }));
        }

        let record = ConsultationRecord {
            request,
            payment_status: PaymentStatus::Free,
            payment_id: None,
            amount_paise: None,
        };
        self.data.insert_consultation(&record).await?;
        tracing::info!("free consultation request stored");
        Ok(Submission::Accepted)
    }

    /// Open the checkout for a pending request and store it once the widget reports
    /// success. On failure the pending payload is untouched and can be retried.
    pub async fn pay_and_submit<W: CheckoutWidget>(
        &self,
        widget: &W,
        pending: &PendingPayment,
        key: &str,
    ) -> Result<ConsultationRecord, SessionError> {
        let confirmation = widget.open(pending.checkout_options(key)).await?;
        tracing::warn!(
            payment_id = %confirmation.payment_id,
            "storing consultation on a client-reported payment; settlement is not verified here"
        );
        let record = ConsultationRecord {
            request: pending.request.clone(),
            payment_status: PaymentStatus::Unverified,
            payment_id: Some(confirmation.payment_id),
            amount_paise: Some(pending.fee.amount_paise),
        };
        self.data.insert_consultation(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::models::Role;
    use std::sync::Mutex;

    fn request(email: &str) -> ConsultationRequest {
        ConsultationRequest {
            first_name: "Bina".to_string(),
            last_name: "Shah".to_string(),
            email: email.to_string(),
            phone: "9123456780".to_string(),
            subject: "Tenancy dispute".to_string(),
            message: "My landlord is withholding the deposit.".to_string(),
        }
    }

    /// Replays a fixed widget outcome and remembers the options it was opened with.
    struct ScriptedCheckout {
        outcome: Result<PaymentConfirmation, SessionError>,
        opened: Mutex<Vec<CheckoutOptions>>,
    }

    impl ScriptedCheckout {
        fn new(outcome: Result<PaymentConfirmation, SessionError>) -> Self {
            Self {
                outcome,
                opened: Mutex::new(Vec::new()),
            }
        }
    }

    impl CheckoutWidget for ScriptedCheckout {
        async fn open(&self, options: CheckoutOptions) -> Result<PaymentConfirmation, SessionError> {
            self.opened.lock().unwrap().push(options);
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn test_first_submission_is_accepted_and_stored() {
        let backend = MemoryBackend::new();
        let gate = ConsultationGate::new(backend.clone());

        assert!(!gate.has_been_seen_before("b@x.com").await);
        assert_eq!(gate.submit(&request("b@x.com")).await.unwrap(), Submission::Accepted);

        let stored = backend.consultations();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].payment_status, PaymentStatus::Free);
    }

    #[tokio::test]
    async fn test_second_submission_requires_payment_with_same_fields() {
        let backend = MemoryBackend::new();
        let gate = ConsultationGate::new(backend.clone());

        gate.submit(&request("b@x.com")).await.unwrap();
        let mut second = request("B@x.com ");
        second.subject = "Follow-up".to_string();

        let Submission::PaymentRequired(pending) = gate.submit(&second).await.unwrap() else {
            panic!("expected a fee prompt for a returning client");
        };
        assert_eq!(pending.fee.display(), "₹99");
        assert_eq!(pending.request.email, "b@x.com");
        assert_eq!(pending.request.subject, "Follow-up");
        assert_eq!(pending.request.message, second.message);

        let options = pending.checkout_options("rzp_test_key");
        assert_eq!(options.amount, 9900);
        assert_eq!(options.currency, "INR");
        assert_eq!(options.prefill.name, "Bina Shah");
        assert_eq!(options.prefill.email, "b@x.com");
        assert_eq!(options.prefill.contact, "9123456780");
        // Nothing stored until the payment succeeds.
        assert_eq!(backend.consultations().len(), 1);
    }

    #[tokio::test]
    async fn test_registered_profile_counts_as_seen() {
        let backend = MemoryBackend::new();
        backend.seed_user("client@x.com", "secret1", Some(Role::Client), None);
        let gate = ConsultationGate::new(backend);
        assert!(gate.has_been_seen_before("client@x.com").await);
    }

    #[tokio::test]
    async fn test_lookup_errors_fail_open() {
        let backend = MemoryBackend::new();
        backend.seed_user("client@x.com", "secret1", Some(Role::Client), None);
        backend.fail_profile_lookups(true);
        backend.fail_consultation_lookups(true);
        let gate = ConsultationGate::new(backend);
        assert!(!gate.has_been_seen_before("client@x.com").await);
    }

    #[tokio::test]
    async fn test_successful_payment_stores_unverified_record() {
        let backend = MemoryBackend::new();
        let gate = ConsultationGate::new(backend.clone());
        let pending = PendingPayment {
            request: request("b@x.com"),
            fee: Fee::default(),
        };
        let widget = ScriptedCheckout::new(Ok(PaymentConfirmation {
            payment_id: "pay_29QQoUBi66xm2f".to_string(),
        }));

        let record = gate.pay_and_submit(&widget, &pending, "rzp_test_key").await.unwrap();
        assert_eq!(record.payment_status, PaymentStatus::Unverified);
        assert_eq!(record.amount_paise, Some(9900));
        assert_eq!(backend.consultations(), vec![record]);
        assert_eq!(widget.opened.lock().unwrap()[0].key, "rzp_test_key");
    }

    #[tokio::test]
    async fn test_failed_payment_stores_nothing() {
        let backend = MemoryBackend::new();
        let gate = ConsultationGate::new(backend.clone());
        let pending = PendingPayment {
            request: request("b@x.com"),
            fee: Fee::default(),
        };
        let widget = ScriptedCheckout::new(Err(SessionError::Payment("Card declined".to_string())));

        let err = gate.pay_and_submit(&widget, &pending, "rzp_test_key").await.unwrap_err();
        assert_eq!(err.to_string(), "Payment failed: Card declined");
        assert!(backend.consultations().is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_request_is_rejected() {
        let gate = ConsultationGate::new(MemoryBackend::new());
        let mut incomplete = request("b@x.com");
        incomplete.message = "  ".to_string();
        assert!(matches!(
            gate.submit(&incomplete).await,
            Err(SessionError::Validation(_))
        ));
    }

    #[test]
    fn test_fee_display() {
        assert_eq!(Fee::default().display(), "₹99");
        let fee = Fee {
            amount_paise: 14950,
            currency: "INR".to_string(),
        };
        assert_eq!(fee.display(), "₹149.50");
    }
}
