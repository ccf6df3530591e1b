//! # Session crate: identity, role resolution and routing decisions
//!
//! Everything in this crate is UI-agnostic. The Dioxus front end in `ui` consumes it
//! through a handful of types; the Supabase clients in `api` implement its traits.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Identity, auth sessions, roles, profiles and consultation records |
//! | [`provider`] | The [`IdentityProvider`] and [`DataStore`] traits the backend implements |
//! | [`store`] | [`SessionStore`]: the single shared "who is logged in and as what" container |
//! | [`router`] | Pure view selection for `/` and the dashboard guards |
//! | [`consultation`] | [`ConsultationGate`]: the returning-client fee gate for the contact form |
//! | [`forms`] | Validation for the auth dialog, password reset and lawyer profile forms |
//! | [`profile`] | Lawyer profile load/save on top of [`DataStore`] |
//! | [`directory`] | Admin user directory merged from profiles and role rows |
//!
//! [`MemoryBackend`] implements every trait in memory. It backs the unit tests and the
//! offline demo mode of the web app.

pub mod consultation;
pub mod directory;
pub mod error;
pub mod forms;
pub mod models;
pub mod profile;
pub mod provider;
pub mod router;
pub mod store;

mod memory;
pub use memory::MemoryBackend;

pub use consultation::{
    CheckoutOptions, CheckoutWidget, ConsultationGate, Fee, PaymentConfirmation,
    PendingPayment, Submission,
};
pub use directory::{Directory, DirectoryEntry};
pub use error::SessionError;
pub use models::{
    AuthEvent, AuthEventKind, AuthSession, ConsultationRecord, ConsultationRequest, Identity,
    PaymentStatus, Profile, ProfileUpdate, Role, RoleAssignment, RoleRow, SignUpRequest,
    UserId, UserMetadata,
};
pub use provider::{DataStore, IdentityProvider};
pub use router::{Dashboard, DashboardAccess, RootView};
pub use store::{SessionState, SessionStore};
