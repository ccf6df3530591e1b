//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod views;

pub const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

mod auth;
pub use auth::{use_session, use_session_store, use_settings, SessionProvider, SignOutButton};

pub mod toast;
pub use toast::{show_toast, use_toasts, ToastKind, ToastProvider};

mod navbar;
pub use navbar::Navbar;

mod auth_dialog;
pub use auth_dialog::AuthDialog;

mod checkout;
pub use checkout::RazorpayCheckout;

mod contact_form;
pub use contact_form::ContactForm;

mod payment_prompt;
pub use payment_prompt::PaymentPrompt;

mod lawyer_profile_form;
pub use lawyer_profile_form::LawyerProfileEditor;
