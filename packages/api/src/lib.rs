//! # API crate: clients for the hosted backend
//!
//! Implements the `session` crate's backend traits against a Supabase project: the
//! identity provider under `/auth/v1` and the tables under `/rest/v1`. Both run in the
//! browser (reqwest's fetch backend) and natively.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | [`SupabaseAuth`], token parsing, session persistence (`localStorage` with `web`) |
//! | [`db`] | [`SupabaseRest`]: roles, profiles and consultation requests |
//! | [`backend`] | [`connect`]: hosted backend when configured, in-memory demo otherwise |
//! | [`settings`] | [`Settings`] from defaults, build-time values, `config.toml` and the environment |
//! | [`error`] | [`ApiError`] and its mapping onto `SessionError` |

pub mod auth;
pub mod backend;
pub mod db;
pub mod error;
pub mod settings;

pub use auth::SupabaseAuth;
pub use backend::{connect, demo_backend, AuthBackend, DataBackend};
pub use db::SupabaseRest;
pub use error::ApiError;
pub use settings::Settings;

/// The session store as the front ends use it.
pub type AppSessionStore = session::SessionStore<AuthBackend, DataBackend>;
