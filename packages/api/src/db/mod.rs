//! # Table access
//!
//! [`SupabaseRest`] implements [`session::DataStore`] over the hosted REST gateway. It
//! reads `user_roles` and `profiles`, writes lawyer profiles, and counts and inserts
//! `consultation_requests`.
//!
//! Row counts use `HEAD` with `Prefer: count=exact` and read the total from the
//! `Content-Range` header, so the returning-client check never downloads rows.

mod rest;

pub use rest::{parse_content_range_total, SupabaseRest};
