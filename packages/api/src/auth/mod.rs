//! Identity provider client and session persistence.

mod client;
mod session;

pub use client::SupabaseAuth;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use session::LocalStoragePersistence;
pub use session::{MemoryPersistence, SessionPersistence, TokenResponse};
