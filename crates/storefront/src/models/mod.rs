//! Session-backed models.

pub mod session;

pub use session::{checkout_id, keys as session_keys};
