//! Async, viewer-facing handles over the application store.

mod attempt;
pub mod session_client;

pub use session_client::*;
