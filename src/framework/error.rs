//! # Framework Errors
//!
//! Errors raised by the store plumbing itself, independent of what the
//! state means. Domain failures live next to the domain code.

/// Errors that can occur while talking to a [`StoreActor`](crate::framework::StoreActor).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    #[error("Store mailbox full")]
    MailboxFull,
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}
