//! Generic single-owner state store built on the actor model.
//!
//! # Main Components
//!
//! - [`Reducer`] - Trait a state type implements: pure `state + action -> state`
//! - [`StoreActor`] - Task that owns the state and applies actions one at a time
//! - [`StoreClient`] - Cloneable handle for dispatching actions and reading snapshots
//! - [`FrameworkError`] - Channel-level failures

pub mod client;
pub mod error;
pub mod message;
pub mod reducer;
pub mod store;

pub use client::StoreClient;
pub use error::FrameworkError;
pub use message::{Response, StoreRequest};
pub use reducer::Reducer;
pub use store::StoreActor;
