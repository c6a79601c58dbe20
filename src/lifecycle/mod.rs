//! System lifecycle: starting the store, wiring the session client to its
//! backend and host services, graceful shutdown, and tracing setup.
//!
//! # Main Components
//!
//! - [`MatchSystem`] - spawns the store actor and owns the [`SessionClient`](crate::clients::SessionClient)
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the clients** - closes the sender side of the store channel
//! 2. **Store detects closure** - `receiver.recv()` returns `None` and the loop ends
//! 3. **Await completion** - the store task's handle is awaited

pub mod match_system;
pub mod tracing;

pub use match_system::*;
pub use tracing::*;
