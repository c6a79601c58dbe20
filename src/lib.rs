//! # Match Orchestrator
//!
//! Client-side state orchestration for a profile-matching service: viewer
//! session, candidate set, filter criteria, profile-image cache and the
//! loading/error state of every network operation, all owned by one store
//! actor and changed only through actions.
//!
//! ## Core Concepts
//!
//! ### One owner, sequential transitions
//! The [`AppState`](model::AppState) lives inside a single
//! [`StoreActor`](framework::StoreActor) task. Every change is an
//! [`AppAction`](app_actor::AppAction) applied by a pure
//! [`Reducer`](framework::Reducer), so the state needs no locks and every
//! transition is atomic.
//!
//! ### Begin / settle
//! Each network operation (login, register, update user, save preferences,
//! fetch matches) begins with one transition that sets `loading` and clears
//! the previous error, and ends with one transition that either commits the
//! result or records a human-readable error. Attempt numbers make a double
//! invocation resolve to the later call, and a drop guard settles attempts
//! whose future goes away.
//!
//! ### Generations
//! Replacing the candidate set starts a new cache
//! [`Generation`](resource_cache::Generation). Image fetches tag their writes
//! with the generation they were started for; the store discards writes from
//! older generations, so a logout or refetch never sees stale images.
//!
//! ## Module Tour
//!
//! - [`framework`] - generic store actor, client and reducer trait
//! - [`app_actor`] - actions, transitions and operation errors for [`AppState`](model::AppState)
//! - [`model`] - wire types, application state and the render-ready [`ViewState`](model::ViewState)
//! - [`filter`] - the filter engine
//! - [`resource_cache`] - tri-state image cache and the concurrent prefetch pass
//! - [`backend`] - the [`Backend`](backend::Backend) trait, its HTTP implementation and a mock
//! - [`platform`] - credential store and navigator seams
//! - [`clients`] - [`SessionClient`](clients::SessionClient), the viewer-facing API
//! - [`lifecycle`] - [`MatchSystem`](lifecycle::MatchSystem) wiring and tracing setup
//! - [`config`] - environment configuration
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -- ana@example.test secret
//! cargo test
//! ```

pub mod app_actor;
pub mod backend;
pub mod clients;
pub mod config;
pub mod filter;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod platform;
pub mod resource_cache;
