//! # Reducer Trait
//!
//! The `Reducer` trait is the contract a state type implements to be owned by
//! a [`StoreActor`](crate::framework::StoreActor). Every change to the state is
//! expressed as an `Action` value and applied by a pure transition function:
//! prior state + action → next state.
//!
//! The transition also yields an `Outcome`, which is sent back to whoever
//! dispatched the action. This lets callers learn that an action was ignored
//! (for instance because a newer attempt superseded it) without reading the
//! whole state back.

use std::fmt::Debug;

/// Trait that any application state must implement to be managed by a `StoreActor`.
///
/// # Purity
/// `reduce` takes the state by value and returns the next one. It must not
/// perform I/O or spawn tasks; side effects belong to the code that dispatches
/// actions. Logging is done by the actor around each transition.
pub trait Reducer: Default + Clone + Send + Sync + 'static {
    /// Enum of every state transition the store accepts.
    type Action: Send + Sync + Debug;

    /// What the dispatcher learns about how its action was applied.
    type Outcome: Send + Sync + Debug;

    /// Apply `action` to `self`, producing the next state and the outcome.
    fn reduce(self, action: Self::Action) -> (Self, Self::Outcome);
}
