//! # Store Messages
//!
//! Message types exchanged between [`StoreClient`](crate::framework::StoreClient)
//! and [`StoreActor`](crate::framework::StoreActor).

use crate::framework::reducer::Reducer;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<T>;

/// Internal message type sent to the store actor.
///
/// - **Dispatch**: apply one action through [`Reducer::reduce`] and answer with its outcome.
/// - **Snapshot**: answer with a clone of the current state.
#[derive(Debug)]
pub enum StoreRequest<S: Reducer> {
    Dispatch {
        action: S::Action,
        respond_to: Response<S::Outcome>,
    },
    Snapshot {
        respond_to: Response<S>,
    },
}
