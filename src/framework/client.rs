//! # Store Client
//!
//! The cloneable, async handle used to talk to a [`StoreActor`](crate::framework::StoreActor).

use crate::framework::error::FrameworkError;
use crate::framework::message::StoreRequest;
use crate::framework::reducer::Reducer;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with a `StoreActor`.
///
/// Holds only a sender, so cloning is cheap and clones can be moved into
/// spawned tasks.
pub struct StoreClient<S: Reducer> {
    sender: mpsc::Sender<StoreRequest<S>>,
}

// Manual impl: `S` itself does not need to be `Clone` for the handle to be.
impl<S: Reducer> Clone for StoreClient<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S: Reducer> StoreClient<S> {
    pub fn new(sender: mpsc::Sender<StoreRequest<S>>) -> Self {
        Self { sender }
    }

    /// Dispatch an action and wait for the transition outcome.
    pub async fn dispatch(&self, action: S::Action) -> Result<S::Outcome, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Dispatch { action, respond_to })
            .await
            .map_err(|_| FrameworkError::StoreClosed)?;
        response.await.map_err(|_| FrameworkError::StoreDropped)
    }

    /// Queue an action without waiting for it to be applied.
    ///
    /// Usable from synchronous contexts such as `Drop` implementations.
    pub fn try_dispatch(&self, action: S::Action) -> Result<(), FrameworkError> {
        let (respond_to, _response) = oneshot::channel();
        self.sender
            .try_send(StoreRequest::Dispatch { action, respond_to })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => FrameworkError::MailboxFull,
                mpsc::error::TrySendError::Closed(_) => FrameworkError::StoreClosed,
            })
    }

    /// Fetch a clone of the current state.
    pub async fn snapshot(&self) -> Result<S, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Snapshot { respond_to })
            .await
            .map_err(|_| FrameworkError::StoreClosed)?;
        response.await.map_err(|_| FrameworkError::StoreDropped)
    }
}
