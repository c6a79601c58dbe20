//! # Store Actor
//!
//! The `StoreActor` owns the application state and the receiving end of the
//! store channel. It applies every dispatched action sequentially, so the state
//! needs no `Mutex` or `RwLock`: exclusive ownership inside one task is the
//! only synchronisation.

use crate::framework::client::StoreClient;
use crate::framework::message::StoreRequest;
use crate::framework::reducer::Reducer;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The generic actor that owns a [`Reducer`] state.
///
/// # Usage Pattern
///
/// 1.  **Create**: `StoreActor::new()` returns the actor (server) and a [`StoreClient`] (interface).
/// 2.  **Run**: spawn `actor.run()` on the runtime.
/// 3.  **Use**: clone the client wherever actions are dispatched.
///
/// The loop ends once every client clone has been dropped.
pub struct StoreActor<S: Reducer> {
    receiver: mpsc::Receiver<StoreRequest<S>>,
    state: S,
    revision: u64,
}

impl<S: Reducer> StoreActor<S> {
    /// Creates a new `StoreActor` with `S::default()` and its associated `StoreClient`.
    ///
    /// `buffer_size` is the capacity of the mailbox. When it is full, `dispatch`
    /// waits for space and `try_dispatch` fails with `MailboxFull`.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<S>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            state: S::default(),
            revision: 0,
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "AppState" instead of "match_orchestrator::model::state::AppState")
        let state_type = std::any::type_name::<S>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(state_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Dispatch { action, respond_to } => {
                    debug!(state_type, revision = self.revision, ?action, "Dispatch");
                    let (next, outcome) = std::mem::take(&mut self.state).reduce(action);
                    self.state = next;
                    self.revision += 1;
                    debug!(state_type, revision = self.revision, ?outcome, "Reduced");
                    let _ = respond_to.send(outcome);
                }
                StoreRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(self.state.clone());
                }
            }
        }

        info!(state_type, revision = self.revision, "Shutdown");
    }
}
