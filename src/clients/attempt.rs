//! Guard for one in-flight operation attempt.

use crate::app_actor::{AppAction, Commit, IgnoreReason, OperationError, Transition};
use crate::framework::{FrameworkError, StoreClient};
use crate::model::{AppState, Attempt, OperationKind, UserId};
use crate::resource_cache::Generation;
use tracing::{debug, warn};

/// Owns the loading flag of one attempt between `Begin` and its settle.
///
/// If the guard is dropped before [`succeed`](Self::succeed),
/// [`reject`](Self::reject) or [`fail`](Self::fail) completes, it queues an
/// `Abandon` so the operation does not stay loading forever. An `Abandon`
/// for an attempt that already settled is ignored by the store.
pub(crate) struct InFlight {
    store: StoreClient<AppState>,
    kind: OperationKind,
    attempt: Attempt,
    armed: bool,
}

impl InFlight {
    /// Dispatches `Begin`. With `viewer` set, the attempt only starts if that
    /// viewer still holds the session when the store applies it.
    pub(crate) async fn begin(
        store: &StoreClient<AppState>,
        kind: OperationKind,
        attempt: Attempt,
        viewer: Option<UserId>,
    ) -> Result<Self, OperationError> {
        // Armed before dispatching so a drop while waiting still abandons.
        let mut guard = Self {
            store: store.clone(),
            kind,
            attempt,
            armed: true,
        };
        let transition = store.dispatch(AppAction::Begin { kind, attempt, viewer }).await?;
        match transition {
            Transition::Applied { .. } => {}
            Transition::Ignored(IgnoreReason::NoSession) => {
                guard.armed = false;
                return Err(OperationError::NotAuthenticated);
            }
            Transition::Ignored(_) => {
                guard.armed = false;
                return Err(OperationError::Superseded { kind, attempt });
            }
        }
        debug!(%kind, attempt, "Begin");
        Ok(guard)
    }

    /// Commits the result. Returns the candidate-set generation after the commit.
    pub(crate) async fn succeed(mut self, commit: Commit) -> Result<Generation, OperationError> {
        let (kind, attempt) = (self.kind, self.attempt);
        let transition = self.store.dispatch(AppAction::Succeed { kind, attempt, commit }).await;
        self.armed = false;
        transition?
            .generation()
            .ok_or(OperationError::Superseded { kind, attempt })
    }

    /// Settles as failed because the backend sent no usable payload.
    pub(crate) async fn reject(self, message: impl Into<String>) -> OperationError {
        let kind = self.kind;
        let message = message.into();
        match self.settle_failed(message.clone()).await {
            Ok(()) => OperationError::Rejected { kind, message },
            Err(e) => e,
        }
    }

    /// Settles as failed after a backend error.
    pub(crate) async fn fail(self, message: impl Into<String>) -> OperationError {
        let kind = self.kind;
        let message = message.into();
        match self.settle_failed(message.clone()).await {
            Ok(()) => OperationError::Failed { kind, message },
            Err(e) => e,
        }
    }

    async fn settle_failed(mut self, message: String) -> Result<(), OperationError> {
        let (kind, attempt) = (self.kind, self.attempt);
        let transition = self.store.dispatch(AppAction::Fail { kind, attempt, message }).await;
        self.armed = false;
        if transition?.is_applied() {
            Ok(())
        } else {
            Err(OperationError::Superseded { kind, attempt })
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(kind = %self.kind, attempt = self.attempt, "Attempt dropped before settling");
        let action = AppAction::Abandon {
            kind: self.kind,
            attempt: self.attempt,
        };
        match self.store.try_dispatch(action.clone()) {
            Ok(()) => {}
            Err(FrameworkError::MailboxFull) => match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let store = self.store.clone();
                    runtime.spawn(async move {
                        let _ = store.dispatch(action).await;
                    });
                }
                Err(_) => warn!(kind = %self.kind, attempt = self.attempt, "Could not abandon attempt: no runtime"),
            },
            Err(e) => warn!(kind = %self.kind, attempt = self.attempt, error = %e, "Could not abandon attempt"),
        }
    }
}
