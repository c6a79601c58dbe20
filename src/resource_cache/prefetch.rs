//! Concurrent population pass for the [`ResourceCache`](super::ResourceCache).

use super::{AssetOutcome, Generation};
use crate::app_actor::AppAction;
use crate::backend::Backend;
use crate::framework::{FrameworkError, StoreClient};
use crate::model::{AppState, UserId};
use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

/// Tally of one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefetchReport {
    pub generation: Generation,
    pub requested: usize,
    pub resolved: usize,
    pub defaulted: usize,
    /// Writes the store discarded because the generation moved on.
    pub discarded: usize,
}

/// Handle to a pass running in the background.
#[derive(Debug)]
pub struct PrefetchTask {
    generation: Generation,
    handle: JoinHandle<PrefetchReport>,
}

impl PrefetchTask {
    pub fn spawn(backend: Arc<dyn Backend>, store: StoreClient<AppState>, generation: Generation, ids: Vec<UserId>) -> Self {
        let handle = tokio::spawn(prefetch(backend, store, generation, ids));
        Self { generation, handle }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Waits until every fetch of the pass has settled.
    pub async fn settled(self) -> Result<PrefetchReport, FrameworkError> {
        self.handle
            .await
            .map_err(|e| FrameworkError::TaskFailed(e.to_string()))
    }
}

/// Fetches one asset per id, concurrently, and writes each result into the
/// store as soon as it arrives. A failed fetch is recorded as
/// [`AssetOutcome::Defaulted`] and never affects the other fetches.
///
/// Returns once all fetches have settled. An empty `ids` issues no fetches.
pub async fn prefetch(
    backend: Arc<dyn Backend>,
    store: StoreClient<AppState>,
    generation: Generation,
    ids: Vec<UserId>,
) -> PrefetchReport {
    let mut report = PrefetchReport {
        generation,
        requested: ids.len(),
        ..Default::default()
    };
    if ids.is_empty() {
        debug!(%generation, "Nothing to prefetch");
        return report;
    }

    let mut tasks = JoinSet::new();
    for id in ids {
        let backend = Arc::clone(&backend);
        let store = store.clone();
        tasks.spawn(async move {
            let outcome = match backend.profile_picture(id).await {
                Ok(asset) => AssetOutcome::Resolved(asset),
                Err(e) => {
                    warn!(candidate_id = id, %generation, error = %e, "Profile picture fetch failed, using fallback");
                    AssetOutcome::Defaulted
                }
            };
            let resolved = matches!(outcome, AssetOutcome::Resolved(_));
            let applied = match store.dispatch(AppAction::AssetSettled { generation, id, outcome }).await {
                Ok(transition) => transition.is_applied(),
                Err(e) => {
                    warn!(candidate_id = id, error = %e, "Could not record asset");
                    false
                }
            };
            (resolved, applied)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((resolved, applied)) => {
                if resolved {
                    report.resolved += 1;
                } else {
                    report.defaulted += 1;
                }
                if !applied {
                    report.discarded += 1;
                }
            }
            Err(e) => {
                warn!(%generation, error = %e, "Prefetch task failed");
                report.defaulted += 1;
                report.discarded += 1;
            }
        }
    }

    info!(
        %generation,
        requested = report.requested,
        resolved = report.resolved,
        defaulted = report.defaulted,
        discarded = report.discarded,
        "Prefetch pass settled"
    );
    report
}
