use crate::backend::{Backend, BackendError, HttpBackend};
use crate::clients::SessionClient;
use crate::config::Config;
use crate::framework::FrameworkError;
use crate::platform::{CredentialStore, HistoryNavigator, InMemoryCredentialStore, Navigator};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Runs the application store and hands out the [`SessionClient`] wired to it.
///
/// # Example
///
/// ```ignore
/// let system = MatchSystem::new(Config::load())?;
///
/// system.session.login(Credentials::new("a@b.c", "secret")).await?;
/// let view = system.session.load_dashboard().await?;
///
/// system.shutdown().await?;
/// ```
pub struct MatchSystem {
    pub session: SessionClient,
    credentials: Arc<InMemoryCredentialStore>,
    navigator: Arc<HistoryNavigator>,
    handle: JoinHandle<()>,
}

impl MatchSystem {
    /// Starts a system talking to the service at `config.api_url`.
    pub fn new(config: Config) -> Result<Self, BackendError> {
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let backend = HttpBackend::new(config.api_url.clone(), credentials.clone())?;
        Ok(Self::start(config, Arc::new(backend), credentials))
    }

    /// Starts a system on top of an arbitrary backend, e.g. a mock.
    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Self {
        Self::start(config, backend, Arc::new(InMemoryCredentialStore::new()))
    }

    fn start(config: Config, backend: Arc<dyn Backend>, credentials: Arc<InMemoryCredentialStore>) -> Self {
        let (actor, store) = crate::app_actor::new(config.store_buffer);
        let handle = tokio::spawn(actor.run());

        let navigator = Arc::new(HistoryNavigator::new());
        let session = SessionClient::new(
            store,
            backend,
            credentials.clone() as Arc<dyn CredentialStore>,
            navigator.clone() as Arc<dyn Navigator>,
            config.fallback_asset,
            config.top_n,
        );
        info!(top_n = config.top_n, store_buffer = config.store_buffer, "System started");

        Self {
            session,
            credentials,
            navigator,
            handle,
        }
    }

    pub fn credentials(&self) -> &InMemoryCredentialStore {
        &self.credentials
    }

    pub fn navigator(&self) -> &HistoryNavigator {
        &self.navigator
    }

    /// Drops the session client and waits for the store to stop.
    ///
    /// The store stops once every client clone is gone, so this also waits
    /// for running prefetch passes and for clones handed out to callers.
    pub async fn shutdown(self) -> Result<(), FrameworkError> {
        info!("Shutting down system...");
        drop(self.session);

        if let Err(e) = self.handle.await {
            error!("Store task failed: {:?}", e);
            return Err(FrameworkError::TaskFailed(e.to_string()));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
