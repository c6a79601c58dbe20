use crate::app_actor::{failure_message, rejected_message, AppAction, Commit, OperationError};
use crate::backend::Backend;
use crate::clients::attempt::InFlight;
use crate::framework::StoreClient;
use crate::model::{
    AppState, Attempt, Credentials, FilterCriteria, OperationKind, OperationState, Preferences, ProfileUpdate,
    Registration, UserId, ViewState, ViewerProfile,
};
use crate::platform::{CredentialStore, Navigator, Route};
use crate::resource_cache::PrefetchTask;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Viewer-facing operations over the application store.
///
/// Every network operation runs the same protocol: one `Begin` transition
/// (loading on, error cleared), the backend call, then one settle transition
/// that either commits the result or records the error. Attempt numbers are
/// allocated from a shared counter, so when the same operation is invoked
/// twice concurrently the later invocation owns the flags and the earlier
/// one resolves to [`OperationError::Superseded`].
#[derive(Clone)]
pub struct SessionClient {
    store: StoreClient<AppState>,
    backend: Arc<dyn Backend>,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    attempts: Arc<AtomicU64>,
    fallback_asset: Arc<str>,
    top_n: usize,
}

impl SessionClient {
    pub fn new(
        store: StoreClient<AppState>,
        backend: Arc<dyn Backend>,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        fallback_asset: impl Into<Arc<str>>,
        top_n: usize,
    ) -> Self {
        Self {
            store,
            backend,
            credentials,
            navigator,
            attempts: Arc::new(AtomicU64::new(0)),
            fallback_asset: fallback_asset.into(),
            top_n,
        }
    }

    async fn begin(&self, kind: OperationKind, viewer: Option<UserId>) -> Result<InFlight, OperationError> {
        let attempt: Attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        InFlight::begin(&self.store, kind, attempt, viewer).await
    }

    /// Current viewer id. The store re-checks it when the attempt begins, so
    /// a logout landing after this read still stops the operation.
    async fn viewer_id(&self) -> Result<UserId, OperationError> {
        let state = self.store.snapshot().await?;
        state.profile().map(|p| p.id).ok_or(OperationError::NotAuthenticated)
    }

    /// Logs in, stores the credential token and navigates to the dashboard.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: Credentials) -> Result<ViewerProfile, OperationError> {
        let kind = OperationKind::Login;
        let attempt = self.begin(kind, None).await?;

        match self.backend.login(&credentials).await {
            Ok(Some(payload)) => {
                let profile = payload.user.clone();
                attempt
                    .succeed(Commit::Session {
                        profile: payload.user,
                        token: payload.token.clone(),
                    })
                    .await?;
                self.credentials.store(&payload.token);
                self.navigator.navigate(Route::Dashboard);
                info!(user_id = profile.id, "Logged in");
                Ok(profile)
            }
            Ok(None) => {
                info!("Login rejected");
                Err(attempt.reject(rejected_message(kind)).await)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                Err(attempt.fail(failure_message(kind, e.message())).await)
            }
        }
    }

    /// Registers a new account. On success all in-memory state is dropped
    /// and the viewer is sent to the login screen.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<(), OperationError> {
        let kind = OperationKind::Register;
        let attempt = self.begin(kind, None).await?;

        match self.backend.signup(&registration).await {
            Ok(Some(_)) => {
                attempt.succeed(Commit::Registered).await?;
                self.credentials.clear();
                self.navigator.navigate(Route::Login);
                info!("Registered");
                Ok(())
            }
            Ok(None) => Err(attempt.reject(rejected_message(kind)).await),
            Err(e) => {
                warn!(error = %e, "Registration failed");
                Err(attempt.fail(failure_message(kind, e.message())).await)
            }
        }
    }

    #[instrument(skip(self, update))]
    pub async fn update_user(&self, update: ProfileUpdate) -> Result<ViewerProfile, OperationError> {
        let kind = OperationKind::UpdateUser;
        let user_id = self.viewer_id().await?;
        let attempt = self.begin(kind, Some(user_id)).await?;

        match self.backend.update_user(user_id, &update).await {
            Ok(Some(profile)) => {
                attempt.succeed(Commit::ProfileUpdated(profile.clone())).await?;
                info!(user_id, "Profile updated");
                Ok(profile)
            }
            Ok(None) => Err(attempt.reject(rejected_message(kind)).await),
            Err(e) => {
                warn!(user_id, error = %e, "Profile update failed");
                Err(attempt.fail(failure_message(kind, e.message())).await)
            }
        }
    }

    #[instrument(skip(self, preferences))]
    pub async fn save_preferences(&self, preferences: Preferences) -> Result<Preferences, OperationError> {
        let kind = OperationKind::SavePreferences;
        let user_id = self.viewer_id().await?;
        let attempt = self.begin(kind, Some(user_id)).await?;

        match self.backend.save_preferences(user_id, &preferences).await {
            Ok(Some(saved)) => {
                attempt.succeed(Commit::PreferencesSaved(saved.clone())).await?;
                info!(user_id, "Preferences saved");
                Ok(saved)
            }
            Ok(None) => Err(attempt.reject(rejected_message(kind)).await),
            Err(e) => {
                warn!(user_id, error = %e, "Saving preferences failed");
                Err(attempt.fail(failure_message(kind, e.message())).await)
            }
        }
    }

    /// Replaces the candidate set with the viewer's matches and starts the
    /// profile-image prefetch for the new set.
    ///
    /// Returns as soon as the set is committed; await
    /// [`PrefetchTask::settled`] to wait for the images.
    #[instrument(skip(self))]
    pub async fn fetch_matches(&self) -> Result<PrefetchTask, OperationError> {
        let kind = OperationKind::FetchMatches;
        let user_id = self.viewer_id().await?;
        let attempt = self.begin(kind, Some(user_id)).await?;

        match self.backend.find_matches(user_id).await {
            Ok(candidates) => {
                let ids: Vec<UserId> = candidates.iter().map(|c| c.id).collect();
                let count = ids.len();
                let generation = attempt.succeed(Commit::MatchesLoaded(candidates)).await?;
                info!(user_id, count, %generation, "Matches loaded");
                Ok(PrefetchTask::spawn(
                    Arc::clone(&self.backend),
                    self.store.clone(),
                    generation,
                    ids,
                ))
            }
            Err(e) => {
                warn!(user_id, error = %e, "Fetching matches failed");
                Err(attempt.fail(failure_message(kind, e.message())).await)
            }
        }
    }

    /// Fetches matches, waits for the image pass and returns the view.
    #[instrument(skip(self))]
    pub async fn load_dashboard(&self) -> Result<ViewState, OperationError> {
        let prefetch = self.fetch_matches().await?;
        prefetch.settled().await?;
        self.view().await
    }

    pub async fn set_search_text(&self, text: impl Into<String>) -> Result<(), OperationError> {
        self.store.dispatch(AppAction::SetSearchText(text.into())).await?;
        Ok(())
    }

    /// An empty `pattern` removes the filter on `field`.
    pub async fn set_field_filter(&self, field: impl Into<String>, pattern: impl Into<String>) -> Result<(), OperationError> {
        let action = AppAction::SetFieldFilter {
            field: field.into(),
            pattern: pattern.into(),
        };
        self.store.dispatch(action).await?;
        Ok(())
    }

    pub async fn replace_criteria(&self, criteria: FilterCriteria) -> Result<(), OperationError> {
        self.store.dispatch(AppAction::ReplaceCriteria(criteria)).await?;
        Ok(())
    }

    pub async fn clear_criteria(&self) -> Result<(), OperationError> {
        self.store.dispatch(AppAction::ClearCriteria).await?;
        Ok(())
    }

    /// Drops the session and every piece of viewer data in one transition,
    /// clears the stored token and navigates to the login screen.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), OperationError> {
        let transition = self.store.dispatch(AppAction::Logout).await?;
        self.credentials.clear();
        self.navigator.navigate(Route::Login);
        info!(generation = ?transition.generation(), "Logged out");
        Ok(())
    }

    /// Render-ready projection of the current state.
    pub async fn view(&self) -> Result<ViewState, OperationError> {
        let state = self.store.snapshot().await?;
        Ok(ViewState::from_state(&state, &self.fallback_asset, self.top_n))
    }

    pub async fn snapshot(&self) -> Result<AppState, OperationError> {
        Ok(self.store.snapshot().await?)
    }

    pub async fn operation(&self, kind: OperationKind) -> Result<OperationState, OperationError> {
        let state = self.store.snapshot().await?;
        debug!(%kind, "Operation state read");
        Ok(state.operations().get(kind))
    }

    pub fn fallback_asset(&self) -> &str {
        &self.fallback_asset
    }
}
