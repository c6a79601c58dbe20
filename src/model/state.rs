use super::candidate::Candidate;
use super::criteria::FilterCriteria;
use super::operation::Operations;
use super::preferences::Preferences;
use super::viewer::ViewerProfile;
use crate::filter;
use crate::resource_cache::{Generation, ResourceCache};
use std::sync::Arc;

/// The logged-in viewer: own profile plus the credential token.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSession {
    pub profile: ViewerProfile,
    pub token: String,
}

/// Everything the client knows, owned by the store actor.
///
/// Fields are only changed through [`AppAction`](crate::app_actor::AppAction)s;
/// the filtered view is never stored, it is derived on read from the
/// candidate set and the criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub(crate) session: Option<ViewerSession>,
    pub(crate) preferences: Preferences,
    pub(crate) candidates: Arc<Vec<Candidate>>,
    pub(crate) criteria: FilterCriteria,
    pub(crate) cache: ResourceCache,
    pub(crate) operations: Operations,
}

impl AppState {
    pub fn session(&self) -> Option<&ViewerSession> {
        self.session.as_ref()
    }

    pub fn profile(&self) -> Option<&ViewerProfile> {
        self.session.as_ref().map(|s| &s.profile)
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The current candidate set. Shared, so snapshots do not copy it.
    pub fn candidates(&self) -> &Arc<Vec<Candidate>> {
        &self.candidates
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    pub fn operations(&self) -> &Operations {
        &self.operations
    }

    /// Generation of the current candidate set.
    pub fn generation(&self) -> Generation {
        self.cache.generation()
    }

    /// Candidates matching the current criteria, in candidate-set order.
    pub fn filtered_view(&self) -> Vec<&Candidate> {
        filter::filter(&self.candidates, &self.criteria)
    }
}
