use super::candidate::Candidate;
use super::operation::OperationKind;
use super::state::AppState;
use super::viewer::ViewerProfile;
use crate::filter;
use crate::resource_cache::CacheEntry;
use std::sync::Arc;

/// One rendered match: the record plus the image to show for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCard {
    pub candidate: Candidate,
    pub image: String,
    /// The image fetch has not settled; `image` is the fallback for now.
    pub image_pending: bool,
}

/// Render-ready projection of [`AppState`] for the dashboard.
///
/// `loading` and `error` are those of the match fetch, which is what the
/// dashboard waits on.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub profile: Option<ViewerProfile>,
    pub candidates: Arc<Vec<Candidate>>,
    pub filtered: Vec<Candidate>,
    pub top_matches: Vec<ProfileCard>,
    pub loading: bool,
    pub error: Option<String>,
    pub images_settled: bool,
}

impl ViewState {
    pub fn from_state(state: &AppState, fallback_asset: &str, top_n: usize) -> Self {
        let filtered = state.filtered_view();
        let top_matches = filter::top(&filtered, top_n)
            .iter()
            .map(|candidate| ProfileCard {
                candidate: (*candidate).clone(),
                image: state.cache().asset_for(candidate.id, fallback_asset).to_string(),
                image_pending: matches!(state.cache().entry(candidate.id), Some(CacheEntry::Pending)),
            })
            .collect();
        let fetch = state.operations().get(OperationKind::FetchMatches);

        Self {
            profile: state.profile().cloned(),
            candidates: Arc::clone(state.candidates()),
            filtered: filtered.into_iter().cloned().collect(),
            top_matches,
            loading: fetch.loading(),
            error: fetch.error().map(str::to_string),
            images_settled: state.cache().is_settled(),
        }
    }
}
