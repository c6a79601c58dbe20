//! [`Reducer`] implementation for [`AppState`].

use super::actions::{AppAction, Commit, IgnoreReason, Transition};
use crate::framework::Reducer;
use crate::model::{AppState, OperationKind, Operations, Phase, UserId, ViewerSession};
use crate::resource_cache::{RecordOutcome, ResourceCache};
use std::sync::Arc;

impl Reducer for AppState {
    type Action = AppAction;
    type Outcome = Transition;

    fn reduce(mut self, action: AppAction) -> (Self, Transition) {
        let result = match action {
            AppAction::Begin { kind, attempt, viewer } => {
                if viewer.is_some() && self.viewer_id() != viewer {
                    Err(IgnoreReason::NoSession)
                } else {
                    attempt_applied(self.operations.begin(kind, attempt))
                }
            }
            AppAction::Succeed { kind, attempt, commit } => {
                if self.operations.settle(kind, attempt, Phase::Succeeded) {
                    self = self.commit(kind, attempt, commit);
                    Ok(())
                } else {
                    Err(IgnoreReason::StaleAttempt)
                }
            }
            AppAction::Fail { kind, attempt, message } => {
                attempt_applied(self.operations.settle(kind, attempt, Phase::Failed(message)))
            }
            AppAction::Abandon { kind, attempt } => {
                attempt_applied(self.operations.settle(kind, attempt, Phase::Idle))
            }
            AppAction::AssetSettled { generation, id, outcome } => match self.cache.record(generation, id, outcome) {
                RecordOutcome::Applied => Ok(()),
                RecordOutcome::StaleGeneration => Err(IgnoreReason::StaleGeneration),
                RecordOutcome::UnknownCandidate => Err(IgnoreReason::UnknownCandidate),
                RecordOutcome::AlreadySettled => Err(IgnoreReason::AlreadySettled),
            },
            AppAction::SetSearchText(text) => {
                self.criteria.search_text = text;
                Ok(())
            }
            AppAction::SetFieldFilter { field, pattern } => {
                self.criteria.set_field(field, pattern);
                Ok(())
            }
            AppAction::ReplaceCriteria(criteria) => {
                self.criteria = criteria;
                Ok(())
            }
            AppAction::ClearCriteria => {
                self.criteria = Default::default();
                Ok(())
            }
            AppAction::Logout => {
                let mut operations = std::mem::take(&mut self.operations);
                operations.abandon_all();
                self = self.discard_session(operations);
                Ok(())
            }
        };

        let outcome = match result {
            Ok(()) => Transition::Applied {
                generation: self.cache.generation(),
            },
            Err(reason) => Transition::Ignored(reason),
        };
        (self, outcome)
    }
}

fn attempt_applied(applied: bool) -> Result<(), IgnoreReason> {
    if applied {
        Ok(())
    } else {
        Err(IgnoreReason::StaleAttempt)
    }
}

impl AppState {
    fn commit(mut self, kind: OperationKind, attempt: u64, commit: Commit) -> Self {
        match commit {
            Commit::Session { profile, token } => {
                if self.viewer_id().is_some_and(|id| id != profile.id) {
                    // Another viewer's data and in-flight work must not carry over.
                    let mut operations = std::mem::take(&mut self.operations);
                    operations.abandon_all();
                    self = self.discard_session(operations);
                }
                self.session = Some(ViewerSession { profile, token });
            }
            Commit::ProfileUpdated(profile) => {
                if let Some(session) = self.session.as_mut().filter(|s| s.profile.id == profile.id) {
                    session.profile = profile;
                }
            }
            Commit::PreferencesSaved(preferences) => {
                self.preferences = preferences;
            }
            Commit::MatchesLoaded(candidates) => {
                let generation = self.cache.generation().next();
                self.cache = ResourceCache::pending(generation, candidates.iter().map(|c| c.id));
                self.candidates = Arc::new(candidates);
            }
            Commit::Registered => {
                let mut operations = Operations::default();
                operations.mark_succeeded(kind, attempt);
                return self.discard_session(operations);
            }
        }
        self
    }

    fn viewer_id(&self) -> Option<UserId> {
        self.session.as_ref().map(|s| s.profile.id)
    }

    /// Drops every per-viewer field in one step. The cache generation still
    /// advances so fetches started for the old set cannot write into the new one.
    fn discard_session(self, operations: Operations) -> Self {
        AppState {
            cache: ResourceCache::new(self.cache.generation().next()),
            operations,
            ..AppState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Candidate, FilterCriteria, Preferences, ViewerProfile};
    use crate::resource_cache::{AssetOutcome, CacheEntry};

    fn apply(state: AppState, actions: Vec<AppAction>) -> AppState {
        actions.into_iter().fold(state, |s, a| s.reduce(a).0)
    }

    fn logged_in_with_matches() -> AppState {
        apply(
            AppState::default(),
            vec![
                AppAction::Begin { kind: OperationKind::Login, attempt: 1, viewer: None },
                AppAction::Succeed {
                    kind: OperationKind::Login,
                    attempt: 1,
                    commit: Commit::Session {
                        profile: ViewerProfile::new(10, "Priya"),
                        token: "tok".into(),
                    },
                },
                AppAction::Begin { kind: OperationKind::SavePreferences, attempt: 2, viewer: Some(10) },
                AppAction::Succeed {
                    kind: OperationKind::SavePreferences,
                    attempt: 2,
                    commit: Commit::PreferencesSaved(Preferences::new().with("religion", "Hindu")),
                },
                AppAction::Begin { kind: OperationKind::FetchMatches, attempt: 3, viewer: Some(10) },
                AppAction::Succeed {
                    kind: OperationKind::FetchMatches,
                    attempt: 3,
                    commit: Commit::MatchesLoaded(vec![Candidate::new(1, "Anu"), Candidate::new(2, "Ravi")]),
                },
                AppAction::SetSearchText("anu".into()),
            ],
        )
    }

    #[test]
    fn test_succeed_commits_and_clears_loading_together() {
        let state = logged_in_with_matches();

        assert_eq!(state.profile().map(|p| p.id), Some(10));
        assert_eq!(state.preferences().get("religion"), Some(&"Hindu".into()));
        assert_eq!(state.candidates().len(), 2);
        assert_eq!(state.cache().len(), 2);
        assert!(!state.cache().is_settled());
        assert!(!state.operations().any_loading());
        assert_eq!(state.filtered_view().len(), 1);
    }

    #[test]
    fn test_fail_leaves_entity_untouched() {
        let before = logged_in_with_matches();
        let after = apply(
            before.clone(),
            vec![
                AppAction::Begin { kind: OperationKind::FetchMatches, attempt: 4, viewer: None },
                AppAction::Fail {
                    kind: OperationKind::FetchMatches,
                    attempt: 4,
                    message: "Error fetching matches. Please try again later.".into(),
                },
            ],
        );

        assert_eq!(after.candidates(), before.candidates());
        assert_eq!(after.cache(), before.cache());
        let fetch = after.operations().get(OperationKind::FetchMatches);
        assert!(!fetch.loading());
        assert_eq!(fetch.error(), Some("Error fetching matches. Please try again later."));
    }

    #[test]
    fn test_superseded_attempt_cannot_commit() {
        let state = apply(
            AppState::default(),
            vec![
                AppAction::Begin { kind: OperationKind::FetchMatches, attempt: 1, viewer: None },
                AppAction::Begin { kind: OperationKind::FetchMatches, attempt: 2, viewer: None },
            ],
        );
        let (state, outcome) = state.reduce(AppAction::Succeed {
            kind: OperationKind::FetchMatches,
            attempt: 1,
            commit: Commit::MatchesLoaded(vec![Candidate::new(9, "Old")]),
        });

        assert_eq!(outcome, Transition::Ignored(IgnoreReason::StaleAttempt));
        assert!(state.candidates().is_empty());
        assert!(state.operations().get(OperationKind::FetchMatches).loading());
    }

    #[test]
    fn test_abandon_returns_to_idle_without_error() {
        let state = apply(
            AppState::default(),
            vec![
                AppAction::Begin { kind: OperationKind::UpdateUser, attempt: 1, viewer: None },
                AppAction::Abandon { kind: OperationKind::UpdateUser, attempt: 1 },
            ],
        );
        let update = state.operations().get(OperationKind::UpdateUser);
        assert_eq!(update.phase(), &Phase::Idle);
        assert_eq!(update.error(), None);
    }

    #[test]
    fn test_logout_resets_all_viewer_data() {
        let state = logged_in_with_matches();
        let old_generation = state.generation();
        let (state, outcome) = state.reduce(AppAction::Logout);

        assert!(outcome.is_applied());
        assert!(state.session().is_none());
        assert!(state.preferences().is_empty());
        assert!(state.candidates().is_empty());
        assert!(state.filtered_view().is_empty());
        assert!(state.cache().is_empty());
        assert_eq!(state.criteria(), &FilterCriteria::default());
        assert!(state.generation() > old_generation);
    }

    #[test]
    fn test_logout_drops_in_flight_results() {
        let state = apply(
            logged_in_with_matches(),
            vec![
                AppAction::Begin { kind: OperationKind::FetchMatches, attempt: 8, viewer: None },
                AppAction::Logout,
            ],
        );
        assert!(!state.operations().any_loading());

        let (state, outcome) = state.reduce(AppAction::Succeed {
            kind: OperationKind::FetchMatches,
            attempt: 8,
            commit: Commit::MatchesLoaded(vec![Candidate::new(1, "Anu")]),
        });
        assert_eq!(outcome, Transition::Ignored(IgnoreReason::StaleAttempt));
        assert!(state.candidates().is_empty());
    }

    #[test]
    fn test_begin_bound_to_logged_out_viewer_is_ignored() {
        let (state, _) = logged_in_with_matches().reduce(AppAction::Logout);
        let (state, outcome) = state.reduce(AppAction::Begin {
            kind: OperationKind::FetchMatches,
            attempt: 9,
            viewer: Some(10),
        });

        assert_eq!(outcome, Transition::Ignored(IgnoreReason::NoSession));
        assert!(!state.operations().any_loading());
        // The attempt number was not consumed.
        assert_eq!(state.operations().get(OperationKind::FetchMatches).attempt(), 3);
    }

    #[test]
    fn test_begin_bound_to_another_viewer_is_ignored() {
        let (_, outcome) = logged_in_with_matches().reduce(AppAction::Begin {
            kind: OperationKind::SavePreferences,
            attempt: 9,
            viewer: Some(11),
        });
        assert_eq!(outcome, Transition::Ignored(IgnoreReason::NoSession));
    }

    #[test]
    fn test_profile_update_for_another_viewer_is_not_applied() {
        let state = apply(
            logged_in_with_matches(),
            vec![
                AppAction::Begin { kind: OperationKind::UpdateUser, attempt: 9, viewer: Some(10) },
                AppAction::Succeed {
                    kind: OperationKind::UpdateUser,
                    attempt: 9,
                    commit: Commit::ProfileUpdated(ViewerProfile::new(11, "Arjun")),
                },
            ],
        );
        assert_eq!(state.profile().map(|p| p.id), Some(10));
        assert_eq!(state.profile().map(|p| p.first_name.as_str()), Some("Priya"));
    }

    #[test]
    fn test_login_as_another_viewer_discards_previous_data() {
        let state = apply(
            logged_in_with_matches(),
            vec![
                AppAction::Begin { kind: OperationKind::UpdateUser, attempt: 9, viewer: Some(10) },
                AppAction::Begin { kind: OperationKind::Login, attempt: 10, viewer: None },
                AppAction::Succeed {
                    kind: OperationKind::Login,
                    attempt: 10,
                    commit: Commit::Session {
                        profile: ViewerProfile::new(11, "Arjun"),
                        token: "tok2".into(),
                    },
                },
            ],
        );

        assert_eq!(state.profile().map(|p| p.id), Some(11));
        assert!(state.preferences().is_empty());
        assert!(state.candidates().is_empty());
        assert!(state.cache().is_empty());
        assert!(state.criteria().is_empty());
        assert!(!state.operations().any_loading());
        assert_eq!(state.operations().get(OperationKind::Login).phase(), &Phase::Succeeded);

        let (_, outcome) = state.reduce(AppAction::Succeed {
            kind: OperationKind::UpdateUser,
            attempt: 9,
            commit: Commit::ProfileUpdated(ViewerProfile::new(10, "Priya")),
        });
        assert_eq!(outcome, Transition::Ignored(IgnoreReason::StaleAttempt));
    }

    #[test]
    fn test_login_as_same_viewer_keeps_data() {
        let state = apply(
            logged_in_with_matches(),
            vec![
                AppAction::Begin { kind: OperationKind::Login, attempt: 9, viewer: None },
                AppAction::Succeed {
                    kind: OperationKind::Login,
                    attempt: 9,
                    commit: Commit::Session {
                        profile: ViewerProfile::new(10, "Priya"),
                        token: "tok2".into(),
                    },
                },
            ],
        );
        assert_eq!(state.candidates().len(), 2);
        assert_eq!(state.session().map(|s| s.token.as_str()), Some("tok2"));
    }

    #[test]
    fn test_asset_writes_from_before_logout_are_discarded() {
        let state = logged_in_with_matches();
        let generation = state.generation();
        let (state, _) = state.reduce(AppAction::Logout);

        let (state, outcome) = state.reduce(AppAction::AssetSettled {
            generation,
            id: 1,
            outcome: AssetOutcome::Resolved("late.jpg".into()),
        });
        assert_eq!(outcome, Transition::Ignored(IgnoreReason::StaleGeneration));
        assert_eq!(state.cache().entry(1), None);
    }

    #[test]
    fn test_new_candidate_set_starts_new_generation() {
        let state = logged_in_with_matches();
        let first = state.generation();
        let state = apply(
            state,
            vec![
                AppAction::Begin { kind: OperationKind::FetchMatches, attempt: 5, viewer: None },
                AppAction::Succeed {
                    kind: OperationKind::FetchMatches,
                    attempt: 5,
                    commit: Commit::MatchesLoaded(vec![Candidate::new(3, "Meera")]),
                },
            ],
        );

        assert_eq!(state.generation(), first.next());
        assert_eq!(state.cache().entry(3), Some(&CacheEntry::Pending));
        assert_eq!(state.cache().entry(1), None);
        // Criteria survive a refetch.
        assert_eq!(state.criteria().search_text, "anu");
    }

    #[test]
    fn test_registration_discards_in_memory_state() {
        let state = logged_in_with_matches();
        let state = apply(
            state,
            vec![
                AppAction::Begin { kind: OperationKind::Register, attempt: 7, viewer: None },
                AppAction::Succeed {
                    kind: OperationKind::Register,
                    attempt: 7,
                    commit: Commit::Registered,
                },
            ],
        );

        assert!(state.session().is_none());
        assert!(state.candidates().is_empty());
        assert_eq!(
            state.operations().get(OperationKind::Register).phase(),
            &Phase::Succeeded
        );
        assert_eq!(
            state.operations().get(OperationKind::Login).phase(),
            &Phase::Idle
        );
    }

    #[test]
    fn test_field_filter_actions() {
        let state = apply(
            AppState::default(),
            vec![
                AppAction::SetFieldFilter { field: "caste".into(), pattern: "x".into() },
                AppAction::SetFieldFilter { field: "religion".into(), pattern: "y".into() },
                AppAction::SetFieldFilter { field: "caste".into(), pattern: String::new() },
            ],
        );
        assert_eq!(state.criteria(), &FilterCriteria::new().with_field("religion", "y"));

        let (state, _) = state.reduce(AppAction::ClearCriteria);
        assert!(state.criteria().is_empty());
    }
}
