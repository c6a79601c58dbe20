//! Loading/error bookkeeping for network-backed operations.
//!
//! Every operation kind moves through the same phases:
//!
//! ```text
//! Idle ──begin──▶ Loading ──succeed──▶ Succeeded
//!                    │
//!                    ├──fail─────▶ Failed(message)
//!                    └──abandon──▶ Idle
//! ```
//!
//! `begin` is the only way into `Loading` and it also drops any previous
//! error, so clearing the error and raising the flag are one transition.

use std::collections::HashMap;
use std::fmt;

/// Sequence number of one invocation of an operation.
pub type Attempt = u64;

/// The network-backed operations the session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Login,
    Register,
    UpdateUser,
    SavePreferences,
    FetchMatches,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Login => "login",
            OperationKind::Register => "register",
            OperationKind::UpdateUser => "update_user",
            OperationKind::SavePreferences => "save_preferences",
            OperationKind::FetchMatches => "fetch_matches",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(String),
}

/// Loading/error state of one operation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationState {
    phase: Phase,
    attempt: Attempt,
}

impl OperationState {
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The most recent attempt that entered `Loading`.
    pub fn attempt(&self) -> Attempt {
        self.attempt
    }

    pub fn loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Per-kind operation states. Kinds never started read as idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operations {
    states: HashMap<OperationKind, OperationState>,
}

impl Operations {
    pub fn get(&self, kind: OperationKind) -> OperationState {
        self.states.get(&kind).cloned().unwrap_or_default()
    }

    pub fn any_loading(&self) -> bool {
        self.states.values().any(OperationState::loading)
    }

    /// True if `attempt` is the current attempt for `kind` and still loading.
    pub fn is_in_flight(&self, kind: OperationKind, attempt: Attempt) -> bool {
        self.states
            .get(&kind)
            .is_some_and(|s| s.attempt == attempt && s.loading())
    }

    /// Enters `Loading` for `attempt`, clearing any previous error.
    ///
    /// Attempts are allocated in increasing order; an attempt not newer than
    /// the current one is rejected and `false` is returned.
    pub(crate) fn begin(&mut self, kind: OperationKind, attempt: Attempt) -> bool {
        let state = self.states.entry(kind).or_default();
        if attempt <= state.attempt {
            return false;
        }
        state.attempt = attempt;
        state.phase = Phase::Loading;
        true
    }

    /// Leaves `Loading` for `attempt`. Returns `false` if that attempt is no
    /// longer in flight (superseded or already settled).
    pub(crate) fn settle(&mut self, kind: OperationKind, attempt: Attempt, phase: Phase) -> bool {
        debug_assert!(phase != Phase::Loading);
        match self.states.get_mut(&kind) {
            Some(state) if state.attempt == attempt && state.loading() => {
                state.phase = phase;
                true
            }
            _ => false,
        }
    }

    /// Returns every loading kind to `Idle`. Attempt numbers are kept, so
    /// the abandoned attempts can no longer settle.
    pub(crate) fn abandon_all(&mut self) {
        for state in self.states.values_mut().filter(|s| s.loading()) {
            state.phase = Phase::Idle;
        }
    }

    /// Records `kind` as succeeded for `attempt` on a freshly reset table.
    pub(crate) fn mark_succeeded(&mut self, kind: OperationKind, attempt: Attempt) {
        self.states.insert(
            kind,
            OperationState {
                phase: Phase::Succeeded,
                attempt,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_clears_previous_error() {
        let mut ops = Operations::default();
        assert!(ops.begin(OperationKind::Login, 1));
        assert!(ops.settle(OperationKind::Login, 1, Phase::Failed("nope".into())));
        assert_eq!(ops.get(OperationKind::Login).error(), Some("nope"));
        assert!(!ops.get(OperationKind::Login).loading());

        assert!(ops.begin(OperationKind::Login, 2));
        let state = ops.get(OperationKind::Login);
        assert!(state.loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_stale_attempts_are_rejected() {
        let mut ops = Operations::default();
        assert!(ops.begin(OperationKind::FetchMatches, 2));
        assert!(!ops.begin(OperationKind::FetchMatches, 1));
        assert!(!ops.settle(OperationKind::FetchMatches, 1, Phase::Succeeded));
        assert!(ops.get(OperationKind::FetchMatches).loading());

        assert!(ops.settle(OperationKind::FetchMatches, 2, Phase::Succeeded));
        assert!(!ops.settle(OperationKind::FetchMatches, 2, Phase::Failed("late".into())));
        assert_eq!(ops.get(OperationKind::FetchMatches).phase(), &Phase::Succeeded);
    }

    #[test]
    fn test_abandon_all_blocks_late_settles() {
        let mut ops = Operations::default();
        ops.begin(OperationKind::FetchMatches, 1);
        ops.begin(OperationKind::Login, 2);
        ops.settle(OperationKind::Login, 2, Phase::Failed("bad".into()));

        ops.abandon_all();
        assert!(!ops.any_loading());
        assert_eq!(ops.get(OperationKind::Login).error(), Some("bad"));
        assert!(!ops.settle(OperationKind::FetchMatches, 1, Phase::Succeeded));
        assert!(ops.begin(OperationKind::FetchMatches, 3));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut ops = Operations::default();
        ops.begin(OperationKind::Login, 1);
        ops.begin(OperationKind::FetchMatches, 2);
        ops.settle(OperationKind::Login, 1, Phase::Failed("bad".into()));

        assert!(ops.any_loading());
        assert_eq!(ops.get(OperationKind::FetchMatches).error(), None);
        assert_eq!(ops.get(OperationKind::Register), OperationState::default());
    }
}
