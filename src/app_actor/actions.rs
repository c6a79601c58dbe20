//! Actions accepted by the application store.
//!
//! Operation actions follow the begin/settle protocol: `Begin` enters
//! loading for one attempt, then exactly one of `Succeed`, `Fail` or
//! `Abandon` leaves it. `Succeed` carries the entity change and applies it
//! in the same transition that clears the loading flag.

use crate::model::{Attempt, Candidate, FilterCriteria, OperationKind, Preferences, UserId, ViewerProfile};
use crate::resource_cache::{AssetOutcome, Generation};

/// Entity change committed by a successful operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// Login: the viewer session starts.
    Session { profile: ViewerProfile, token: String },
    /// Registration: in-memory state is discarded, forcing a fresh login.
    Registered,
    ProfileUpdated(ViewerProfile),
    PreferencesSaved(Preferences),
    /// A new candidate set; starts a new cache generation.
    MatchesLoaded(Vec<Candidate>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// `viewer` binds the attempt to a logged-in viewer. A bound `Begin` is
    /// ignored unless that viewer holds the session.
    Begin {
        kind: OperationKind,
        attempt: Attempt,
        viewer: Option<UserId>,
    },
    Succeed {
        kind: OperationKind,
        attempt: Attempt,
        commit: Commit,
    },
    Fail {
        kind: OperationKind,
        attempt: Attempt,
        message: String,
    },
    /// The invoking future went away before settling.
    Abandon {
        kind: OperationKind,
        attempt: Attempt,
    },
    AssetSettled {
        generation: Generation,
        id: UserId,
        outcome: AssetOutcome,
    },
    SetSearchText(String),
    /// Empty `pattern` removes the filter.
    SetFieldFilter {
        field: String,
        pattern: String,
    },
    ReplaceCriteria(FilterCriteria),
    ClearCriteria,
    Logout,
}

/// Why an action left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A newer attempt of the same operation kind is (or was) in flight.
    StaleAttempt,
    /// The viewer the action was bound to no longer holds the session.
    NoSession,
    StaleGeneration,
    UnknownCandidate,
    AlreadySettled,
}

/// Outcome returned to the dispatcher of an [`AppAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state changed. `generation` is the candidate-set generation
    /// after the change.
    Applied { generation: Generation },
    Ignored(IgnoreReason),
}

impl Transition {
    pub fn is_applied(self) -> bool {
        matches!(self, Transition::Applied { .. })
    }

    pub fn generation(self) -> Option<Generation> {
        match self {
            Transition::Applied { generation } => Some(generation),
            Transition::Ignored(_) => None,
        }
    }
}
