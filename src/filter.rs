//! # Filter Engine
//!
//! Pure, synchronous derivation of the filtered view from the candidate set
//! and the viewer's [`FilterCriteria`].
//!
//! 1. A non-empty search text keeps candidates whose `firstName` contains it.
//! 2. Each non-empty field filter, in ascending field-name order, keeps
//!    candidates whose field contains the pattern. A missing field is a
//!    non-match.
//!
//! All comparisons are case-insensitive substring matches. The result borrows
//! from the input and keeps its relative order.

use crate::model::{Candidate, FilterCriteria};

/// Returns the candidates satisfying every active predicate of `criteria`.
pub fn filter<'a>(candidates: &'a [Candidate], criteria: &FilterCriteria) -> Vec<&'a Candidate> {
    let search = (!criteria.search_text.is_empty()).then(|| criteria.search_text.to_lowercase());
    let fields: Vec<(&str, String)> = criteria
        .field_filters
        .iter()
        .filter(|(_, pattern)| !pattern.is_empty())
        .map(|(field, pattern)| (field.as_str(), pattern.to_lowercase()))
        .collect();

    candidates
        .iter()
        .filter(|candidate| {
            search
                .as_deref()
                .map_or(true, |needle| contains_lowercase(&candidate.first_name, needle))
        })
        .filter(|candidate| {
            fields.iter().all(|(field, needle)| {
                candidate
                    .field(field)
                    .is_some_and(|value| contains_lowercase(&value, needle))
            })
        })
        .collect()
}

/// The first `n` entries of a view, for "top matches" style listings.
pub fn top<T>(view: &[T], n: usize) -> &[T] {
    &view[..n.min(view.len())]
}

fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
