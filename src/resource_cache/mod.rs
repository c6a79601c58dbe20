//! # Resource Cache
//!
//! Maps every candidate of the current set to its profile image.
//!
//! Each candidate set the store accepts gets a new [`Generation`]. Replacing
//! the set rebuilds the cache with one [`CacheEntry::Pending`] per id; each id
//! is then written exactly once, by its own fetch, to either
//! [`CacheEntry::Resolved`] or [`CacheEntry::Defaulted`]. Writes carrying an
//! older generation are discarded, so a superseded pass cannot touch the
//! current cache.
//!
//! Reads never fail: [`ResourceCache::asset_for`] returns the fallback for
//! unknown, pending, and defaulted ids alike. Callers that want to tell a
//! spinner from a genuine fallback use [`ResourceCache::entry`].
//!
//! The concurrent population pass lives in [`prefetch`].

pub mod prefetch;

pub use prefetch::*;

use crate::model::UserId;
use std::collections::HashMap;
use std::fmt;

/// Version marker of a candidate set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Resolution state of one candidate's asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// Fetch issued, not settled yet.
    Pending,
    /// Fetch succeeded with this asset reference.
    Resolved(String),
    /// Fetch failed; the fallback asset stands in.
    Defaulted,
}

/// Result of one per-candidate fetch, as written into the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Resolved(String),
    Defaulted,
}

/// What happened to a write offered to [`ResourceCache::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Applied,
    /// Written for a generation that has been superseded.
    StaleGeneration,
    /// The id is not part of the current candidate set.
    UnknownCandidate,
    /// The id was already written in this generation.
    AlreadySettled,
}

/// Candidate id → asset for one generation of the candidate set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceCache {
    generation: Generation,
    entries: HashMap<UserId, CacheEntry>,
}

impl ResourceCache {
    /// An empty cache for `generation`.
    pub fn new(generation: Generation) -> Self {
        Self {
            generation,
            entries: HashMap::new(),
        }
    }

    /// A cache for `generation` with a pending entry for every id.
    pub fn pending<I>(generation: Generation, ids: I) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        Self {
            generation,
            entries: ids.into_iter().map(|id| (id, CacheEntry::Pending)).collect(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Writes the outcome of one fetch.
    pub fn record(&mut self, generation: Generation, id: UserId, outcome: AssetOutcome) -> RecordOutcome {
        if generation != self.generation {
            return RecordOutcome::StaleGeneration;
        }
        match self.entries.get_mut(&id) {
            None => RecordOutcome::UnknownCandidate,
            Some(entry) if *entry == CacheEntry::Pending => {
                *entry = match outcome {
                    AssetOutcome::Resolved(asset) => CacheEntry::Resolved(asset),
                    AssetOutcome::Defaulted => CacheEntry::Defaulted,
                };
                RecordOutcome::Applied
            }
            Some(_) => RecordOutcome::AlreadySettled,
        }
    }

    pub fn entry(&self, id: UserId) -> Option<&CacheEntry> {
        self.entries.get(&id)
    }

    /// The asset to render for `id`; `fallback` unless the fetch resolved.
    pub fn asset_for<'a>(&'a self, id: UserId, fallback: &'a str) -> &'a str {
        match self.entries.get(&id) {
            Some(CacheEntry::Resolved(asset)) => asset.as_str(),
            _ => fallback,
        }
    }

    /// True once no entry is pending.
    pub fn is_settled(&self) -> bool {
        !self.entries.values().any(|e| *e == CacheEntry::Pending)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn defaulted_count(&self) -> usize {
        self.entries.values().filter(|e| **e == CacheEntry::Defaulted).count()
    }

    pub fn resolved_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, CacheEntry::Resolved(_)))
            .count()
    }

    pub fn ids(&self) -> impl Iterator<Item = UserId> + '_ {
        self.entries.keys().copied()
    }
}
