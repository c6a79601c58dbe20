use std::collections::BTreeMap;

/// Search and filter input edited by the viewer.
///
/// `field_filters` maps a candidate field's wire name to a substring pattern.
/// A `BTreeMap` keeps the filters in ascending field-name order, which is the
/// order the filter engine applies them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub field_filters: BTreeMap<String, String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_field(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.set_field(field, pattern);
        self
    }

    /// Sets a field filter; an empty pattern removes it.
    pub fn set_field(&mut self, field: impl Into<String>, pattern: impl Into<String>) {
        let field = field.into();
        let pattern = pattern.into();
        if pattern.is_empty() {
            self.field_filters.remove(&field);
        } else {
            self.field_filters.insert(field, pattern);
        }
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.field_filters.values().all(String::is_empty)
    }
}
