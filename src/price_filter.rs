//! Price tier multi-select.

#[cfg(test)]
#[path = "price_filter_test.rs"]
mod price_filter_test;

use std::collections::BTreeSet;

/// The set of selected price tiers. An empty set matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceFilter {
    selected: BTreeSet<String>,
}

impl PriceFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `values`.
    pub fn set_selection<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = values.into_iter().map(Into::into).collect();
    }

    /// Drop every selected tier.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Whether a record with the given tier passes the filter.
    ///
    /// A record without a tier only passes when nothing is selected.
    #[must_use]
    pub fn matches(&self, tier: Option<&str>) -> bool {
        if self.selected.is_empty() {
            return true;
        }
        tier.is_some_and(|t| self.selected.contains(t))
    }
}
