use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One `(symbol, quantity)` pair as produced by an acquisition
/// collaborator. Quantities stay strings here — coercion happens at
/// reconcile time, controlled by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedHolding {
    pub symbol: String,
    pub quantity: String,
}

impl ObservedHolding {
    pub fn new(symbol: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: quantity.into(),
        }
    }
}

/// Observed symbol → quantity mapping.
///
/// Built by folding an ordered holding sequence with
/// last-occurrence-wins semantics: a duplicate symbol later in the
/// stream overwrites the earlier entry. Backed by a `BTreeMap` so
/// iteration (and the new-symbol report) is deterministically sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoldingSet {
    entries: BTreeMap<String, String>,
}

impl HoldingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an ordered sequence of holdings, last occurrence winning.
    pub fn from_holdings<I>(holdings: I) -> Self
    where
        I: IntoIterator<Item = ObservedHolding>,
    {
        let mut set = Self::new();
        for h in holdings {
            set.insert(h.symbol, h.quantity);
        }
        set
    }

    pub fn insert(&mut self, symbol: impl Into<String>, quantity: impl Into<String>) {
        self.entries.insert(symbol.into(), quantity.into());
    }

    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.entries.get(symbol).map(String::as_str)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
