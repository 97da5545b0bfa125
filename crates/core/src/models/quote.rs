/// A freshly fetched market price. Ephemeral — never persisted beyond
/// the ledger write it feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub symbol: String,
    pub price: f64,
}

/// Three-way movement of a price against its previously stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDirection {
    Up,
    Down,
    Unchanged,
    /// The prior value was blank or not numeric (first-ever fetch,
    /// hand-edited cell). Not a failure.
    Unknown,
}

impl PriceDirection {
    /// Classify `new` against an optionally parseable prior value.
    pub fn classify(old: Option<f64>, new: f64) -> Self {
        match old {
            None => PriceDirection::Unknown,
            Some(old) if new > old => PriceDirection::Up,
            Some(old) if new < old => PriceDirection::Down,
            Some(_) => PriceDirection::Unchanged,
        }
    }

    /// Short marker for per-row log lines.
    pub fn arrow(&self) -> &'static str {
        match self {
            PriceDirection::Up => "▲",
            PriceDirection::Down => "▼",
            PriceDirection::Unchanged => "=",
            PriceDirection::Unknown => "?",
        }
    }
}

impl std::fmt::Display for PriceDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PriceDirection::Up => "up",
            PriceDirection::Down => "down",
            PriceDirection::Unchanged => "unchanged",
            PriceDirection::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}
