use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value destined for (or read from) a single ledger cell.
///
/// `Blank` is an explicit value, not an absence: writing `Blank`
/// clears the cell, which is how stale quantities are retired when a
/// position disappears from the observed data.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Build a write value from a source-provided string.
    ///
    /// With `coerce` on, strings that parse cleanly as numbers (after
    /// stripping thousands separators) become `Number`; anything else
    /// passes through as the original text. Coercion failure is not an
    /// error — the degraded raw-string representation is intentional.
    pub fn from_raw(raw: &str, coerce: bool) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Blank;
        }
        if coerce {
            let stripped = trimmed.replace(',', "");
            if let Ok(n) = stripped.parse::<f64>() {
                return CellValue::Number(n);
            }
        }
        CellValue::Text(trimmed.to_string())
    }

    /// Interpret a stored cell string as a number, if it is one.
    /// Blank and non-numeric text yield `None`.
    pub fn parse_number(raw: &str) -> Option<f64> {
        let stripped = raw.trim().replace(',', "");
        if stripped.is_empty() {
            return None;
        }
        stripped.parse::<f64>().ok()
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() {
            CellValue::Blank
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Blank => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// The store wire format wants "" for a cleared cell, a JSON number
// for numerics (so USER_ENTERED input lands as a real number), and a
// plain string otherwise.
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Blank => serializer.serialize_str(""),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Null => CellValue::Blank,
            serde_json::Value::Number(n) => {
                CellValue::Number(n.as_f64().unwrap_or_default())
            }
            serde_json::Value::String(s) if s.trim().is_empty() => CellValue::Blank,
            serde_json::Value::String(s) => CellValue::Text(s),
            other => CellValue::Text(other.to_string()),
        })
    }
}
