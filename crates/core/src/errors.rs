use thiserror::Error;

/// Unified error type for the entire ledger-sync-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input file not found: {0}")]
    InputFileNotFound(String),

    #[error("Grid size mismatch for {context}: expected {expected} rows, got {actual}")]
    GridSizeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    // ── Tabular store ───────────────────────────────────────────────
    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("Store error ({operation}): {message}")]
    Store {
        operation: String,
        message: String,
    },

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Price not available for {0}")]
    PriceNotAvailable(String),

    // ── Parsing / I/O ───────────────────────────────────────────────
    #[error("Record parse error: {0}")]
    RecordParse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        CoreError::RecordParse(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs to prevent
        // credential leakage. reqwest errors often contain full URLs with secrets.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
