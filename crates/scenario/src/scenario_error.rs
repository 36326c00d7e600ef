// ---------------------------------------------------------------------------
// ScenarioError: error types for scenario save/load
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors from the persistence boundary. Everything inside the engine
/// degrades instead of failing; only these reach the caller.
#[derive(Debug)]
pub enum ScenarioError {
    /// I/O error (file not found, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// The payload is not valid JSON, or a field has an impossible shape.
    Json(String),
    /// Decompression failed or the header is damaged.
    Decode(String),
    /// Stored and computed payload checksums differ.
    Checksum { expected: u32, found: u32 },
    /// Snapshot version is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
    /// A migration step could not upgrade the payload.
    MigrationFailed(String),
    /// The payload is structurally impossible (e.g. not a JSON object).
    Malformed(String),
    /// No scenario is stored under this name.
    NotFound(String),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Io(e) => write!(f, "I/O error: {e}"),
            ScenarioError::Json(msg) => write!(f, "JSON error: {msg}"),
            ScenarioError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            ScenarioError::Checksum { expected, found } => write!(
                f,
                "Scenario file is corrupted: checksum mismatch (expected {expected:#010X}, got {found:#010X})"
            ),
            ScenarioError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: scenario is v{found}, but this build only supports up to v{expected_max}"
            ),
            ScenarioError::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            ScenarioError::Malformed(msg) => write!(f, "Malformed scenario: {msg}"),
            ScenarioError::NotFound(name) => write!(f, "No scenario named '{name}'"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(e: std::io::Error) -> Self {
        ScenarioError::Io(e)
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(e: serde_json::Error) -> Self {
        ScenarioError::Json(e.to_string())
    }
}

impl From<lz4_flex::block::DecompressError> for ScenarioError {
    fn from(e: lz4_flex::block::DecompressError) -> Self {
        ScenarioError::Decode(e.to_string())
    }
}
