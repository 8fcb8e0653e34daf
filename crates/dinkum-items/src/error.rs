use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Structural anchor missing: {0}")]
    StructuralAnchorMissing(String),

    #[error(
        "Could not calibrate {field} offset in range {range}; the data layout may have changed or the calibration anchors may be stale"
    )]
    CalibrationFailed { field: String, range: String },

    #[error("No calibration anchors configured for {0}")]
    NoAnchors(String),

    #[error("{0} is not a raw object dump directory; export the container's objects first")]
    UnsupportedContainer(String),

    #[error("Malformed record: need {needed} bytes at offset {offset}, buffer has {len}")]
    MalformedRecord {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::SourceNotFound(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
