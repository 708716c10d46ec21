use std::fmt;
use std::io;

use ruckstats_core::StoreError;
use ruckstats_io::WorkbookError;

/// Failures that abort an ingestion run. Bad rows are never errors; they
/// are skipped and recorded in the report.
#[derive(Debug)]
pub enum IngestError {
    /// Workbook could not be opened or a required sheet is missing.
    Workbook(WorkbookError),
    /// The store rejected a write.
    Store(StoreError),
    /// Upload staging failed (temp file create/write).
    Io(io::Error),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workbook(e) => write!(f, "{e}"),
            Self::Store(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Workbook(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<WorkbookError> for IngestError {
    fn from(e: WorkbookError) -> Self {
        Self::Workbook(e)
    }
}

impl From<StoreError> for IngestError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<io::Error> for IngestError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
