// Upload entry point: stage the bytes in a temp file and run the pipeline

use std::io::Write;
use std::path::Path;

use log::{error, info};
use ruckstats_core::Store;
use serde::Serialize;

use crate::engine::{run, IngestOptions};
use crate::error::IngestError;
use crate::report::IngestReport;

pub const NO_FILE_MESSAGE: &str = "No file uploaded";
pub const INVALID_TYPE_MESSAGE: &str = "Invalid file type. Please upload an Excel (.xlsx) file.";

/// Result shape returned to the uploader.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
}

impl UploadOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), match_count: None }
    }
}

/// Ingest an uploaded `.xlsx` file. Never fails; errors are folded into
/// the outcome message.
pub fn upload_report(
    file_name: &str,
    bytes: &[u8],
    store: &mut dyn Store,
    options: &IngestOptions,
) -> UploadOutcome {
    if file_name.is_empty() || bytes.is_empty() {
        return UploadOutcome::failure(NO_FILE_MESSAGE);
    }
    if !file_name.ends_with(".xlsx") {
        return UploadOutcome::failure(INVALID_TYPE_MESSAGE);
    }

    match ingest_bytes(bytes, store, options) {
        Ok(report) => {
            let matches = report.counts.matches;
            UploadOutcome {
                success: true,
                message: format!("Ingestion complete! Processed {matches} matches."),
                match_count: Some(matches),
            }
        }
        Err(e) => {
            error!("Upload of '{file_name}' failed: {e}");
            UploadOutcome::failure(format!("Failed to process file: {e}"))
        }
    }
}

fn ingest_bytes(bytes: &[u8], store: &mut dyn Store, options: &IngestOptions) -> Result<IngestReport, IngestError> {
    ingest_bytes_in(&std::env::temp_dir(), bytes, store, options)
}

/// Stage `bytes` in `dir` and ingest them. The temp file is removed when
/// `staged` drops, on every return path.
fn ingest_bytes_in(
    dir: &Path,
    bytes: &[u8],
    store: &mut dyn Store,
    options: &IngestOptions,
) -> Result<IngestReport, IngestError> {
    let mut staged = tempfile::Builder::new().prefix("upload-").suffix(".xlsx").tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;

    info!("File saved to {}, starting ingestion", staged.path().display());
    run(staged.path(), store, options)
}
