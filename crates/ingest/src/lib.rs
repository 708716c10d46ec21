//! `ruckstats-ingest`: league workbook to relational store.
//!
//! Reads the `Info Clubes` and `Info Jogo` sheets, normalizes and validates
//! every row, and rebuilds teams, round stats, matches and match sides in a
//! [`Store`](ruckstats_core::Store). Bad rows are skipped and reported;
//! only unreadable workbooks and store failures abort a run.

pub mod columns;
pub mod corrections;
pub mod engine;
pub mod error;
pub mod materialize;
pub mod normalize;
pub mod registry;
pub mod report;
pub mod schema;
pub mod standings;
pub mod upload;

pub use engine::{ingest_rows, run, IngestOptions};
pub use error::IngestError;
pub use report::{IngestReport, SkipReason, SkippedRow};
pub use upload::{upload_report, UploadOutcome};
