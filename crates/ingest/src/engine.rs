use std::path::Path;

use log::{debug, info, warn};
use ruckstats_config::{GroupSettings, IngestSettings};
use ruckstats_core::layout::{CLUBS_HEADER_SENTINEL, CLUBS_SHEET, MATCHES_HEADER_SENTINEL, MATCHES_SHEET};
use ruckstats_core::Store;
use ruckstats_io::SheetRows;

use crate::error::IngestError;
use crate::materialize::{Materializer, RowOutcome};
use crate::registry::TeamRegistry;
use crate::report::{IngestReport, SkipReason};
use crate::standings::reconcile;

/// Per-run knobs, usually taken from [`IngestSettings`].
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOptions {
    pub clubs_sheet: String,
    pub matches_sheet: String,
    pub groups: GroupSettings,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            clubs_sheet: CLUBS_SHEET.to_string(),
            matches_sheet: MATCHES_SHEET.to_string(),
            groups: GroupSettings::default(),
        }
    }
}

impl IngestOptions {
    pub fn from_settings(settings: &IngestSettings) -> Self {
        Self {
            clubs_sheet: settings.workbook.clubs_sheet.clone(),
            matches_sheet: settings.workbook.matches_sheet.clone(),
            groups: settings.groups.clone(),
        }
    }
}

/// Rebuild the store from the workbook at `path`.
///
/// The store is cleared as soon as the workbook opens, before either
/// sheet is read. There is no rollback: a failed run leaves whatever was
/// written so far, never rows from an earlier run.
pub fn run(path: &Path, store: &mut dyn Store, options: &IngestOptions) -> Result<IngestReport, IngestError> {
    info!("Reading workbook {}", path.display());
    let mut workbook = ruckstats_io::open(path)?;

    clear(store)?;
    let clubs = workbook.read_sheet(&options.clubs_sheet, CLUBS_HEADER_SENTINEL)?;
    let fixtures = workbook.read_sheet(&options.matches_sheet, MATCHES_HEADER_SENTINEL)?;
    drop(workbook);

    materialize_rows(&clubs, &fixtures, store, options)
}

/// Clear the store and materialize already-read sheets.
pub fn ingest_rows(
    clubs: &SheetRows,
    fixtures: &SheetRows,
    store: &mut dyn Store,
    options: &IngestOptions,
) -> Result<IngestReport, IngestError> {
    clear(store)?;
    materialize_rows(clubs, fixtures, store, options)
}

fn clear(store: &mut dyn Store) -> Result<(), IngestError> {
    info!("Clearing existing data");
    store.clear_all()?;
    Ok(())
}

fn materialize_rows(
    clubs: &SheetRows,
    fixtures: &SheetRows,
    store: &mut dyn Store,
    options: &IngestOptions,
) -> Result<IngestReport, IngestError> {
    let registry = TeamRegistry::build(&clubs.rows, &options.groups, store)?;
    info!("Found {} teams: {}", registry.len(), registry.names().join(", "));

    let mut report = IngestReport { teams_created: registry.len(), ..Default::default() };
    {
        let mut materializer = Materializer::new(&registry, store);

        for (index, row) in clubs.rows.iter().enumerate() {
            match materializer.team_round(row)? {
                RowOutcome::Created(_) => report.round_stats_processed += 1,
                RowOutcome::Skipped(reason) => {
                    let line = clubs.sheet_row_number(index);
                    log_skip(&clubs.name, line, &reason);
                    report.round_stats_skipped += 1;
                    report.skip(&clubs.name, line, reason);
                }
            }
        }
        info!(
            "{}: {} processed, {} skipped",
            clubs.name, report.round_stats_processed, report.round_stats_skipped
        );

        for (index, row) in fixtures.rows.iter().enumerate() {
            match materializer.fixture(row)? {
                RowOutcome::Created(made) => {
                    if made.corrected {
                        report.patches_applied += 1;
                    }
                    report.reconciliation_misses += reconcile(&made.record, materializer.store())?;
                    report.matches_processed += 1;
                }
                RowOutcome::Skipped(reason) => {
                    let line = fixtures.sheet_row_number(index);
                    log_skip(&fixtures.name, line, &reason);
                    report.matches_skipped += 1;
                    report.skip(&fixtures.name, line, reason);
                }
            }
        }
        info!(
            "{}: {} matches processed, {} skipped",
            fixtures.name, report.matches_processed, report.matches_skipped
        );
    }

    report.counts = store.counts()?;
    info!("Ingest complete: {}", report.summary());
    Ok(report)
}

fn log_skip(sheet: &str, line: usize, reason: &SkipReason) {
    match reason {
        SkipReason::AggregateRow | SkipReason::MissingTeamName | SkipReason::NoRound | SkipReason::EmptyRound => {
            debug!("{sheet} row {line}: skipped ({reason})")
        }
        _ => warn!("{sheet} row {line}: skipped ({reason})"),
    }
}
