// Run summary returned by the pipeline and printed by the CLI

use std::fmt;

use ruckstats_core::EntityCounts;
use serde::Serialize;

/// Why a source row produced no entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// `TOTAIS` / `MÉDIA` / `TOTAL` label in column 0.
    AggregateRow,
    /// Team cell blank or not text.
    MissingTeamName,
    /// Round is zero, negative, or not a number.
    NoRound,
    /// Scored, conceded and total points all zero: a round not yet played.
    EmptyRound,
    /// Team name not present in the roster.
    UnknownTeam(String),
    /// A duration cell could not be parsed.
    Malformed(String),
    /// Field validation failed.
    Invalid(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AggregateRow => write!(f, "aggregate row"),
            Self::MissingTeamName => write!(f, "missing team name"),
            Self::NoRound => write!(f, "no round number"),
            Self::EmptyRound => write!(f, "round not played"),
            Self::UnknownTeam(name) => write!(f, "unknown team '{name}'"),
            Self::Malformed(msg) => write!(f, "{msg}"),
            Self::Invalid(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub sheet: String,
    /// 1-based row number as shown by a spreadsheet application.
    pub row: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub teams_created: usize,
    pub round_stats_processed: usize,
    pub round_stats_skipped: usize,
    pub matches_processed: usize,
    pub matches_skipped: usize,
    /// Match sides whose (team, round) had no round-stats row to update.
    pub reconciliation_misses: usize,
    pub patches_applied: usize,
    pub skipped_rows: Vec<SkippedRow>,
    pub counts: EntityCounts,
}

impl IngestReport {
    pub fn summary(&self) -> String {
        format!(
            "{} teams, {} round stats ({} skipped), {} matches ({} skipped), {} match sides, {} reconciliation misses",
            self.counts.teams,
            self.counts.team_round_stats,
            self.round_stats_skipped,
            self.counts.matches,
            self.matches_skipped,
            self.counts.match_team_stats,
            self.reconciliation_misses,
        )
    }

    pub(crate) fn skip(&mut self, sheet: &str, row: usize, reason: SkipReason) {
        self.skipped_rows.push(SkippedRow { sheet: sheet.to_string(), row, reason });
    }
}
