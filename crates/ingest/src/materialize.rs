//! Row → entity materialization for both sheets.
//!
//! Each row is either created or skipped with a reason. Only store failures
//! are errors.

use ruckstats_core::cell::cell_at;
use ruckstats_core::layout::is_aggregate_label;
use ruckstats_core::{CellValue, Match, MatchTeamStats, Store, StoreError, TeamRoundStats};

use crate::columns::{clubs, matches};
use crate::corrections::apply_known_corrections;
use crate::normalize::number_or;
use crate::registry::TeamRegistry;
use crate::report::SkipReason;
use crate::schema::{describe, validate_match, validate_team_round, RawMatchRow, RawTeamRoundRow};

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<T> {
    Created(T),
    Skipped(SkipReason),
}

/// A stored match plus whether a known correction was applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedMatch {
    pub record: Match,
    pub corrected: bool,
}

/// Source cells as a JSON array, kept on every stored row.
pub fn raw_row_json(row: &[CellValue]) -> String {
    serde_json::to_string(row).unwrap_or_else(|_| String::from("[]"))
}

/// The two per-side rows of a match; team1 is the home side.
pub fn match_sides(m: &Match) -> [MatchTeamStats; 2] {
    [
        MatchTeamStats {
            match_id: m.id,
            team_id: m.team1_id,
            is_home_team: true,
            points: m.points_team1,
            tries: m.tries_team1,
            ruck_success: m.ruck_success_team1,
            scrums: m.scrums_team1,
            lineouts: m.lineouts_team1,
            penalties: m.penalties_team1,
        },
        MatchTeamStats {
            match_id: m.id,
            team_id: m.team2_id,
            is_home_team: false,
            points: m.points_team2,
            tries: m.tries_team2,
            ruck_success: m.ruck_success_team2,
            scrums: m.scrums_team2,
            lineouts: m.lineouts_team2,
            penalties: m.penalties_team2,
        },
    ]
}

/// Writes entities for one run against the run's team registry.
pub struct Materializer<'a> {
    registry: &'a TeamRegistry,
    store: &'a mut dyn Store,
}

impl<'a> Materializer<'a> {
    pub fn new(registry: &'a TeamRegistry, store: &'a mut dyn Store) -> Self {
        Self { registry, store }
    }

    pub fn store(&mut self) -> &mut dyn Store {
        &mut *self.store
    }

    /// One `Info Clubes` row. A second row for a stored (team, round)
    /// fails with the store's unique violation.
    pub fn team_round(&mut self, row: &[CellValue]) -> Result<RowOutcome<TeamRoundStats>, StoreError> {
        let team = match team_cell(cell_at(row, clubs::TEAM)) {
            Ok(name) => name,
            Err(reason) => return Ok(RowOutcome::Skipped(reason)),
        };

        if number_or(cell_at(row, clubs::ROUND), 0.0) <= 0.0 {
            return Ok(RowOutcome::Skipped(SkipReason::NoRound));
        }

        let unplayed = [clubs::POINTS_SCORED, clubs::POINTS_CONCEDED, clubs::TOTAL_MATCH_POINTS]
            .iter()
            .all(|&col| number_or(cell_at(row, col), 0.0) == 0.0);
        if unplayed {
            return Ok(RowOutcome::Skipped(SkipReason::EmptyRound));
        }

        let Some(team_id) = self.registry.resolve(team) else {
            return Ok(RowOutcome::Skipped(SkipReason::UnknownTeam(team.to_string())));
        };

        let raw = match RawTeamRoundRow::from_cells(row) {
            Ok(raw) => raw,
            Err(e) => return Ok(RowOutcome::Skipped(SkipReason::Malformed(e.to_string()))),
        };
        let stats = match validate_team_round(&raw, team_id, raw_row_json(row)) {
            Ok(stats) => stats,
            Err(errors) => return Ok(RowOutcome::Skipped(SkipReason::Invalid(describe(&errors)))),
        };

        self.store.create_team_round_stats(&stats)?;
        Ok(RowOutcome::Created(stats))
    }

    /// One `Info Jogo` row: the match and both of its sides.
    pub fn fixture(&mut self, row: &[CellValue]) -> Result<RowOutcome<MaterializedMatch>, StoreError> {
        let team1 = match team_cell(cell_at(row, matches::TEAM1)) {
            Ok(name) => name,
            Err(reason) => return Ok(RowOutcome::Skipped(reason)),
        };
        let Some(team2) = cell_at(row, matches::TEAM2).non_empty_text() else {
            return Ok(RowOutcome::Skipped(SkipReason::MissingTeamName));
        };

        let (team1_id, team2_id) = match (self.registry.resolve(team1), self.registry.resolve(team2)) {
            (Some(a), Some(b)) => (a, b),
            (None, _) => return Ok(RowOutcome::Skipped(SkipReason::UnknownTeam(team1.to_string()))),
            (_, None) => return Ok(RowOutcome::Skipped(SkipReason::UnknownTeam(team2.to_string()))),
        };

        let mut raw = match RawMatchRow::from_cells(row) {
            Ok(raw) => raw,
            Err(e) => return Ok(RowOutcome::Skipped(SkipReason::Malformed(e.to_string()))),
        };
        let corrected = apply_known_corrections(&mut raw);

        let record = match validate_match(&raw, team1_id, team2_id, raw_row_json(row)) {
            Ok(m) => m,
            Err(errors) => return Ok(RowOutcome::Skipped(SkipReason::Invalid(describe(&errors)))),
        };

        self.store.create_match(&record)?;
        self.store.create_match_team_stats(&match_sides(&record))?;
        Ok(RowOutcome::Created(MaterializedMatch { record, corrected }))
    }
}

/// Team name from column 0, or why the row carries none.
fn team_cell(cell: &CellValue) -> Result<&str, SkipReason> {
    match cell.non_empty_text() {
        Some(name) if is_aggregate_label(name) => Err(SkipReason::AggregateRow),
        Some(name) => Ok(name),
        None => Err(SkipReason::MissingTeamName),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tests::{clubs_row, match_row};
    use ruckstats_config::GroupSettings;
    use ruckstats_core::MemoryStore;

    fn registry(store: &mut MemoryStore, names: &[&str]) -> TeamRegistry {
        let rows: Vec<Vec<CellValue>> =
            names.iter().map(|n| vec![CellValue::Text(n.to_string())]).collect();
        TeamRegistry::build(&rows, &GroupSettings::default(), store).unwrap()
    }

    fn skipped<T: std::fmt::Debug>(outcome: RowOutcome<T>) -> SkipReason {
        match outcome {
            RowOutcome::Skipped(reason) => reason,
            RowOutcome::Created(v) => panic!("expected skip, got {v:?}"),
        }
    }

    #[test]
    fn team_round_created_with_zero_points() {
        let mut store = MemoryStore::new();
        let teams = registry(&mut store, &["Benfica"]);
        let mut m = Materializer::new(&teams, &mut store);
        let outcome = m.team_round(&clubs_row("Benfica", 3.0, 27.0, 20.0)).unwrap();
        let RowOutcome::Created(stats) = outcome else { panic!("not created") };
        assert_eq!(stats.round, 3);
        assert_eq!(stats.match_points, 0);
        assert!(stats.raw_row_json.starts_with("[\"Benfica\",3.0,27.0,20.0"));
        assert_eq!(store.team_round_stats().len(), 1);
    }

    #[test]
    fn team_round_skips() {
        let mut store = MemoryStore::new();
        let teams = registry(&mut store, &["Benfica"]);
        let mut m = Materializer::new(&teams, &mut store);

        assert_eq!(skipped(m.team_round(&clubs_row("TOTAIS", 1.0, 27.0, 20.0)).unwrap()), SkipReason::AggregateRow);
        assert_eq!(skipped(m.team_round(&[CellValue::Number(4.0)]).unwrap()), SkipReason::MissingTeamName);
        assert_eq!(skipped(m.team_round(&clubs_row("Benfica", 0.0, 27.0, 20.0)).unwrap()), SkipReason::NoRound);
        assert_eq!(skipped(m.team_round(&clubs_row("Benfica", 5.0, 0.0, 0.0)).unwrap()), SkipReason::EmptyRound);
        assert_eq!(
            skipped(m.team_round(&clubs_row("Lousã", 1.0, 27.0, 20.0)).unwrap()),
            SkipReason::UnknownTeam("Lousã".into())
        );

        let mut bad = clubs_row("Benfica", 1.0, 27.0, 20.0);
        bad[clubs::TACKLE_SUCCESS_RATE] = CellValue::Number(90.0);
        assert!(matches!(skipped(m.team_round(&bad).unwrap()), SkipReason::Invalid(_)));

        assert!(store.team_round_stats().is_empty());
    }

    #[test]
    fn duplicate_team_round_is_a_store_error() {
        let mut store = MemoryStore::new();
        let teams = registry(&mut store, &["CDUL"]);
        let mut m = Materializer::new(&teams, &mut store);
        assert!(matches!(m.team_round(&clubs_row("CDUL", 2.0, 10.0, 5.0)).unwrap(), RowOutcome::Created(_)));
        let err = m.team_round(&clubs_row("CDUL", 2.0, 12.0, 5.0)).unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
        assert_eq!(store.team_round_stats().len(), 1);
        assert_eq!(store.team_round_stats()[0].points_scored, 10);
    }

    #[test]
    fn fixture_creates_match_and_sides() {
        let mut store = MemoryStore::new();
        let teams = registry(&mut store, &["Benfica", "Direito"]);
        let mut m = Materializer::new(&teams, &mut store);
        let row = match_row("Benfica", "Direito", 2.0, (27.0, 20.0), (4.0, 3.0));
        let RowOutcome::Created(made) = m.fixture(&row).unwrap() else { panic!("not created") };
        assert!(!made.corrected);

        assert_eq!(store.matches().len(), 1);
        let sides = store.match_team_stats();
        assert_eq!(sides.len(), 2);
        assert!(sides[0].is_home_team);
        assert_eq!(sides[0].team_id, teams.resolve("Benfica").unwrap());
        assert_eq!((sides[0].points, sides[1].points), (27, 20));
        assert_eq!((sides[0].ruck_success, sides[1].ruck_success), (0.94, 0.91));
        assert_eq!((sides[0].penalties, sides[1].penalties), (11, 10));
        assert!(!sides[1].is_home_team);
    }

    #[test]
    fn fixture_skips() {
        let mut store = MemoryStore::new();
        let teams = registry(&mut store, &["Benfica", "Direito"]);
        let mut m = Materializer::new(&teams, &mut store);

        let mut row = match_row("Benfica", "Direito", 2.0, (27.0, 20.0), (4.0, 3.0));
        row[matches::TEAM2] = CellValue::Empty;
        assert_eq!(skipped(m.fixture(&row).unwrap()), SkipReason::MissingTeamName);

        let row = match_row("MÉDIA", "Direito", 2.0, (27.0, 20.0), (4.0, 3.0));
        assert_eq!(skipped(m.fixture(&row).unwrap()), SkipReason::AggregateRow);

        let row = match_row("Benfica", "Lousã", 2.0, (27.0, 20.0), (4.0, 3.0));
        assert_eq!(skipped(m.fixture(&row).unwrap()), SkipReason::UnknownTeam("Lousã".into()));

        let row = match_row("Benfica", "Benfica", 2.0, (27.0, 20.0), (4.0, 3.0));
        assert!(matches!(skipped(m.fixture(&row).unwrap()), SkipReason::Invalid(_)));

        assert!(store.matches().is_empty());
        assert!(store.match_team_stats().is_empty());
    }

    #[test]
    fn fixture_applies_correction() {
        let mut store = MemoryStore::new();
        let teams = registry(&mut store, &["Montemor", "Cascais"]);
        let mut m = Materializer::new(&teams, &mut store);
        let row = match_row("Montemor", "Cascais", 1.0, (110.0, 0.0), (18.0, 0.0));
        let RowOutcome::Created(made) = m.fixture(&row).unwrap() else { panic!("not created") };
        assert!(made.corrected);
        assert_eq!((made.record.points_team1, made.record.points_team2), (0, 110));
        assert_eq!((made.record.tries_team1, made.record.tries_team2), (0, 18));
    }
}
