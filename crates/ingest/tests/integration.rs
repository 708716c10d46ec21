use std::path::{Path, PathBuf};

use ruckstats_core::{
    EntityCounts, Group, Match, MatchId, MatchTeamStats, MemoryStore, Store, StoreError, TeamId, TeamRoundStats,
};
use ruckstats_ingest::{run, upload_report, IngestError, IngestOptions, SkipReason};
use ruckstats_io::SqliteStore;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

// ---------------------------------------------------------------------------
// Workbook fixtures
// ---------------------------------------------------------------------------

enum Cell {
    S(&'static str),
    N(f64),
    /// Day fraction shown as a clock.
    Clock(f64),
}

use Cell::{Clock, N, S};

struct Round {
    team: &'static str,
    round: f64,
    scored: f64,
    conceded: f64,
}

struct Fixture {
    team1: &'static str,
    team2: &'static str,
    round: f64,
    points: (f64, f64),
    tries: (f64, f64),
}

fn clubs_cells(r: &Round) -> Vec<Cell> {
    let mut cells = vec![S(r.team), N(r.round), N(r.scored), N(r.conceded), N(r.scored + r.conceded)];
    cells.extend([3.0, 1.0, 4.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0].map(N));
    cells.push(S("00:28:06"));
    cells.push(S("12:34"));
    cells.push(N(0.52));
    cells.extend([14.0, 90.0, 10.0].map(N));
    cells.push(N(0.9));
    cells.extend([4.0, 60.0].map(N));
    cells.push(N(0.95));
    cells.push(N(8.0));
    cells.push(N(0.875));
    cells.extend([2.0, 12.0].map(N));
    cells.push(N(0.83));
    cells.extend([9.0, 3.0, 1.0, 2.0, 1.0, 1.0, 1.0, 0.0].map(N));
    cells
}

fn match_cells(f: &Fixture) -> Vec<Cell> {
    let mut cells = vec![
        S(f.team1),
        S(f.team2),
        N(f.round),
        S("Paulo Duarte"),
        N(f.points.0),
        N(f.points.1),
        N(f.points.0 + f.points.1),
        N(f.tries.0),
        N(f.tries.1),
        N(f.tries.0 + f.tries.1),
        N(2.0),
        N(1.0),
        Clock(1686.0 / 86_400.0),
        N(35.0),
        N(130.0),
        N(0.94),
        N(0.91),
    ];
    cells.extend([15.0, 9.0, 6.0, 25.0, 14.0, 11.0, 21.0, 11.0, 10.0, 7.0, 3.0, 4.0, 2.0].map(N));
    cells
}

fn write_row(sheet: &mut Worksheet, row: u32, cells: &[Cell]) {
    let clock = Format::new().set_num_format("hh:mm:ss");
    for (col, cell) in cells.iter().enumerate() {
        let col = col as u16;
        match cell {
            S(s) => sheet.write_string(row, col, *s).map(|_| ()),
            N(n) => sheet.write_number(row, col, *n).map(|_| ()),
            Clock(n) => sheet.write_number_with_format(row, col, *n, &clock).map(|_| ()),
        }
        .unwrap();
    }
}

/// Title row, blank row, header, then data; aggregate row appended.
fn write_workbook(path: &Path, rounds: &[Round], fixtures: &[Fixture]) {
    let mut workbook = Workbook::new();

    let clubs = workbook.add_worksheet();
    clubs.set_name("Info Clubes").unwrap();
    clubs.write_string(0, 0, "Campeonato Nacional").unwrap();
    write_row(clubs, 2, &[S("Equipa"), S("Jornada"), S("Pontos marcados")]);
    let mut row = 3;
    for r in rounds {
        write_row(clubs, row, &clubs_cells(r));
        row += 1;
    }
    write_row(clubs, row, &[S("TOTAIS"), N(0.0), N(500.0)]);

    let games = workbook.add_worksheet();
    games.set_name("Info Jogo").unwrap();
    write_row(games, 0, &[S("Equipa 1"), S("Equipa 2"), S("Jornada")]);
    let mut row = 1;
    for f in fixtures {
        write_row(games, row, &match_cells(f));
        row += 1;
    }
    write_row(games, row, &[S("MÉDIA")]);

    workbook.save(path).unwrap();
}

fn round(team: &'static str, round: f64, scored: f64, conceded: f64) -> Round {
    Round { team, round, scored, conceded }
}

fn fixture(team1: &'static str, team2: &'static str, round: f64, points: (f64, f64), tries: (f64, f64)) -> Fixture {
    Fixture { team1, team2, round, points, tries }
}

/// Two rounds for four teams, including the known Montemor v Cascais
/// export error and one row for a team outside the roster.
fn league_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("report.xlsx");
    write_workbook(
        &path,
        &[
            round("Benfica", 1.0, 27.0, 20.0),
            round("Direito", 1.0, 20.0, 27.0),
            round("Montemor", 1.0, 0.0, 110.0),
            round("Cascais", 1.0, 110.0, 0.0),
            round("Benfica", 2.0, 15.0, 15.0),
            round("Montemor", 2.0, 15.0, 15.0),
            round("Direito", 3.0, 0.0, 0.0),
        ],
        &[
            fixture("Benfica", "Direito", 1.0, (27.0, 20.0), (4.0, 3.0)),
            fixture("Montemor", "Cascais", 1.0, (110.0, 0.0), (18.0, 0.0)),
            fixture("Benfica", "Montemor", 2.0, (15.0, 15.0), (2.0, 2.0)),
            fixture("Benfica", "Lousã", 2.0, (40.0, 0.0), (6.0, 0.0)),
        ],
    );
    path
}

fn stats_by_team<'a>(store: &'a MemoryStore, name: &str, round: u32) -> &'a TeamRoundStats {
    let id = store.team_by_name(name).unwrap().id;
    store.round_stats_for(id, round).unwrap()
}

// ---------------------------------------------------------------------------
// Pipeline runs
// ---------------------------------------------------------------------------

#[test]
fn full_run_into_memory_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = league_workbook(dir.path());
    let mut store = MemoryStore::new();

    let report = run(&path, &mut store, &IngestOptions::default()).unwrap();

    assert_eq!(report.teams_created, 4);
    assert_eq!(report.round_stats_processed, 6);
    // Unplayed round 3 plus the TOTAIS row
    assert_eq!(report.round_stats_skipped, 2);
    assert_eq!(report.matches_processed, 3);
    // Unknown team plus the MÉDIA row
    assert_eq!(report.matches_skipped, 2);
    assert_eq!(report.patches_applied, 1);
    assert_eq!(report.reconciliation_misses, 0);
    assert_eq!(report.counts.teams, 4);
    assert_eq!(report.counts.matches, 3);
    assert_eq!(report.counts.team_round_stats, 6);
    assert_eq!(report.counts.match_team_stats, 6);

    assert_eq!(stats_by_team(&store, "Benfica", 1).match_points, 5);
    assert_eq!(stats_by_team(&store, "Direito", 1).match_points, 1);
    assert_eq!(stats_by_team(&store, "Benfica", 2).match_points, 2);
    assert_eq!(stats_by_team(&store, "Montemor", 2).match_points, 2);
    // Corrected: Cascais won 110-0 with 18 tries
    assert_eq!(stats_by_team(&store, "Cascais", 1).match_points, 5);
    assert_eq!(stats_by_team(&store, "Montemor", 1).match_points, 0);

    let benfica = stats_by_team(&store, "Benfica", 1);
    assert_eq!(benfica.effective_time_seconds, 1686);
    assert_eq!(benfica.possession_seconds, 754);
    assert_eq!(benfica.scrums_won, 0.875);

    let corrected = store
        .matches()
        .iter()
        .find(|m| m.points_team2 == 110)
        .unwrap();
    assert_eq!((corrected.tries_team1, corrected.tries_team2), (0, 18));
    assert_eq!(corrected.effective_time_seconds, 1686);
    assert_eq!(corrected.referee.as_deref(), Some("Paulo Duarte"));
}

#[test]
fn unknown_team_match_row_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = league_workbook(dir.path());
    let mut store = MemoryStore::new();
    let report = run(&path, &mut store, &IngestOptions::default()).unwrap();

    let unknown: Vec<_> = report
        .skipped_rows
        .iter()
        .filter(|s| s.reason == SkipReason::UnknownTeam("Lousã".into()))
        .collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].sheet, "Info Jogo");
    assert_eq!(unknown[0].row, 5);
    assert!(store.team_by_name("Lousã").is_none());
}

/// Every stored entity with ids replaced by team names, in store order.
#[derive(Debug, PartialEq)]
struct Snapshot {
    teams: Vec<(String, Group)>,
    round_stats: Vec<(String, TeamRoundStats)>,
    matches: Vec<(String, String, Match)>,
    sides: Vec<(String, String, MatchTeamStats)>,
}

fn snapshot(store: &MemoryStore) -> Snapshot {
    let name_of = |id: TeamId| -> String {
        store.teams().iter().find(|t| t.id == id).unwrap().name.clone()
    };
    let blank_team = TeamId(Default::default());
    let blank_match = MatchId(Default::default());
    let fixture_of = |id: MatchId| -> String {
        let m = store.matches().iter().find(|m| m.id == id).unwrap();
        format!("{} v {} round {}", name_of(m.team1_id), name_of(m.team2_id), m.round)
    };

    Snapshot {
        teams: store.teams().iter().map(|t| (t.name.clone(), t.group)).collect(),
        round_stats: store
            .team_round_stats()
            .iter()
            .map(|s| (name_of(s.team_id), TeamRoundStats { team_id: blank_team, ..s.clone() }))
            .collect(),
        matches: store
            .matches()
            .iter()
            .map(|m| {
                let blank = Match { id: blank_match, team1_id: blank_team, team2_id: blank_team, ..m.clone() };
                (name_of(m.team1_id), name_of(m.team2_id), blank)
            })
            .collect(),
        sides: store
            .match_team_stats()
            .iter()
            .map(|s| {
                let blank = MatchTeamStats { match_id: blank_match, team_id: blank_team, ..s.clone() };
                (fixture_of(s.match_id), name_of(s.team_id), blank)
            })
            .collect(),
    }
}

#[test]
fn rerun_produces_identical_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = league_workbook(dir.path());
    let mut store = MemoryStore::new();

    let first = run(&path, &mut store, &IngestOptions::default()).unwrap();
    let first_snapshot = snapshot(&store);
    let first_team_ids: Vec<_> = store.teams().iter().map(|t| t.id).collect();
    let first_match_ids: Vec<_> = store.matches().iter().map(|m| m.id).collect();

    let second = run(&path, &mut store, &IngestOptions::default()).unwrap();

    assert_eq!(first.counts, second.counts);
    assert_eq!(first.skipped_rows, second.skipped_rows);
    // Ids are fresh each run; everything else must match
    let second_snapshot = snapshot(&store);
    assert_eq!(first_snapshot, second_snapshot);
    assert_eq!(second_snapshot.matches.len(), 3);
    assert_eq!(second_snapshot.sides.len(), 6);
    let names: Vec<_> = second_snapshot.teams.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["Benfica", "Direito", "Montemor", "Cascais"]);
    assert!(store.teams().iter().all(|t| !first_team_ids.contains(&t.id)));
    assert!(store.matches().iter().all(|m| !first_match_ids.contains(&m.id)));
}

#[test]
fn round_stats_keys_are_unique() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    write_workbook(
        &path,
        &[round("Benfica", 1.0, 27.0, 20.0), round("Benfica", 1.0, 30.0, 3.0), round("Direito", 1.0, 20.0, 27.0)],
        &[],
    );

    let mut store = MemoryStore::new();
    let err = run(&path, &mut store, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Store(StoreError::UniqueViolation(_))), "{err}");
    // Rows before the failure stay; nothing after it was written
    assert_eq!(store.team_round_stats().len(), 1);
    assert_eq!(store.team_round_stats()[0].points_scored, 27);

    let mut store = SqliteStore::open_in_memory().unwrap();
    let err = run(&path, &mut store, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Store(StoreError::UniqueViolation(_))), "{err}");
}

/// Every column of every table, team and match ids replaced by names.
fn sqlite_rows(store: &SqliteStore) -> Vec<String> {
    let queries = [
        "SELECT name, group_name FROM teams ORDER BY name",
        "SELECT t.name, s.* FROM team_round_stats s JOIN teams t ON t.id = s.team_id ORDER BY t.name, s.round",
        "SELECT a.name, b.name, m.* FROM matches m \
         JOIN teams a ON a.id = m.team1_id JOIN teams b ON b.id = m.team2_id ORDER BY m.round, a.name",
        "SELECT a.name, b.name, m.round, t.name, s.* FROM match_team_stats s \
         JOIN matches m ON m.id = s.match_id JOIN teams t ON t.id = s.team_id \
         JOIN teams a ON a.id = m.team1_id JOIN teams b ON b.id = m.team2_id \
         ORDER BY m.round, a.name, s.is_home_team",
    ];
    let mut out = Vec::new();
    for sql in queries {
        let mut stmt = store.connection().prepare(sql).unwrap();
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
        let mut rows = stmt.query([]).unwrap();
        while let Some(row) = rows.next().unwrap() {
            let mut fields = Vec::new();
            for (i, column) in names.iter().enumerate() {
                if column.ends_with("id") {
                    continue;
                }
                let value: rusqlite::types::Value = row.get(i).unwrap();
                fields.push(format!("{column}={value:?}"));
            }
            out.push(fields.join(","));
        }
    }
    out
}

#[test]
fn sqlite_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = league_workbook(dir.path());
    let mut store = SqliteStore::open_in_memory().unwrap();

    let report = run(&path, &mut store, &IngestOptions::default()).unwrap();
    assert_eq!(report.counts.teams, 4);
    assert_eq!(report.counts.matches, 3);
    assert_eq!(report.counts.team_round_stats, 6);
    assert_eq!(report.counts.match_team_stats, 6);

    let first_rows = sqlite_rows(&store);
    assert_eq!(first_rows.len(), 4 + 6 + 3 + 6);

    let again = run(&path, &mut store, &IngestOptions::default()).unwrap();
    assert_eq!(again.counts, report.counts);
    assert_eq!(sqlite_rows(&store), first_rows);

    let cascais: String = store
        .connection()
        .query_row("SELECT id FROM teams WHERE name = 'Cascais'", [], |row| row.get(0))
        .unwrap();
    let cascais = ruckstats_core::TeamId(cascais.parse().unwrap());
    assert_eq!(store.match_points(cascais, 1).unwrap(), Some(5));
}

#[test]
fn sqlite_file_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = league_workbook(dir.path());
    let db = dir.path().join("data").join("ruckstats.db");
    {
        let mut store = SqliteStore::open(&db).unwrap();
        run(&path, &mut store, &IngestOptions::default()).unwrap();
    }
    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.counts().unwrap().matches, 3);
}

#[test]
fn missing_sheet_after_clear_leaves_store_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = league_workbook(dir.path());
    let mut store = MemoryStore::new();
    run(&path, &mut store, &IngestOptions::default()).unwrap();
    assert_eq!(store.counts().unwrap().teams, 4);

    let options = IngestOptions { matches_sheet: "Jogos".into(), ..Default::default() };
    let err = run(&path, &mut store, &options).unwrap_err();
    assert!(matches!(err, IngestError::Workbook(_)));
    assert!(err.to_string().contains("Jogos"));
    // No rows from the earlier run survive
    assert_eq!(store.counts().unwrap(), EntityCounts::default());
}

#[test]
fn unopenable_workbook_keeps_previous_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = league_workbook(dir.path());
    let mut store = MemoryStore::new();
    run(&path, &mut store, &IngestOptions::default()).unwrap();
    let before = store.counts().unwrap();

    let err = run(&dir.path().join("absent.xlsx"), &mut store, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Workbook(_)));
    assert_eq!(store.counts().unwrap(), before);
}

#[test]
fn unreadable_workbook_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = MemoryStore::new();
    let err = run(&dir.path().join("absent.xlsx"), &mut store, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Workbook(_)));
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[test]
fn upload_ingests_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = league_workbook(dir.path());
    let bytes = std::fs::read(&path).unwrap();
    let mut store = MemoryStore::new();

    let outcome = upload_report("relatorio.xlsx", &bytes, &mut store, &IngestOptions::default());
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.message, "Ingestion complete! Processed 3 matches.");
    assert_eq!(outcome.match_count, Some(3));
    assert_eq!(store.counts().unwrap().teams, 4);
}

#[test]
fn upload_reports_missing_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.xlsx");
    let mut workbook = Workbook::new();
    workbook.add_worksheet().set_name("Folha1").unwrap();
    workbook.save(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();

    let mut store = MemoryStore::new();
    let outcome = upload_report("other.xlsx", &bytes, &mut store, &IngestOptions::default());
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Failed to process file: sheet 'Info Clubes' not found"));
}
