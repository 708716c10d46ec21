// SQLite-backed store for the ingested league dataset

use std::path::Path;

use rusqlite::{params, Connection, ErrorCode};
use ruckstats_core::store::{EntityCounts, Store, StoreError};
use ruckstats_core::{Match, MatchTeamStats, Team, TeamId, TeamRoundStats};

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS teams (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    group_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS matches (
    id TEXT PRIMARY KEY,
    team1_id TEXT NOT NULL REFERENCES teams(id),
    team2_id TEXT NOT NULL REFERENCES teams(id),
    round INTEGER NOT NULL,
    referee TEXT,
    points_team1 INTEGER NOT NULL,
    points_team2 INTEGER NOT NULL,
    total_points INTEGER NOT NULL,
    tries_team1 INTEGER NOT NULL,
    tries_team2 INTEGER NOT NULL,
    total_tries INTEGER NOT NULL,
    tries_from_lineout INTEGER NOT NULL,
    tries_from_scrum INTEGER NOT NULL,
    effective_time_seconds INTEGER NOT NULL,
    kicking_game INTEGER NOT NULL,
    total_rucks INTEGER NOT NULL,
    ruck_success_team1 REAL NOT NULL,
    ruck_success_team2 REAL NOT NULL,
    total_scrums INTEGER NOT NULL,
    scrums_team1 INTEGER NOT NULL,
    scrums_team2 INTEGER NOT NULL,
    total_lineouts INTEGER NOT NULL,
    lineouts_team1 INTEGER NOT NULL,
    lineouts_team2 INTEGER NOT NULL,
    total_penalties INTEGER NOT NULL,
    penalties_team1 INTEGER NOT NULL,
    penalties_team2 INTEGER NOT NULL,
    penalties_defensive_ruck INTEGER NOT NULL,
    penalties_attacking_ruck INTEGER NOT NULL,
    penalties_offside INTEGER NOT NULL,
    penalties_tackle INTEGER NOT NULL,
    raw_row_json TEXT NOT NULL,
    CHECK (team1_id <> team2_id)
);

CREATE TABLE IF NOT EXISTS team_round_stats (
    team_id TEXT NOT NULL REFERENCES teams(id),
    round INTEGER NOT NULL,
    points_scored INTEGER NOT NULL,
    points_conceded INTEGER NOT NULL,
    match_points INTEGER NOT NULL DEFAULT 0,
    tries_scored INTEGER NOT NULL,
    tries_conceded INTEGER NOT NULL,
    tries_match INTEGER NOT NULL,
    tries_from_lineout INTEGER NOT NULL,
    tries_from_scrum INTEGER NOT NULL,
    tries_from_turnover INTEGER NOT NULL,
    tries_from_counter_attack INTEGER NOT NULL,
    tries_from_tap INTEGER NOT NULL,
    tries_from_penalty_scrum INTEGER NOT NULL,
    effective_time_seconds INTEGER NOT NULL,
    possession_seconds INTEGER NOT NULL,
    possession_percent REAL NOT NULL,
    kicking_game INTEGER NOT NULL,
    tackles_made INTEGER NOT NULL,
    tackles_missed INTEGER NOT NULL,
    tackle_success_rate REAL NOT NULL,
    line_breaks INTEGER NOT NULL,
    total_rucks INTEGER NOT NULL,
    ruck_success REAL NOT NULL,
    total_scrums INTEGER NOT NULL,
    scrums_won REAL NOT NULL,
    scrums_reset INTEGER NOT NULL,
    total_lineouts INTEGER NOT NULL,
    lineouts_won REAL NOT NULL,
    penalties_conceded INTEGER NOT NULL,
    pen_defensive_ruck INTEGER NOT NULL,
    pen_attacking_ruck INTEGER NOT NULL,
    pen_offside INTEGER NOT NULL,
    pen_tackle INTEGER NOT NULL,
    pen_lineout_maul INTEGER NOT NULL,
    pen_scrum INTEGER NOT NULL,
    pen_other INTEGER NOT NULL,
    raw_row_json TEXT NOT NULL,
    UNIQUE (team_id, round)
);

CREATE TABLE IF NOT EXISTS match_team_stats (
    match_id TEXT NOT NULL REFERENCES matches(id),
    team_id TEXT NOT NULL REFERENCES teams(id),
    is_home_team INTEGER NOT NULL,
    points INTEGER NOT NULL,
    tries INTEGER NOT NULL,
    ruck_success REAL NOT NULL,
    scrums INTEGER NOT NULL,
    lineouts INTEGER NOT NULL,
    penalties INTEGER NOT NULL,
    PRIMARY KEY (match_id, team_id)
);
"#;

/// Store backed by a SQLite database file (or an in-memory database).
pub struct SqliteStore {
    conn: Connection,
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Map constraint failures to the store's key/reference errors.
fn constraint(what: impl FnOnce() -> String) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |e| match &e {
        rusqlite::Error::SqliteFailure(err, msg) if err.code == ErrorCode::ConstraintViolation => {
            let detail = msg.clone().unwrap_or_default();
            if detail.contains("FOREIGN KEY") {
                StoreError::MissingReference(what())
            } else {
                StoreError::UniqueViolation(format!("{} ({detail})", what()))
            }
        }
        _ => backend(e),
    }
}

impl SqliteStore {
    /// Open (creating if needed) a database file and ensure the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.to_string()))?;
            }
        }
        let conn = Connection::open(path).map_err(backend)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(backend)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// League points currently stored for (team, round).
    pub fn match_points(&self, team_id: TeamId, round: u32) -> Result<Option<u32>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT match_points FROM team_round_stats WHERE team_id = ?1 AND round = ?2")
            .map_err(backend)?;
        let mut rows = stmt
            .query_map(params![team_id.to_string(), round], |row| row.get::<_, u32>(0))
            .map_err(backend)?;
        rows.next().transpose().map_err(backend)
    }

    fn count(&self, table: &str) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .map_err(backend)?;
        Ok(n as usize)
    }
}

impl Store for SqliteStore {
    fn clear_all(&mut self) -> Result<(), StoreError> {
        // Children first so foreign keys hold at every step
        for table in ["match_team_stats", "team_round_stats", "matches", "teams"] {
            self.conn
                .execute(&format!("DELETE FROM {table}"), [])
                .map_err(backend)?;
        }
        Ok(())
    }

    fn create_team(&mut self, team: &Team) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO teams (id, name, group_name) VALUES (?1, ?2, ?3)",
                params![team.id.to_string(), team.name, team.group.label()],
            )
            .map_err(constraint(|| format!("team '{}'", team.name)))?;
        Ok(())
    }

    fn create_team_round_stats(&mut self, s: &TeamRoundStats) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO team_round_stats (
                    team_id, round, points_scored, points_conceded, match_points,
                    tries_scored, tries_conceded, tries_match, tries_from_lineout, tries_from_scrum,
                    tries_from_turnover, tries_from_counter_attack, tries_from_tap, tries_from_penalty_scrum,
                    effective_time_seconds, possession_seconds, possession_percent, kicking_game,
                    tackles_made, tackles_missed, tackle_success_rate, line_breaks, total_rucks,
                    ruck_success, total_scrums, scrums_won, scrums_reset, total_lineouts, lineouts_won,
                    penalties_conceded, pen_defensive_ruck, pen_attacking_ruck, pen_offside, pen_tackle,
                    pen_lineout_maul, pen_scrum, pen_other, raw_row_json
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19,
                    ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32, ?33, ?34, ?35, ?36,
                    ?37, ?38
                )",
                params![
                    s.team_id.to_string(),
                    s.round,
                    s.points_scored,
                    s.points_conceded,
                    s.match_points,
                    s.tries_scored,
                    s.tries_conceded,
                    s.tries_match,
                    s.tries_from_lineout,
                    s.tries_from_scrum,
                    s.tries_from_turnover,
                    s.tries_from_counter_attack,
                    s.tries_from_tap,
                    s.tries_from_penalty_scrum,
                    s.effective_time_seconds,
                    s.possession_seconds,
                    s.possession_percent,
                    s.kicking_game,
                    s.tackles_made,
                    s.tackles_missed,
                    s.tackle_success_rate,
                    s.line_breaks,
                    s.total_rucks,
                    s.ruck_success,
                    s.total_scrums,
                    s.scrums_won,
                    s.scrums_reset,
                    s.total_lineouts,
                    s.lineouts_won,
                    s.penalties_conceded,
                    s.pen_defensive_ruck,
                    s.pen_attacking_ruck,
                    s.pen_offside,
                    s.pen_tackle,
                    s.pen_lineout_maul,
                    s.pen_scrum,
                    s.pen_other,
                    s.raw_row_json,
                ],
            )
            .map_err(constraint(|| format!("team round stats ({}, round {})", s.team_id, s.round)))?;
        Ok(())
    }

    fn create_match(&mut self, m: &Match) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO matches (
                    id, team1_id, team2_id, round, referee, points_team1, points_team2, total_points,
                    tries_team1, tries_team2, total_tries, tries_from_lineout, tries_from_scrum,
                    effective_time_seconds, kicking_game, total_rucks, ruck_success_team1,
                    ruck_success_team2, total_scrums, scrums_team1, scrums_team2, total_lineouts,
                    lineouts_team1, lineouts_team2, total_penalties, penalties_team1, penalties_team2,
                    penalties_defensive_ruck, penalties_attacking_ruck, penalties_offside,
                    penalties_tackle, raw_row_json
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18,
                    ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32
                )",
                params![
                    m.id.to_string(),
                    m.team1_id.to_string(),
                    m.team2_id.to_string(),
                    m.round,
                    m.referee,
                    m.points_team1,
                    m.points_team2,
                    m.total_points,
                    m.tries_team1,
                    m.tries_team2,
                    m.total_tries,
                    m.tries_from_lineout,
                    m.tries_from_scrum,
                    m.effective_time_seconds,
                    m.kicking_game,
                    m.total_rucks,
                    m.ruck_success_team1,
                    m.ruck_success_team2,
                    m.total_scrums,
                    m.scrums_team1,
                    m.scrums_team2,
                    m.total_lineouts,
                    m.lineouts_team1,
                    m.lineouts_team2,
                    m.total_penalties,
                    m.penalties_team1,
                    m.penalties_team2,
                    m.penalties_defensive_ruck,
                    m.penalties_attacking_ruck,
                    m.penalties_offside,
                    m.penalties_tackle,
                    m.raw_row_json,
                ],
            )
            .map_err(constraint(|| format!("match {}", m.id)))?;
        Ok(())
    }

    fn create_match_team_stats(&mut self, sides: &[MatchTeamStats; 2]) -> Result<(), StoreError> {
        let tx = self.conn.transaction().map_err(backend)?;
        for side in sides {
            tx.execute(
                "INSERT INTO match_team_stats (
                    match_id, team_id, is_home_team, points, tries, ruck_success, scrums, lineouts, penalties
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    side.match_id.to_string(),
                    side.team_id.to_string(),
                    side.is_home_team,
                    side.points,
                    side.tries,
                    side.ruck_success,
                    side.scrums,
                    side.lineouts,
                    side.penalties,
                ],
            )
            .map_err(constraint(|| format!("match team stats ({}, {})", side.match_id, side.team_id)))?;
        }
        tx.commit().map_err(backend)
    }

    fn update_match_points(
        &mut self,
        team_id: TeamId,
        round: u32,
        match_points: u32,
    ) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute(
                "UPDATE team_round_stats SET match_points = ?1 WHERE team_id = ?2 AND round = ?3",
                params![match_points, team_id.to_string(), round],
            )
            .map_err(backend)?;
        Ok(changed > 0)
    }

    fn counts(&self) -> Result<EntityCounts, StoreError> {
        Ok(EntityCounts {
            teams: self.count("teams")?,
            matches: self.count("matches")?,
            team_round_stats: self.count("team_round_stats")?,
            match_team_stats: self.count("match_team_stats")?,
        })
    }
}
