//! Row shapes for the two sheets and their validation.
//!
//! A `Raw*Row` holds coerced but unchecked values straight from the cells.
//! Validation checks every field, collects all failures, and only then
//! produces the entity. A failed row is skipped by the caller; validation
//! never aborts the run.

use std::fmt;

use ruckstats_core::cell::cell_at;
use ruckstats_core::{CellValue, Match, MatchId, TeamId, TeamRoundStats};

use crate::columns::{clubs, matches};
use crate::normalize::{fraction_or, match_duration_secs, number_or, possession_secs, MalformedDuration};

// ---------------------------------------------------------------------------
// Field errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub problem: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

pub fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collects field failures; returns a placeholder so checking continues.
#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &'static str, problem: String) {
        self.errors.push(FieldError { field, problem });
    }

    fn whole(&mut self, field: &'static str, value: f64) -> Option<u32> {
        if !value.is_finite() {
            self.fail(field, format!("expected a number, got {value}"));
            None
        } else if value.fract() != 0.0 {
            self.fail(field, format!("expected an integer, got {value}"));
            None
        } else if value < 0.0 {
            self.fail(field, format!("must be non-negative, got {value}"));
            None
        } else if value > f64::from(u32::MAX) {
            self.fail(field, format!("{value} is out of range"));
            None
        } else {
            Some(value as u32)
        }
    }

    /// Non-negative integer.
    fn count(&mut self, field: &'static str, value: f64) -> u32 {
        self.whole(field, value).unwrap_or(0)
    }

    /// Integer ≥ 1.
    fn positive(&mut self, field: &'static str, value: f64) -> u32 {
        match self.whole(field, value) {
            Some(0) => {
                self.fail(field, "must be positive, got 0".into());
                0
            }
            Some(n) => n,
            None => 0,
        }
    }

    /// Fraction in [0, 1].
    fn rate(&mut self, field: &'static str, value: f64) -> f64 {
        if !(0.0..=1.0).contains(&value) {
            self.fail(field, format!("must be within [0, 1], got {value}"));
        }
        value
    }

    fn name(&mut self, field: &'static str, value: &str) {
        if value.is_empty() {
            self.fail(field, "must not be empty".into());
        }
    }

    fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

// ---------------------------------------------------------------------------
// Info Clubes
// ---------------------------------------------------------------------------

/// A team-round row after cell coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTeamRoundRow {
    pub team: String,
    pub round: f64,
    pub points_scored: f64,
    pub points_conceded: f64,
    pub total_match_points: f64,
    pub tries_scored: f64,
    pub tries_conceded: f64,
    pub tries_match: f64,
    pub tries_from_lineout: f64,
    pub tries_from_scrum: f64,
    pub tries_from_turnover: f64,
    pub tries_from_counter_attack: f64,
    pub tries_from_tap: f64,
    pub tries_from_penalty_scrum: f64,
    pub effective_time_seconds: f64,
    pub possession_seconds: f64,
    pub possession_percent: f64,
    pub kicking_game: f64,
    pub tackles_made: f64,
    pub tackles_missed: f64,
    pub tackle_success_rate: f64,
    pub line_breaks: f64,
    pub total_rucks: f64,
    pub ruck_success: f64,
    pub total_scrums: f64,
    pub scrums_won: f64,
    pub scrums_reset: f64,
    pub total_lineouts: f64,
    pub lineouts_won: f64,
    pub penalties_conceded: f64,
    pub pen_defensive_ruck: f64,
    pub pen_attacking_ruck: f64,
    pub pen_offside: f64,
    pub pen_tackle: f64,
    pub pen_lineout_maul: f64,
    pub pen_scrum: f64,
    pub pen_other: f64,
}

impl RawTeamRoundRow {
    pub fn from_cells(row: &[CellValue]) -> Result<Self, MalformedDuration> {
        let num = |col: usize| number_or(cell_at(row, col), 0.0);
        let rate = |col: usize| fraction_or(cell_at(row, col), 0.0);

        Ok(Self {
            team: cell_at(row, clubs::TEAM).as_text().unwrap_or_default().to_string(),
            round: num(clubs::ROUND),
            points_scored: num(clubs::POINTS_SCORED),
            points_conceded: num(clubs::POINTS_CONCEDED),
            total_match_points: num(clubs::TOTAL_MATCH_POINTS),
            tries_scored: num(clubs::TRIES_SCORED),
            tries_conceded: num(clubs::TRIES_CONCEDED),
            tries_match: num(clubs::TRIES_MATCH),
            tries_from_lineout: num(clubs::TRIES_FROM_LINEOUT),
            tries_from_scrum: num(clubs::TRIES_FROM_SCRUM),
            tries_from_turnover: num(clubs::TRIES_FROM_TURNOVER),
            tries_from_counter_attack: num(clubs::TRIES_FROM_COUNTER_ATTACK),
            tries_from_tap: num(clubs::TRIES_FROM_TAP),
            tries_from_penalty_scrum: num(clubs::TRIES_FROM_PENALTY_SCRUM),
            effective_time_seconds: match_duration_secs(cell_at(row, clubs::EFFECTIVE_TIME))?,
            possession_seconds: possession_secs(cell_at(row, clubs::POSSESSION_TIME))?,
            possession_percent: rate(clubs::POSSESSION_PERCENT),
            kicking_game: num(clubs::KICKING_GAME),
            tackles_made: num(clubs::TACKLES_MADE),
            tackles_missed: num(clubs::TACKLES_MISSED),
            tackle_success_rate: rate(clubs::TACKLE_SUCCESS_RATE),
            line_breaks: num(clubs::LINE_BREAKS),
            total_rucks: num(clubs::TOTAL_RUCKS),
            ruck_success: rate(clubs::RUCK_SUCCESS),
            total_scrums: num(clubs::TOTAL_SCRUMS),
            scrums_won: rate(clubs::SCRUMS_WON),
            scrums_reset: num(clubs::SCRUMS_RESET),
            total_lineouts: num(clubs::TOTAL_LINEOUTS),
            lineouts_won: rate(clubs::LINEOUTS_WON),
            penalties_conceded: num(clubs::PENALTIES_CONCEDED),
            pen_defensive_ruck: num(clubs::PEN_DEFENSIVE_RUCK),
            pen_attacking_ruck: num(clubs::PEN_ATTACKING_RUCK),
            pen_offside: num(clubs::PEN_OFFSIDE),
            pen_tackle: num(clubs::PEN_TACKLE),
            pen_lineout_maul: num(clubs::PEN_LINEOUT_MAUL),
            pen_scrum: num(clubs::PEN_SCRUM),
            pen_other: num(clubs::PEN_OTHER),
        })
    }
}

/// Check a team-round row and build its entity. `match_points` starts at 0;
/// standings reconciliation fills it in.
pub fn validate_team_round(
    raw: &RawTeamRoundRow,
    team_id: TeamId,
    raw_row_json: String,
) -> Result<TeamRoundStats, Vec<FieldError>> {
    let mut c = Checker::default();
    c.name("team", &raw.team);
    // Validated with the rest of the row but not persisted
    c.count("total_match_points", raw.total_match_points);

    let stats = TeamRoundStats {
        team_id,
        round: c.positive("round", raw.round),
        points_scored: c.count("points_scored", raw.points_scored),
        points_conceded: c.count("points_conceded", raw.points_conceded),
        match_points: 0,
        tries_scored: c.count("tries_scored", raw.tries_scored),
        tries_conceded: c.count("tries_conceded", raw.tries_conceded),
        tries_match: c.count("tries_match", raw.tries_match),
        tries_from_lineout: c.count("tries_from_lineout", raw.tries_from_lineout),
        tries_from_scrum: c.count("tries_from_scrum", raw.tries_from_scrum),
        tries_from_turnover: c.count("tries_from_turnover", raw.tries_from_turnover),
        tries_from_counter_attack: c.count("tries_from_counter_attack", raw.tries_from_counter_attack),
        tries_from_tap: c.count("tries_from_tap", raw.tries_from_tap),
        tries_from_penalty_scrum: c.count("tries_from_penalty_scrum", raw.tries_from_penalty_scrum),
        effective_time_seconds: c.count("effective_time_seconds", raw.effective_time_seconds),
        possession_seconds: c.count("possession_seconds", raw.possession_seconds),
        possession_percent: c.rate("possession_percent", raw.possession_percent),
        kicking_game: c.count("kicking_game", raw.kicking_game),
        tackles_made: c.count("tackles_made", raw.tackles_made),
        tackles_missed: c.count("tackles_missed", raw.tackles_missed),
        tackle_success_rate: c.rate("tackle_success_rate", raw.tackle_success_rate),
        line_breaks: c.count("line_breaks", raw.line_breaks),
        total_rucks: c.count("total_rucks", raw.total_rucks),
        ruck_success: c.rate("ruck_success", raw.ruck_success),
        total_scrums: c.count("total_scrums", raw.total_scrums),
        scrums_won: c.rate("scrums_won", raw.scrums_won),
        scrums_reset: c.count("scrums_reset", raw.scrums_reset),
        total_lineouts: c.count("total_lineouts", raw.total_lineouts),
        lineouts_won: c.rate("lineouts_won", raw.lineouts_won),
        penalties_conceded: c.count("penalties_conceded", raw.penalties_conceded),
        pen_defensive_ruck: c.count("pen_defensive_ruck", raw.pen_defensive_ruck),
        pen_attacking_ruck: c.count("pen_attacking_ruck", raw.pen_attacking_ruck),
        pen_offside: c.count("pen_offside", raw.pen_offside),
        pen_tackle: c.count("pen_tackle", raw.pen_tackle),
        pen_lineout_maul: c.count("pen_lineout_maul", raw.pen_lineout_maul),
        pen_scrum: c.count("pen_scrum", raw.pen_scrum),
        pen_other: c.count("pen_other", raw.pen_other),
        raw_row_json,
    };
    c.finish(stats)
}

// ---------------------------------------------------------------------------
// Info Jogo
// ---------------------------------------------------------------------------

/// A match row after cell coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatchRow {
    pub team1: String,
    pub team2: String,
    pub round: f64,
    pub referee: Option<String>,
    pub points_team1: f64,
    pub points_team2: f64,
    pub total_points: f64,
    pub tries_team1: f64,
    pub tries_team2: f64,
    pub total_tries: f64,
    pub tries_from_lineout: f64,
    pub tries_from_scrum: f64,
    pub effective_time_seconds: f64,
    pub kicking_game: f64,
    pub total_rucks: f64,
    pub ruck_success_team1: f64,
    pub ruck_success_team2: f64,
    pub total_scrums: f64,
    pub scrums_team1: f64,
    pub scrums_team2: f64,
    pub total_lineouts: f64,
    pub lineouts_team1: f64,
    pub lineouts_team2: f64,
    pub total_penalties: f64,
    pub penalties_team1: f64,
    pub penalties_team2: f64,
    pub penalties_defensive_ruck: f64,
    pub penalties_attacking_ruck: f64,
    pub penalties_offside: f64,
    pub penalties_tackle: f64,
}

impl RawMatchRow {
    pub fn from_cells(row: &[CellValue]) -> Result<Self, MalformedDuration> {
        let num = |col: usize| number_or(cell_at(row, col), 0.0);
        let rate = |col: usize| fraction_or(cell_at(row, col), 0.0);
        let name = |col: usize| cell_at(row, col).as_text().unwrap_or_default().to_string();

        Ok(Self {
            team1: name(matches::TEAM1),
            team2: name(matches::TEAM2),
            round: num(matches::ROUND),
            referee: cell_at(row, matches::REFEREE).display_text(),
            points_team1: num(matches::POINTS_TEAM1),
            points_team2: num(matches::POINTS_TEAM2),
            total_points: num(matches::TOTAL_POINTS),
            tries_team1: num(matches::TRIES_TEAM1),
            tries_team2: num(matches::TRIES_TEAM2),
            total_tries: num(matches::TOTAL_TRIES),
            tries_from_lineout: num(matches::TRIES_FROM_LINEOUT),
            tries_from_scrum: num(matches::TRIES_FROM_SCRUM),
            effective_time_seconds: match_duration_secs(cell_at(row, matches::EFFECTIVE_TIME))?,
            kicking_game: num(matches::KICKING_GAME),
            total_rucks: num(matches::TOTAL_RUCKS),
            ruck_success_team1: rate(matches::RUCK_SUCCESS_TEAM1),
            ruck_success_team2: rate(matches::RUCK_SUCCESS_TEAM2),
            total_scrums: num(matches::TOTAL_SCRUMS),
            scrums_team1: num(matches::SCRUMS_TEAM1),
            scrums_team2: num(matches::SCRUMS_TEAM2),
            total_lineouts: num(matches::TOTAL_LINEOUTS),
            lineouts_team1: num(matches::LINEOUTS_TEAM1),
            lineouts_team2: num(matches::LINEOUTS_TEAM2),
            total_penalties: num(matches::TOTAL_PENALTIES),
            penalties_team1: num(matches::PENALTIES_TEAM1),
            penalties_team2: num(matches::PENALTIES_TEAM2),
            penalties_defensive_ruck: num(matches::PENALTIES_DEFENSIVE_RUCK),
            penalties_attacking_ruck: num(matches::PENALTIES_ATTACKING_RUCK),
            penalties_offside: num(matches::PENALTIES_OFFSIDE),
            penalties_tackle: num(matches::PENALTIES_TACKLE),
        })
    }
}

/// Check a match row and build its entity with a fresh id.
pub fn validate_match(
    raw: &RawMatchRow,
    team1_id: TeamId,
    team2_id: TeamId,
    raw_row_json: String,
) -> Result<Match, Vec<FieldError>> {
    let mut c = Checker::default();
    c.name("team1", &raw.team1);
    c.name("team2", &raw.team2);
    if raw.team1 == raw.team2 || team1_id == team2_id {
        c.fail("team2", format!("must differ from team1 ('{}')", raw.team1));
    }

    let m = Match {
        id: MatchId::new(),
        team1_id,
        team2_id,
        round: c.positive("round", raw.round),
        referee: raw.referee.clone(),
        points_team1: c.count("points_team1", raw.points_team1),
        points_team2: c.count("points_team2", raw.points_team2),
        total_points: c.count("total_points", raw.total_points),
        tries_team1: c.count("tries_team1", raw.tries_team1),
        tries_team2: c.count("tries_team2", raw.tries_team2),
        total_tries: c.count("total_tries", raw.total_tries),
        tries_from_lineout: c.count("tries_from_lineout", raw.tries_from_lineout),
        tries_from_scrum: c.count("tries_from_scrum", raw.tries_from_scrum),
        effective_time_seconds: c.count("effective_time_seconds", raw.effective_time_seconds),
        kicking_game: c.count("kicking_game", raw.kicking_game),
        total_rucks: c.count("total_rucks", raw.total_rucks),
        ruck_success_team1: c.rate("ruck_success_team1", raw.ruck_success_team1),
        ruck_success_team2: c.rate("ruck_success_team2", raw.ruck_success_team2),
        total_scrums: c.count("total_scrums", raw.total_scrums),
        scrums_team1: c.count("scrums_team1", raw.scrums_team1),
        scrums_team2: c.count("scrums_team2", raw.scrums_team2),
        total_lineouts: c.count("total_lineouts", raw.total_lineouts),
        lineouts_team1: c.count("lineouts_team1", raw.lineouts_team1),
        lineouts_team2: c.count("lineouts_team2", raw.lineouts_team2),
        total_penalties: c.count("total_penalties", raw.total_penalties),
        penalties_team1: c.count("penalties_team1", raw.penalties_team1),
        penalties_team2: c.count("penalties_team2", raw.penalties_team2),
        penalties_defensive_ruck: c.count("penalties_defensive_ruck", raw.penalties_defensive_ruck),
        penalties_attacking_ruck: c.count("penalties_attacking_ruck", raw.penalties_attacking_ruck),
        penalties_offside: c.count("penalties_offside", raw.penalties_offside),
        penalties_tackle: c.count("penalties_tackle", raw.penalties_tackle),
        raw_row_json,
    };
    c.finish(m)
}
