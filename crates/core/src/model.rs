use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// Team identity. Regenerated on every ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub Uuid);

impl TeamId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TeamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Match identity. Regenerated on every ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub Uuid);

impl MatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// Championship group a team plays in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Group {
    #[default]
    A,
    B,
    C,
}

impl Group {
    pub fn label(&self) -> &'static str {
        match self {
            Group::A => "A",
            Group::B => "B",
            Group::C => "C",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub group: Group,
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// One played match, both sides plus match-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub round: u32,
    pub referee: Option<String>,
    pub points_team1: u32,
    pub points_team2: u32,
    pub total_points: u32,
    pub tries_team1: u32,
    pub tries_team2: u32,
    pub total_tries: u32,
    pub tries_from_lineout: u32,
    pub tries_from_scrum: u32,
    /// Ball-in-play time in seconds.
    pub effective_time_seconds: u32,
    pub kicking_game: u32,
    pub total_rucks: u32,
    pub ruck_success_team1: f64,
    pub ruck_success_team2: f64,
    pub total_scrums: u32,
    pub scrums_team1: u32,
    pub scrums_team2: u32,
    pub total_lineouts: u32,
    pub lineouts_team1: u32,
    pub lineouts_team2: u32,
    pub total_penalties: u32,
    pub penalties_team1: u32,
    pub penalties_team2: u32,
    pub penalties_defensive_ruck: u32,
    pub penalties_attacking_ruck: u32,
    pub penalties_offside: u32,
    pub penalties_tackle: u32,
    /// The source row as a JSON array.
    pub raw_row_json: String,
}

/// One side of a match. Two per match; `is_home_team` marks team1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTeamStats {
    pub match_id: MatchId,
    pub team_id: TeamId,
    pub is_home_team: bool,
    pub points: u32,
    pub tries: u32,
    pub ruck_success: f64,
    pub scrums: u32,
    pub lineouts: u32,
    pub penalties: u32,
}

// ---------------------------------------------------------------------------
// Team round stats
// ---------------------------------------------------------------------------

/// A team's statistics for one round. Unique per (team_id, round).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoundStats {
    pub team_id: TeamId,
    pub round: u32,
    pub points_scored: u32,
    pub points_conceded: u32,
    /// League points earned in the round. Written by standings reconciliation.
    pub match_points: u32,
    pub tries_scored: u32,
    pub tries_conceded: u32,
    pub tries_match: u32,
    pub tries_from_lineout: u32,
    pub tries_from_scrum: u32,
    pub tries_from_turnover: u32,
    pub tries_from_counter_attack: u32,
    pub tries_from_tap: u32,
    pub tries_from_penalty_scrum: u32,
    pub effective_time_seconds: u32,
    pub possession_seconds: u32,
    pub possession_percent: f64,
    pub kicking_game: u32,
    pub tackles_made: u32,
    pub tackles_missed: u32,
    pub tackle_success_rate: f64,
    pub line_breaks: u32,
    pub total_rucks: u32,
    pub ruck_success: f64,
    pub total_scrums: u32,
    pub scrums_won: f64,
    pub scrums_reset: u32,
    pub total_lineouts: u32,
    pub lineouts_won: f64,
    pub penalties_conceded: u32,
    pub pen_defensive_ruck: u32,
    pub pen_attacking_ruck: u32,
    pub pen_offside: u32,
    pub pen_tackle: u32,
    pub pen_lineout_maul: u32,
    pub pen_scrum: u32,
    pub pen_other: u32,
    pub raw_row_json: String,
}
