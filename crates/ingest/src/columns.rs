// Fixed column positions in the league export

/// `Info Clubes`: one row per team per round.
pub mod clubs {
    pub const TEAM: usize = 0;
    pub const ROUND: usize = 1;
    pub const POINTS_SCORED: usize = 2;
    pub const POINTS_CONCEDED: usize = 3;
    /// Match points total as printed by the exporter. Not the league points.
    pub const TOTAL_MATCH_POINTS: usize = 4;
    pub const TRIES_SCORED: usize = 5;
    pub const TRIES_CONCEDED: usize = 6;
    pub const TRIES_MATCH: usize = 7;
    pub const TRIES_FROM_LINEOUT: usize = 8;
    pub const TRIES_FROM_SCRUM: usize = 9;
    pub const TRIES_FROM_TURNOVER: usize = 10;
    pub const TRIES_FROM_COUNTER_ATTACK: usize = 11;
    pub const TRIES_FROM_TAP: usize = 12;
    pub const TRIES_FROM_PENALTY_SCRUM: usize = 13;
    pub const EFFECTIVE_TIME: usize = 14;
    pub const POSSESSION_TIME: usize = 15;
    pub const POSSESSION_PERCENT: usize = 16;
    pub const KICKING_GAME: usize = 17;
    pub const TACKLES_MADE: usize = 18;
    pub const TACKLES_MISSED: usize = 19;
    pub const TACKLE_SUCCESS_RATE: usize = 20;
    pub const LINE_BREAKS: usize = 21;
    pub const TOTAL_RUCKS: usize = 22;
    pub const RUCK_SUCCESS: usize = 23;
    pub const TOTAL_SCRUMS: usize = 24;
    pub const SCRUMS_WON: usize = 25;
    pub const SCRUMS_RESET: usize = 26;
    pub const TOTAL_LINEOUTS: usize = 27;
    pub const LINEOUTS_WON: usize = 28;
    pub const PENALTIES_CONCEDED: usize = 29;
    pub const PEN_DEFENSIVE_RUCK: usize = 30;
    pub const PEN_ATTACKING_RUCK: usize = 31;
    pub const PEN_OFFSIDE: usize = 32;
    pub const PEN_TACKLE: usize = 33;
    pub const PEN_LINEOUT_MAUL: usize = 34;
    pub const PEN_SCRUM: usize = 35;
    pub const PEN_OTHER: usize = 36;
}

/// `Info Jogo`: one row per match.
pub mod matches {
    pub const TEAM1: usize = 0;
    pub const TEAM2: usize = 1;
    pub const ROUND: usize = 2;
    pub const REFEREE: usize = 3;
    pub const POINTS_TEAM1: usize = 4;
    pub const POINTS_TEAM2: usize = 5;
    pub const TOTAL_POINTS: usize = 6;
    pub const TRIES_TEAM1: usize = 7;
    pub const TRIES_TEAM2: usize = 8;
    pub const TOTAL_TRIES: usize = 9;
    pub const TRIES_FROM_LINEOUT: usize = 10;
    pub const TRIES_FROM_SCRUM: usize = 11;
    pub const EFFECTIVE_TIME: usize = 12;
    pub const KICKING_GAME: usize = 13;
    pub const TOTAL_RUCKS: usize = 14;
    pub const RUCK_SUCCESS_TEAM1: usize = 15;
    pub const RUCK_SUCCESS_TEAM2: usize = 16;
    pub const TOTAL_SCRUMS: usize = 17;
    pub const SCRUMS_TEAM1: usize = 18;
    pub const SCRUMS_TEAM2: usize = 19;
    pub const TOTAL_LINEOUTS: usize = 20;
    pub const LINEOUTS_TEAM1: usize = 21;
    pub const LINEOUTS_TEAM2: usize = 22;
    pub const TOTAL_PENALTIES: usize = 23;
    pub const PENALTIES_TEAM1: usize = 24;
    pub const PENALTIES_TEAM2: usize = 25;
    pub const PENALTIES_DEFENSIVE_RUCK: usize = 26;
    pub const PENALTIES_ATTACKING_RUCK: usize = 27;
    pub const PENALTIES_OFFSIDE: usize = 28;
    pub const PENALTIES_TACKLE: usize = 29;
}
