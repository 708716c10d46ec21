// Persistence interface for the ingested entity set

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::model::{Match, MatchId, MatchTeamStats, Team, TeamId, TeamRoundStats};

#[derive(Debug)]
pub enum StoreError {
    /// Backend failure (connection, SQL, IO).
    Backend(String),
    /// A unique key is already taken: team name, (team, round), (match, team).
    UniqueViolation(String),
    /// A referenced team or match does not exist.
    MissingReference(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(msg) => write!(f, "store error: {msg}"),
            Self::UniqueViolation(what) => write!(f, "unique constraint violated: {what}"),
            Self::MissingReference(what) => write!(f, "missing reference: {what}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Row totals per entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub teams: usize,
    pub matches: usize,
    pub team_round_stats: usize,
    pub match_team_stats: usize,
}

/// Create/delete/update primitives the ingestion pipeline writes through.
///
/// Every call completes before the next row is processed. Implementations
/// enforce the unique keys (team name, team + round, match + team) and the
/// references between entities.
pub trait Store {
    /// Delete every entity, children first:
    /// match-team stats, team-round stats, matches, teams.
    fn clear_all(&mut self) -> Result<(), StoreError>;

    fn create_team(&mut self, team: &Team) -> Result<(), StoreError>;

    fn create_team_round_stats(&mut self, stats: &TeamRoundStats) -> Result<(), StoreError>;

    fn create_match(&mut self, m: &Match) -> Result<(), StoreError>;

    /// Both sides of one match, written together.
    fn create_match_team_stats(&mut self, sides: &[MatchTeamStats; 2]) -> Result<(), StoreError>;

    /// Set `match_points` on the (team, round) row. Returns false when no
    /// such row exists; nothing is created in that case.
    fn update_match_points(
        &mut self,
        team_id: TeamId,
        round: u32,
        match_points: u32,
    ) -> Result<bool, StoreError>;

    fn counts(&self) -> Result<EntityCounts, StoreError>;
}

/// Vec-backed store. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    teams: Vec<Team>,
    matches: Vec<Match>,
    team_round_stats: Vec<TeamRoundStats>,
    match_team_stats: Vec<MatchTeamStats>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn team_round_stats(&self) -> &[TeamRoundStats] {
        &self.team_round_stats
    }

    pub fn match_team_stats(&self) -> &[MatchTeamStats] {
        &self.match_team_stats
    }

    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn round_stats_for(&self, team_id: TeamId, round: u32) -> Option<&TeamRoundStats> {
        self.team_round_stats
            .iter()
            .find(|s| s.team_id == team_id && s.round == round)
    }

    fn require_team(&self, id: TeamId) -> Result<(), StoreError> {
        if self.teams.iter().any(|t| t.id == id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(format!("team {id}")))
        }
    }

    fn require_match(&self, id: MatchId) -> Result<(), StoreError> {
        if self.matches.iter().any(|m| m.id == id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(format!("match {id}")))
        }
    }
}

impl Store for MemoryStore {
    fn clear_all(&mut self) -> Result<(), StoreError> {
        self.match_team_stats.clear();
        self.team_round_stats.clear();
        self.matches.clear();
        self.teams.clear();
        Ok(())
    }

    fn create_team(&mut self, team: &Team) -> Result<(), StoreError> {
        if self.teams.iter().any(|t| t.name == team.name || t.id == team.id) {
            return Err(StoreError::UniqueViolation(format!("team '{}'", team.name)));
        }
        self.teams.push(team.clone());
        Ok(())
    }

    fn create_team_round_stats(&mut self, stats: &TeamRoundStats) -> Result<(), StoreError> {
        self.require_team(stats.team_id)?;
        if self.round_stats_for(stats.team_id, stats.round).is_some() {
            return Err(StoreError::UniqueViolation(format!(
                "team round stats ({}, round {})",
                stats.team_id, stats.round
            )));
        }
        self.team_round_stats.push(stats.clone());
        Ok(())
    }

    fn create_match(&mut self, m: &Match) -> Result<(), StoreError> {
        self.require_team(m.team1_id)?;
        self.require_team(m.team2_id)?;
        if self.matches.iter().any(|existing| existing.id == m.id) {
            return Err(StoreError::UniqueViolation(format!("match {}", m.id)));
        }
        self.matches.push(m.clone());
        Ok(())
    }

    fn create_match_team_stats(&mut self, sides: &[MatchTeamStats; 2]) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        for side in sides {
            self.require_match(side.match_id)?;
            self.require_team(side.team_id)?;
            let taken = self
                .match_team_stats
                .iter()
                .any(|s| s.match_id == side.match_id && s.team_id == side.team_id);
            if taken || !seen.insert((side.match_id, side.team_id)) {
                return Err(StoreError::UniqueViolation(format!(
                    "match team stats ({}, {})",
                    side.match_id, side.team_id
                )));
            }
        }
        self.match_team_stats.extend(sides.iter().cloned());
        Ok(())
    }

    fn update_match_points(
        &mut self,
        team_id: TeamId,
        round: u32,
        match_points: u32,
    ) -> Result<bool, StoreError> {
        match self
            .team_round_stats
            .iter_mut()
            .find(|s| s.team_id == team_id && s.round == round)
        {
            Some(row) => {
                row.match_points = match_points;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn counts(&self) -> Result<EntityCounts, StoreError> {
        Ok(EntityCounts {
            teams: self.teams.len(),
            matches: self.matches.len(),
            team_round_stats: self.team_round_stats.len(),
            match_team_stats: self.match_team_stats.len(),
        })
    }
}
