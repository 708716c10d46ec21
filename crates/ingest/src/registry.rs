//! Canonical team identities for one ingestion run.
//!
//! Teams come only from the roster sheet's first column. Match rows that
//! name a team outside the roster are skipped, never auto-created.

use std::collections::HashMap;

use log::debug;
use ruckstats_core::cell::cell_at;
use ruckstats_core::layout::is_aggregate_label;
use ruckstats_core::{CellValue, Group, Store, StoreError, Team, TeamId};
use ruckstats_config::GroupSettings;

/// Championship groups of the current season.
const GROUP_TABLE: [(&str, Group); 12] = [
    ("Belenenses", Group::A),
    ("Benfica", Group::A),
    ("Agronomia", Group::A),
    ("Santarém", Group::A),
    ("Cascais", Group::B),
    ("CDUL", Group::B),
    ("CDUP", Group::B),
    ("Montemor", Group::B),
    ("Direito", Group::C),
    ("São Miguel", Group::C),
    ("Técnico", Group::C),
    ("Académica", Group::C),
];

/// Group for `name`: configured override, then the season table, then the
/// configured default.
pub fn group_for(name: &str, settings: &GroupSettings) -> Group {
    if let Some(group) = settings.teams.get(name) {
        return *group;
    }
    GROUP_TABLE
        .iter()
        .find(|(team, _)| *team == name)
        .map(|(_, group)| *group)
        .unwrap_or(settings.default)
}

/// Distinct team names in first-seen order, aggregate rows excluded.
pub fn roster_names(rows: &[Vec<CellValue>]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        let Some(name) = cell_at(row, 0).non_empty_text() else {
            continue;
        };
        if is_aggregate_label(name) || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

/// Name → id map, valid for the run that built it.
#[derive(Debug, Default)]
pub struct TeamRegistry {
    ids: HashMap<String, TeamId>,
    order: Vec<String>,
}

impl TeamRegistry {
    /// Create one team per distinct roster name.
    pub fn build(
        rows: &[Vec<CellValue>],
        groups: &GroupSettings,
        store: &mut dyn Store,
    ) -> Result<Self, StoreError> {
        let mut registry = Self::default();
        for name in roster_names(rows) {
            let team = Team { id: TeamId::new(), name: name.clone(), group: group_for(&name, groups) };
            store.create_team(&team)?;
            debug!("created team {} (group {}, {})", team.name, team.group, team.id);
            registry.ids.insert(name.clone(), team.id);
            registry.order.push(name);
        }
        Ok(registry)
    }

    pub fn resolve(&self, name: &str) -> Option<TeamId> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in creation order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

}
