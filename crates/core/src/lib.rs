//! `ruckstats-core`: shared types for the league ingestion pipeline.
//!
//! Cells as read from a workbook, the four persisted entities, and the
//! store interface they are written through. No workbook or database code.

pub mod cell;
pub mod layout;
pub mod model;
pub mod store;

pub use cell::CellValue;
pub use model::{Group, Match, MatchId, MatchTeamStats, Team, TeamId, TeamRoundStats};
pub use store::{EntityCounts, MemoryStore, Store, StoreError};
