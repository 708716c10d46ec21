// League table points from match results

use log::warn;
use ruckstats_core::{Match, Store, StoreError, TeamId};

/// Tries needed for the attacking bonus point.
pub const TRY_BONUS_THRESHOLD: u32 = 4;

/// Largest losing margin that still earns the losing bonus point.
pub const LOSING_BONUS_MARGIN: u32 = 7;

/// Points for one side: 4 win, 2 draw, 0 loss, +1 for 4+ tries, +1 for
/// losing by 7 or fewer.
pub fn league_points(scored: u32, conceded: u32, tries: u32) -> u32 {
    let mut points = match scored.cmp(&conceded) {
        std::cmp::Ordering::Greater => 4,
        std::cmp::Ordering::Equal => 2,
        std::cmp::Ordering::Less => 0,
    };
    if tries >= TRY_BONUS_THRESHOLD {
        points += 1;
    }
    if scored < conceded && conceded - scored <= LOSING_BONUS_MARGIN {
        points += 1;
    }
    points
}

/// Write each side's league points into its (team, round) stats row.
/// Returns how many sides had no row to update.
pub fn reconcile(m: &Match, store: &mut dyn Store) -> Result<usize, StoreError> {
    let sides: [(TeamId, u32); 2] = [
        (m.team1_id, league_points(m.points_team1, m.points_team2, m.tries_team1)),
        (m.team2_id, league_points(m.points_team2, m.points_team1, m.tries_team2)),
    ];
    let mut misses = 0;
    for (team_id, points) in sides {
        if !store.update_match_points(team_id, m.round, points)? {
            warn!("no round stats for team {team_id} in round {}; league points not recorded", m.round);
            misses += 1;
        }
    }
    Ok(misses)
}
