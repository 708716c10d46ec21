// Known corruptions in the league export, fixed before validation

use log::warn;

use crate::schema::RawMatchRow;

/// Round 1 Montemor v Cascais was exported with the sides' points and tries
/// swapped. Applies only when team names and both scores match exactly.
/// Returns true when the row was changed.
pub fn apply_known_corrections(raw: &mut RawMatchRow) -> bool {
    let swapped_result = raw.team1 == "Montemor"
        && raw.team2 == "Cascais"
        && raw.points_team1 == 110.0
        && raw.points_team2 == 0.0;
    if !swapped_result {
        return false;
    }
    warn!("correcting swapped score for Montemor v Cascais (round 1)");
    std::mem::swap(&mut raw.points_team1, &mut raw.points_team2);
    std::mem::swap(&mut raw.tries_team1, &mut raw.tries_team2);
    true
}
