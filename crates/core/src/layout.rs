// Workbook layout of the league export

/// Roster and per-team round statistics.
pub const CLUBS_SHEET: &str = "Info Clubes";

/// One row per played match.
pub const MATCHES_SHEET: &str = "Info Jogo";

/// Column-0 label of the header row in the clubs sheet.
pub const CLUBS_HEADER_SENTINEL: &str = "Equipa";

/// Column-0 label of the header row in the matches sheet.
pub const MATCHES_HEADER_SENTINEL: &str = "Equipa 1";

/// Column-0 labels of totals/average rows appended below the data.
pub const AGGREGATE_SENTINELS: [&str; 3] = ["TOTAIS", "MÉDIA", "TOTAL"];

pub fn is_aggregate_label(label: &str) -> bool {
    AGGREGATE_SENTINELS.contains(&label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_labels_are_exact() {
        assert!(is_aggregate_label("TOTAIS"));
        assert!(is_aggregate_label("MÉDIA"));
        assert!(is_aggregate_label("TOTAL"));
        assert!(!is_aggregate_label("Total"));
        assert!(!is_aggregate_label("Benfica"));
    }
}
