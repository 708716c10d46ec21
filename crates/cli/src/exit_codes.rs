//! CLI Exit Code Registry
//!
//! Single source of truth for `ruckstats` exit codes. Scripts and cron jobs
//! rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | Ingestion or upload failed (workbook, sheet, store)       |
//! | 2    | Usage error (bad args, unreadable config or upload file) |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Ingestion failed. Rows written before the failure stay in the store.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, config that cannot be loaded, missing file.
pub const EXIT_USAGE: u8 = 2;
