// File I/O operations

pub mod native;
pub mod xlsx;

pub use native::SqliteStore;
pub use xlsx::{open, SheetRows, WorkbookError, WorkbookSource};
