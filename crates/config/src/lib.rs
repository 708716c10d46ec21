// Configuration loading

pub mod settings;

pub use settings::{ConfigError, GroupSettings, IngestSettings, StoreSettings, WorkbookSettings};
