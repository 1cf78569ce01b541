use std::path::PathBuf;

/// Table holding one row per owning user.
pub const TABLE_NAME: &str = "collections";

/// Language assumed for cards whose export carries none.
pub const DEFAULT_LANG: &str = "FR";

/// Player id used when neither the export nor the page URL names one.
pub const UNKNOWN_PLAYER: &str = "unknown";

pub const DB_FILE_NAME: &str = "collections.duckdb";

pub fn default_db_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("pzone-collection").join(DB_FILE_NAME)
    } else {
        PathBuf::from(".pzone-collection").join(DB_FILE_NAME)
    }
}
