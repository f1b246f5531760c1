//! Typed CRUD, upsert, paging, and bulk-insert helpers over rusqlite.
//! Callers describe rows once via the `Record` capability and stop
//! hand-writing per-table query boilerplate.

pub mod db;
pub mod error;
pub mod logging;
pub mod options;
pub mod paging;
pub mod record;
pub mod repo;

pub use db::{open_db, open_db_in_memory};
pub use error::{is_duplicate_entry, is_not_found, RepoError, RepoResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use options::QueryOptions;
pub use paging::{PagingConfig, DEFAULT_QUERY_SIZE, MAX_QUERY_SIZE};
pub use record::{column_names, placeholder_list, primary_key_field, FieldMeta, Record};
pub use repo::SqliteRepository;

/// Returns the crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
