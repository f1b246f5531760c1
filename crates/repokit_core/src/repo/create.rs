//! Single-row insert helpers.

use super::SqliteRepository;
use crate::error::{RepoError, RepoResult};
use crate::options::QueryOptions;
use crate::record::{insert_sql, primary_key_value, Record};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

impl<T: Record> SqliteRepository<'_, T> {
    /// Inserts one record.
    ///
    /// A duplicate-key conflict is swallowed when the ignore option is set;
    /// any other failure propagates. On success the generated rowid is
    /// handed to the record when its primary-key value was `Null`.
    pub fn create(&mut self, record: &mut T, options: &QueryOptions) -> RepoResult<()> {
        match insert_record(self.conn, record) {
            Ok(()) => Ok(()),
            Err(err) if options.ignore && err.is_duplicate() => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Returns the first row matching the options, creating and returning
    /// `default_record` when none exists. Read errors other than not-found
    /// propagate unchanged.
    pub fn first_or_create(&mut self, default_record: &T, options: &QueryOptions) -> RepoResult<T>
    where
        T: Clone,
    {
        if let Some(found) = self.query_first(options)? {
            return Ok(found);
        }
        let mut created = default_record.clone();
        insert_record(self.conn, &mut created)?;
        Ok(created)
    }
}

/// Executes a single-row INSERT and populates the generated key.
pub(crate) fn insert_record<T: Record>(conn: &Connection, record: &mut T) -> RepoResult<()> {
    let sql = insert_sql::<T>(false, 1);
    conn.execute(&sql, params_from_iter(record.values()))
        .map_err(RepoError::from)?;

    if matches!(primary_key_value(record), Some(Value::Null)) {
        record.assign_generated_key(conn.last_insert_rowid());
    }
    Ok(())
}
