//! Non-transactional update-or-insert helpers.
//!
//! These accept a benign double-insert race as a known limitation; the
//! race-safe path is `upsert`.

use super::create::insert_record;
use super::SqliteRepository;
use crate::error::RepoResult;
use crate::options::QueryOptions;
use crate::record::Record;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

impl<T: Record> SqliteRepository<'_, T> {
    /// Updates every row matching the options with the record's
    /// non-primary-key column values; inserts the record when none match.
    pub fn save(&mut self, record: &mut T, options: &QueryOptions) -> RepoResult<()> {
        if self.count(options)? == 0 {
            return insert_record(self.conn, record);
        }

        let pairs: Vec<(&str, Value)> = T::fields()
            .iter()
            .zip(record.values())
            .filter(|(field, _)| !field.primary_key)
            .map(|(field, value)| (field.column_name(), value))
            .collect();
        self.update_rows(&pairs, options)
    }

    /// Field-map variant of `save`: updates matching rows with
    /// `update_fields`, or inserts `default_record` when none match.
    pub fn update_or_create(
        &mut self,
        default_record: &T,
        update_fields: &[(&str, Value)],
        options: &QueryOptions,
    ) -> RepoResult<()>
    where
        T: Clone,
    {
        if self.count(options)? == 0 {
            let mut created = default_record.clone();
            return insert_record(self.conn, &mut created);
        }
        self.update_rows(update_fields, options)
    }

    /// Updates a single column on every row matching the options.
    pub fn update_column(
        &mut self,
        column: &str,
        value: Value,
        options: &QueryOptions,
    ) -> RepoResult<()> {
        self.update_rows(&[(column, value)], options)
    }

    fn update_rows(&mut self, fields: &[(&str, Value)], options: &QueryOptions) -> RepoResult<()> {
        let (set_sql, mut args) = set_clause(fields);
        let (where_sql, where_args) = options.where_sql();
        let sql = format!("UPDATE {} SET {set_sql}{where_sql}", T::table_name());
        args.extend(where_args);
        self.conn.execute(&sql, params_from_iter(args))?;
        Ok(())
    }
}

/// Renders `col1 = ?, col2 = ?` and the matching argument list.
pub(crate) fn set_clause(fields: &[(&str, Value)]) -> (String, Vec<Value>) {
    let sql = fields
        .iter()
        .map(|(column, _)| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let args = fields.iter().map(|(_, value)| value.clone()).collect();
    (sql, args)
}
