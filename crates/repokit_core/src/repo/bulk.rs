//! Bulk insert with fixed-size batching.
//!
//! Each batch is one multi-row INSERT statement and its own commit unit.
//! Callers needing all-or-nothing semantics wrap the call in their own
//! transaction.

use super::SqliteRepository;
use crate::error::{RepoError, RepoResult};
use crate::options::QueryOptions;
use crate::record::{insert_sql, Record};
use log::debug;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

impl<T: Record> SqliteRepository<'_, T> {
    /// Inserts `records` in chunks of at most `batch_size` rows, one
    /// statement per chunk with the values flattened positionally.
    ///
    /// Empty input is a no-op. `batch_size == 0` fails fast with a
    /// precondition error. With the ignore option set, rows violating a
    /// unique constraint are skipped (`INSERT OR IGNORE`) instead of
    /// failing the batch. The first execution failure aborts; earlier
    /// batches stay committed.
    pub fn bulk_create(
        &mut self,
        records: &[T],
        batch_size: usize,
        options: &QueryOptions,
    ) -> RepoResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        if batch_size == 0 {
            return Err(RepoError::Precondition(
                "batch_size must be greater than zero".to_string(),
            ));
        }

        let mut batches = 0usize;
        for chunk in records.chunks(batch_size) {
            let sql = insert_sql::<T>(options.ignore, chunk.len());
            let values: Vec<Value> = chunk.iter().flat_map(Record::values).collect();
            self.conn.execute(&sql, params_from_iter(values))?;
            batches += 1;
        }

        debug!(
            "event=bulk_create module=repo status=ok table={} rows={} batches={batches}",
            T::table_name(),
            records.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::record::{insert_sql, FieldMeta, Record};
    use rusqlite::types::Value;
    use rusqlite::Row;

    struct Entry {
        n: i64,
    }

    impl Record for Entry {
        fn table_name() -> &'static str {
            "entries"
        }

        fn fields() -> &'static [FieldMeta] {
            const FIELDS: &[FieldMeta] = &[FieldMeta::new("n")];
            FIELDS
        }

        fn values(&self) -> Vec<Value> {
            vec![Value::Integer(self.n)]
        }

        fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
            Ok(Self { n: row.get(0)? })
        }
    }

    #[test]
    fn five_records_at_batch_two_issue_three_statements_grouped_two_two_one() {
        let records: Vec<Entry> = (0..5).map(|n| Entry { n }).collect();
        let statements: Vec<String> = records
            .chunks(2)
            .map(|chunk| insert_sql::<Entry>(false, chunk.len()))
            .collect();

        assert_eq!(
            statements,
            vec![
                "INSERT INTO entries (n) VALUES (?), (?)".to_string(),
                "INSERT INTO entries (n) VALUES (?), (?)".to_string(),
                "INSERT INTO entries (n) VALUES (?)".to_string(),
            ]
        );
    }
}
