//! Read helpers: count, paged find, first.

use super::{select_sql, SqliteRepository};
use crate::error::{RepoError, RepoResult};
use crate::options::QueryOptions;
use crate::record::{select_list, Record};
use rusqlite::params_from_iter;
use rusqlite::types::Value;

impl<T: Record> SqliteRepository<'_, T> {
    /// Counts rows matching the options. Ordering is ignored.
    pub fn count(&self, options: &QueryOptions) -> RepoResult<u64> {
        let (sql, args) = select_sql::<T>("COUNT(*)", options, false);
        let total: i64 = self
            .conn
            .query_row(&sql, params_from_iter(args), |row| row.get(0))?;
        Ok(total as u64)
    }

    /// Returns one page of matching rows. `page` and `size` are normalized
    /// by the repository's paging configuration.
    pub fn find(&self, page: i64, size: i64, options: &QueryOptions) -> RepoResult<Vec<T>> {
        let (offset, limit) = self.paging.params(page, size);
        self.query_rows(options, Some((offset, limit)))
    }

    /// Returns every matching row, unpaged.
    pub fn find_all(&self, options: &QueryOptions) -> RepoResult<Vec<T>> {
        self.query_rows(options, None)
    }

    /// Returns one page of rows together with the total match count.
    /// A zero total short-circuits without running the row query.
    pub fn find_with_count(
        &self,
        page: i64,
        size: i64,
        options: &QueryOptions,
    ) -> RepoResult<(Vec<T>, u64)> {
        let total = self.count(options)?;
        if total == 0 {
            return Ok((Vec::new(), 0));
        }
        let rows = self.find(page, size, options)?;
        Ok((rows, total))
    }

    /// Returns the first matching row.
    ///
    /// A missing row is `Ok(None)` when the ignore option is set, otherwise
    /// `Err(NotFound)`.
    pub fn first(&self, options: &QueryOptions) -> RepoResult<Option<T>> {
        match self.query_first(options)? {
            Some(row) => Ok(Some(row)),
            None if options.ignore => Ok(None),
            None => Err(RepoError::NotFound {
                table: T::table_name(),
            }),
        }
    }

    /// First matching row as a plain optional, independent of the ignore
    /// flag. Shared by `first` and the create-if-absent helpers.
    pub(crate) fn query_first(&self, options: &QueryOptions) -> RepoResult<Option<T>> {
        let (mut sql, args) = select_sql::<T>(&select_list::<T>(), options, true);
        sql.push_str(" LIMIT 1");
        match self.conn.query_row(&sql, params_from_iter(args), T::from_row) {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn query_rows(
        &self,
        options: &QueryOptions,
        window: Option<(u64, u64)>,
    ) -> RepoResult<Vec<T>> {
        let (mut sql, mut args) = select_sql::<T>(&select_list::<T>(), options, true);
        if let Some((offset, limit)) = window {
            // A saturated offset clamps rather than wrapping negative.
            sql.push_str(" LIMIT ? OFFSET ?");
            args.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
            args.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(args))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(T::from_row(row)?);
        }
        Ok(result)
    }
}
