//! Transactional find-or-create-or-update.
//!
//! # Responsibility
//! - Resolve the final row state for a logical key under concurrent
//!   writers, inside one commit/rollback unit.
//!
//! # Invariants
//! - Preconditions are checked before the transaction opens; violations
//!   perform no database access.
//! - After the initial probe, the update and re-read are pinned to the
//!   discovered primary-key value, never the original where-set.
//! - The duplicate-key race is absorbed only when the database backs the
//!   intended uniqueness with a constraint.

use super::create::insert_record;
use super::update::set_clause;
use super::SqliteRepository;
use crate::error::{RepoError, RepoResult};
use crate::options::QueryOptions;
use crate::record::{primary_key_field, select_list, FieldMeta, Record};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Transaction, TransactionBehavior};

impl<T: Record + Clone> SqliteRepository<'_, T> {
    /// Finds the row matching the options and applies `update_fields` to
    /// it, or inserts `default_record` when no row matches. Returns the
    /// final row state.
    ///
    /// Runs in one immediate transaction. A duplicate-key conflict on the
    /// insert (a concurrent writer won the race) is resolved by re-reading
    /// the row by equality on `default_record`'s non-null field values.
    ///
    /// # Errors
    /// - `Precondition` when `update_fields` is empty or the options carry
    ///   no where-condition; checked before any SQL runs.
    /// - `NoPrimaryKey` when the record type declares none.
    /// - Any other failure rolls the transaction back and propagates.
    pub fn upsert(
        &mut self,
        default_record: &T,
        update_fields: &[(&str, Value)],
        options: &QueryOptions,
    ) -> RepoResult<T> {
        if update_fields.is_empty() {
            return Err(RepoError::Precondition(
                "update_fields must not be empty".to_string(),
            ));
        }
        if !options.has_conditions() {
            return Err(RepoError::Precondition(
                "at least one where condition is required".to_string(),
            ));
        }

        let pk = primary_key_field::<T>().ok_or(RepoError::NoPrimaryKey {
            table: T::table_name(),
        })?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = run_upsert(&tx, pk, default_record, update_fields, options)?;
        tx.commit()?;
        Ok(outcome)
    }
}

fn run_upsert<T: Record + Clone>(
    tx: &Transaction<'_>,
    pk: &FieldMeta,
    default_record: &T,
    update_fields: &[(&str, Value)],
    options: &QueryOptions,
) -> RepoResult<T> {
    // Probe for the primary key only; ordering is irrelevant here.
    let (where_sql, where_args) = options.where_sql();
    let probe_sql = format!(
        "SELECT {} FROM {}{where_sql} LIMIT 1",
        pk.column_name(),
        T::table_name()
    );
    let existing_key = match tx.query_row(&probe_sql, params_from_iter(where_args), |row| {
        row.get::<_, Value>(0)
    }) {
        Ok(value) => Some(value),
        Err(rusqlite::Error::QueryReturnedNoRows) => None,
        Err(err) => return Err(err.into()),
    };

    let Some(pk_value) = existing_key else {
        let mut created = default_record.clone();
        return match insert_record(tx, &mut created) {
            Ok(()) => {
                debug!(
                    "event=upsert module=repo status=ok table={} branch=create",
                    T::table_name()
                );
                Ok(created)
            }
            // A concurrent writer inserted the row between probe and
            // insert; the row now present is the outcome.
            Err(err) if err.is_duplicate() => {
                debug!(
                    "event=upsert module=repo status=ok table={} branch=conflict_reread",
                    T::table_name()
                );
                read_by_equality(tx, default_record)
            }
            Err(err) => Err(err),
        };
    };

    // Pin to the discovered key: the original where-set may match other
    // rows after concurrent modification.
    let (set_sql, mut args) = set_clause(update_fields);
    let update_sql = format!(
        "UPDATE {} SET {set_sql} WHERE {} = ?",
        T::table_name(),
        pk.column_name()
    );
    args.push(pk_value.clone());
    tx.execute(&update_sql, params_from_iter(args))?;

    let reread_sql = format!(
        "SELECT {} FROM {} WHERE {} = ? LIMIT 1",
        select_list::<T>(),
        T::table_name(),
        pk.column_name()
    );
    match tx.query_row(&reread_sql, [pk_value], T::from_row) {
        Ok(row) => {
            debug!(
                "event=upsert module=repo status=ok table={} branch=update",
                T::table_name()
            );
            Ok(row)
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(RepoError::NotFound {
            table: T::table_name(),
        }),
        Err(err) => Err(err.into()),
    }
}

/// Re-reads the row a racing writer inserted, matching on every non-null
/// field value of `default_record`.
fn read_by_equality<T: Record>(tx: &Transaction<'_>, default_record: &T) -> RepoResult<T> {
    let mut exprs = Vec::new();
    let mut args = Vec::new();
    for (field, value) in T::fields().iter().zip(default_record.values()) {
        if matches!(value, Value::Null) {
            continue;
        }
        exprs.push(format!("{} = ?", field.column_name()));
        args.push(value);
    }

    if exprs.is_empty() {
        return Err(RepoError::NotFound {
            table: T::table_name(),
        });
    }

    let sql = format!(
        "SELECT {} FROM {} WHERE {} LIMIT 1",
        select_list::<T>(),
        T::table_name(),
        exprs.join(" AND ")
    );
    match tx.query_row(&sql, params_from_iter(args), T::from_row) {
        Ok(row) => Ok(row),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(RepoError::NotFound {
            table: T::table_name(),
        }),
        Err(err) => Err(err.into()),
    }
}
