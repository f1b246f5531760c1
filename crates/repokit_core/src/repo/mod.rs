//! Generic SQLite repository over any `Record` type.
//!
//! # Responsibility
//! - Offer typed CRUD, paging, bulk-insert, and upsert helpers so callers
//!   stop hand-writing per-table query boilerplate.
//! - Keep all SQL assembly behind this module boundary.
//!
//! # Invariants
//! - Read helpers never mutate; write helpers report semantic errors
//!   (`NotFound`, `Precondition`, duplicate classification) in addition to
//!   transport errors.
//! - Only `upsert` opens a transaction; every other helper is a single
//!   statement (or an independent statement per batch).

mod bulk;
mod create;
mod query;
mod update;
mod upsert;

use crate::options::QueryOptions;
use crate::paging::PagingConfig;
use crate::record::Record;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::marker::PhantomData;

/// SQLite-backed repository for one record type.
pub struct SqliteRepository<'conn, T> {
    conn: &'conn mut Connection,
    paging: PagingConfig,
    _record: PhantomData<T>,
}

impl<'conn, T: Record> SqliteRepository<'conn, T> {
    /// Constructs a repository with default paging limits.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self::with_paging(conn, PagingConfig::default())
    }

    /// Constructs a repository with caller-supplied paging limits.
    pub fn with_paging(conn: &'conn mut Connection, paging: PagingConfig) -> Self {
        Self {
            conn,
            paging,
            _record: PhantomData,
        }
    }
}

/// `SELECT <projection> FROM <table><where>[<order>]` plus parameters.
pub(crate) fn select_sql<T: Record>(
    projection: &str,
    options: &QueryOptions,
    with_order: bool,
) -> (String, Vec<Value>) {
    let (where_sql, args) = options.where_sql();
    let mut sql = format!("SELECT {projection} FROM {}{where_sql}", T::table_name());
    if with_order {
        sql.push_str(&options.order_sql());
    }
    (sql, args)
}
