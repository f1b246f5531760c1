//! Query-modification options shared by every helper operation.
//!
//! # Responsibility
//! - Accumulate where-conditions, a single ordering clause, and the ignore
//!   flag into one immutable descriptor per call.
//! - Render `WHERE`/`ORDER BY` fragments plus the flattened parameter list.
//!
//! # Invariants
//! - Conditions are ANDed in the order they were added.
//! - The ordering clause is single-valued; the last write wins.
//! - No fragment validation happens here; malformed SQL surfaces at
//!   execution time.

use rusqlite::types::Value;

#[derive(Debug, Clone)]
pub(crate) struct WhereClause {
    pub expr: String,
    pub args: Vec<Value>,
}

/// Accumulated query modifiers. Built once per call via the consuming
/// builder methods, then treated as read-only.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub(crate) wheres: Vec<WhereClause>,
    pub(crate) order_by: Option<String>,
    pub(crate) ignore: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one condition with its positional arguments.
    pub fn filter(mut self, expr: impl Into<String>, args: impl IntoIterator<Item = Value>) -> Self {
        self.wheres.push(WhereClause {
            expr: expr.into(),
            args: args.into_iter().collect(),
        });
        self
    }

    /// Sets the ordering clause, replacing any earlier one.
    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    /// Tolerate duplicate-key conflicts on writes and missing rows on
    /// `first` reads.
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn has_conditions(&self) -> bool {
        !self.wheres.is_empty()
    }

    /// Renders `" WHERE (a) AND (b)"` and the flattened arguments, or an
    /// empty fragment when no conditions were added. Each condition is
    /// parenthesized so caller-written OR expressions keep their grouping.
    pub(crate) fn where_sql(&self) -> (String, Vec<Value>) {
        if self.wheres.is_empty() {
            return (String::new(), Vec::new());
        }

        let exprs: Vec<String> = self
            .wheres
            .iter()
            .map(|clause| format!("({})", clause.expr))
            .collect();
        let args = self
            .wheres
            .iter()
            .flat_map(|clause| clause.args.iter().cloned())
            .collect();
        (format!(" WHERE {}", exprs.join(" AND ")), args)
    }

    /// Renders `" ORDER BY ..."` or an empty fragment.
    pub(crate) fn order_sql(&self) -> String {
        match &self.order_by {
            Some(clause) => format!(" ORDER BY {clause}"),
            None => String::new(),
        }
    }
}
