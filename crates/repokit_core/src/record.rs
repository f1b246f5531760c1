//! Record capability contract and column/value extraction.
//!
//! # Responsibility
//! - Define the `Record` trait binding a Rust type to one table row shape.
//! - Resolve ordered column names (explicit override, else field name
//!   verbatim) and render placeholder lists and INSERT statements.
//!
//! # Invariants
//! - `fields()` and `values()` iterate in field declaration order.
//! - Column resolution never case-converts a name.

use rusqlite::types::Value;
use rusqlite::Row;

/// Per-field metadata declared by a `Record` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Field name, used as the column name when no override is present.
    pub name: &'static str,
    /// Explicit column-name override.
    pub column: Option<&'static str>,
    /// Marks the row's primary-key field. Only the first flagged field is
    /// honored by upsert.
    pub primary_key: bool,
}

impl FieldMeta {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column: None,
            primary_key: false,
        }
    }

    pub const fn with_column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    pub const fn primary(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Effective column name: override when declared, else the field name.
    pub fn column_name(&self) -> &'static str {
        self.column.unwrap_or(self.name)
    }
}

/// Capability contract for types persisted as table rows.
///
/// `fields()` and `values()` must agree on order; every helper that builds
/// SQL zips the two together.
pub trait Record: Sized {
    /// Target table name, a pure function of the type.
    fn table_name() -> &'static str;

    /// Field metadata in declaration order.
    fn fields() -> &'static [FieldMeta];

    /// Current field values in declaration order.
    fn values(&self) -> Vec<Value>;

    /// Maps one result row back into the record type.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Receives the generated rowid after a single-row insert when the
    /// primary-key value was `Null`. Default is a no-op for records whose
    /// keys are caller-assigned.
    fn assign_generated_key(&mut self, _rowid: i64) {}
}

/// Ordered effective column names for `T`.
pub fn column_names<T: Record>() -> Vec<&'static str> {
    T::fields().iter().map(FieldMeta::column_name).collect()
}

/// Renders `?, ?, ...` with one positional marker per entry.
pub fn placeholder_list(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// First field flagged as primary key, if any.
pub fn primary_key_field<T: Record>() -> Option<&'static FieldMeta> {
    T::fields().iter().find(|field| field.primary_key)
}

/// Comma-separated projection over all of `T`'s columns.
pub(crate) fn select_list<T: Record>() -> String {
    column_names::<T>().join(", ")
}

/// The record's current primary-key value, by field position.
pub(crate) fn primary_key_value<T: Record>(record: &T) -> Option<Value> {
    let index = T::fields().iter().position(|field| field.primary_key)?;
    record.values().into_iter().nth(index)
}

/// Builds a multi-row INSERT statement:
/// `INSERT [OR IGNORE ]INTO <table> (<columns>) VALUES (?, ...), (?, ...)`.
pub(crate) fn insert_sql<T: Record>(or_ignore: bool, row_count: usize) -> String {
    let group = format!("({})", placeholder_list(T::fields().len()));
    let rows = vec![group; row_count].join(", ");
    format!(
        "INSERT {}INTO {} ({}) VALUES {}",
        if or_ignore { "OR IGNORE " } else { "" },
        T::table_name(),
        select_list::<T>(),
        rows
    )
}

#[cfg(test)]
mod tests {
    use super::{
        column_names, insert_sql, placeholder_list, primary_key_field, primary_key_value,
        FieldMeta, Record,
    };
    use rusqlite::types::Value;
    use rusqlite::Row;

    struct Wallet {
        address: String,
        level: i64,
    }

    impl Record for Wallet {
        fn table_name() -> &'static str {
            "wallets"
        }

        fn fields() -> &'static [FieldMeta] {
            const FIELDS: &[FieldMeta] = &[FieldMeta::new("Address"), FieldMeta::new("Level")];
            FIELDS
        }

        fn values(&self) -> Vec<Value> {
            vec![
                Value::Text(self.address.clone()),
                Value::Integer(self.level),
            ]
        }

        fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
            Ok(Self {
                address: row.get(0)?,
                level: row.get(1)?,
            })
        }
    }

    struct TaggedWallet;

    impl Record for TaggedWallet {
        fn table_name() -> &'static str {
            "wallets"
        }

        fn fields() -> &'static [FieldMeta] {
            const FIELDS: &[FieldMeta] = &[
                FieldMeta::new("Address").with_column("addr").primary(),
                FieldMeta::new("Level"),
            ];
            FIELDS
        }

        fn values(&self) -> Vec<Value> {
            vec![Value::Text("a".to_string()), Value::Integer(1)]
        }

        fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
            let _: String = row.get(0)?;
            Ok(Self)
        }
    }

    #[test]
    fn column_names_use_field_names_verbatim_without_override() {
        assert_eq!(column_names::<Wallet>(), vec!["Address", "Level"]);
    }

    #[test]
    fn column_override_replaces_field_name_only_for_tagged_field() {
        assert_eq!(column_names::<TaggedWallet>(), vec!["addr", "Level"]);
    }

    #[test]
    fn placeholder_list_renders_one_marker_per_field() {
        assert_eq!(placeholder_list(3), "?, ?, ?");
        assert_eq!(placeholder_list(1), "?");
        assert_eq!(placeholder_list(0), "");
    }

    #[test]
    fn insert_sql_repeats_placeholder_group_per_row() {
        assert_eq!(
            insert_sql::<Wallet>(false, 2),
            "INSERT INTO wallets (Address, Level) VALUES (?, ?), (?, ?)"
        );
        assert_eq!(
            insert_sql::<Wallet>(true, 1),
            "INSERT OR IGNORE INTO wallets (Address, Level) VALUES (?, ?)"
        );
    }

    #[test]
    fn primary_key_discovery_returns_first_flagged_field() {
        assert!(primary_key_field::<Wallet>().is_none());
        let pk = primary_key_field::<TaggedWallet>().unwrap();
        assert_eq!(pk.column_name(), "addr");
    }

    #[test]
    fn primary_key_value_reads_by_field_position() {
        let wallet = Wallet {
            address: "w1".to_string(),
            level: 4,
        };
        assert!(primary_key_value(&wallet).is_none());
        assert_eq!(
            primary_key_value(&TaggedWallet),
            Some(Value::Text("a".to_string()))
        );
    }
}
