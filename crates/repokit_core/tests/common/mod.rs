#![allow(dead_code)]

use repokit_core::{open_db_in_memory, FieldMeta, Record};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

/// Sample row type used across integration tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<i64>,
    pub address: String,
    pub nickname: String,
    pub level: i64,
}

impl Record for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn fields() -> &'static [FieldMeta] {
        const FIELDS: &[FieldMeta] = &[
            FieldMeta::new("id").primary(),
            FieldMeta::new("address"),
            FieldMeta::new("nickname"),
            FieldMeta::new("level"),
        ];
        FIELDS
    }

    fn values(&self) -> Vec<Value> {
        vec![
            match self.id {
                Some(id) => Value::Integer(id),
                None => Value::Null,
            },
            Value::Text(self.address.clone()),
            Value::Text(self.nickname.clone()),
            Value::Integer(self.level),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            address: row.get("address")?,
            nickname: row.get("nickname")?,
            level: row.get("level")?,
        })
    }

    fn assign_generated_key(&mut self, rowid: i64) {
        self.id = Some(rowid);
    }
}

pub const USERS_SCHEMA: &str = "CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    address TEXT NOT NULL UNIQUE,
    nickname TEXT NOT NULL DEFAULT '',
    level INTEGER NOT NULL DEFAULT 0
);";

pub fn open_user_db() -> Connection {
    let conn = open_db_in_memory().expect("in-memory database should open");
    conn.execute_batch(USERS_SCHEMA)
        .expect("users schema should apply");
    conn
}

pub fn user(address: &str, level: i64) -> User {
    User {
        id: None,
        address: address.to_string(),
        nickname: String::new(),
        level,
    }
}

pub fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}
