use super::source::{ColumnRef, Filter, RawTextValue, SourceQuery, TextSource};
use crate::error::Error;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

/// Leading type words treated as text-capable.
const TEXT_TYPES: &[&str] = &[
    "char",
    "varchar",
    "text",
    "tinytext",
    "mediumtext",
    "longtext",
    "json",
    "clob",
    "nchar",
    "nvarchar",
    "character",
];

/// Read-only view of a SQLite snapshot of the store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let store = SqliteStore { conn };
        store.configure_pragmas()?;
        debug!("Opened store snapshot {}", path.display());
        Ok(store)
    }

    /// Wraps an already-populated connection; it is switched to query-only.
    pub fn from_connection(conn: Connection) -> Result<Self, Error> {
        let store = SqliteStore { conn };
        store.configure_pragmas()?;
        Ok(store)
    }

    fn configure_pragmas(&self) -> Result<(), Error> {
        self.conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }
}

impl TextSource for SqliteStore {
    fn tables(&self) -> Result<Vec<String>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn text_columns(&self, table: &str) -> Result<Vec<ColumnRef>, Error> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
        let columns = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(1)?, row.get::<_, Option<String>>(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(columns
            .into_iter()
            .filter(|(name, declared)| {
                !name.is_empty() && is_text_type(declared.as_deref().unwrap_or(""))
            })
            .map(|(name, _)| ColumnRef::new(table, name))
            .collect())
    }

    fn stream(
        &self,
        query: &SourceQuery,
        visit: &mut dyn FnMut(RawTextValue),
    ) -> Result<usize, Error> {
        let (sql, params) = build_select(query);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;

        let mut row_index = 0usize;
        let mut visited = 0usize;
        while let Some(row) = rows.next()? {
            row_index += 1;
            let value = match row.get_ref(0)? {
                ValueRef::Null => continue,
                ValueRef::Integer(i) => i.to_string(),
                ValueRef::Real(f) => f.to_string(),
                ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                    String::from_utf8_lossy(bytes).into_owned()
                }
            };
            if value.is_empty() {
                continue;
            }
            visited += 1;
            visit(RawTextValue::new(
                value,
                format!("{}.{}#{}", query.table, query.column, row_index),
            ));
        }
        Ok(visited)
    }
}

/// Declared type's leading word decides; `VARCHAR(255)` is `varchar`.
pub fn is_text_type(declared: &str) -> bool {
    let lowered = declared.trim().to_ascii_lowercase();
    let base: String = lowered
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let base = if base.is_empty() { lowered } else { base };
    TEXT_TYPES.contains(&base.as_str())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn build_select(query: &SourceQuery) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    for filter in &query.filters {
        match filter {
            Filter::NotEmpty(column) => {
                let c = quote_ident(column);
                conditions.push(format!("{c} IS NOT NULL AND {c} != ''"));
            }
            Filter::ContainsAny { column, needles } => {
                let c = quote_ident(column);
                let ors: Vec<String> = needles
                    .iter()
                    .map(|needle| {
                        params.push(format!("%{}%", escape_like(needle)));
                        format!("{c} LIKE ? ESCAPE '\\'")
                    })
                    .collect();
                conditions.push(or_group(ors));
            }
            Filter::LikeAny { column, patterns } => {
                let c = quote_ident(column);
                let ors: Vec<String> = patterns
                    .iter()
                    .map(|pattern| {
                        params.push(pattern.clone());
                        format!("{c} LIKE ?")
                    })
                    .collect();
                conditions.push(or_group(ors));
            }
            Filter::In { column, values } => {
                if values.is_empty() {
                    conditions.push("0".to_string());
                    continue;
                }
                let placeholders = vec!["?"; values.len()].join(", ");
                params.extend(values.iter().cloned());
                conditions.push(format!("{} IN ({})", quote_ident(column), placeholders));
            }
        }
    }

    let mut sql = format!(
        "SELECT {} FROM {}",
        quote_ident(&query.column),
        quote_ident(&query.table)
    );
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    (sql, params)
}

fn or_group(ors: Vec<String>) -> String {
    if ors.is_empty() {
        "0".to_string()
    } else {
        format!("({})", ors.join(" OR "))
    }
}
