mod source;
mod sqlite;

pub use source::{ColumnRef, Filter, RawTextValue, SourceQuery, TextSource};
pub use sqlite::{is_text_type, SqliteStore};
