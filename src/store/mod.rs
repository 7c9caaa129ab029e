pub mod schema;
pub mod sqlite_store;

pub use schema::{ColumnDef, SchemaVariant, SqlType, TableKind};
pub use sqlite_store::{SqliteStore, TableSnapshot};
