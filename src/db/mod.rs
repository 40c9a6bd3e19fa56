//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: the certificate row and key normalisation
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pooled CRUD and lookups
//! - `import.rs`: CSV roster import

pub mod import;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use import::{ImportSummary, import_csv};
pub use models::{CertificateRecord, normalize_reg_no};
pub use schema::SQLITE_INIT;
pub use sqlite::{CertificateStore, SqlitePool};
