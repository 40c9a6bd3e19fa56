//! SQL DDL for initializing the certificate store.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `reg_no` UNIQUE (creates an index implicitly)
/// - `usn` indexed for the fallback lookup
/// - `year` stored as INTEGER
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS certificates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    reg_no TEXT NOT NULL UNIQUE,
    usn TEXT NULL,
    name TEXT NOT NULL,
    father_name TEXT NULL,
    institution TEXT NOT NULL,
    degree TEXT NOT NULL,
    year INTEGER NOT NULL,
    assigned_date TEXT NULL,
    certificate_type TEXT NULL,
    notes TEXT NULL
);

CREATE INDEX IF NOT EXISTS idx_certificates_usn ON certificates(usn);
"#;
