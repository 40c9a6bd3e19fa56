use crate::db::models::{CertificateRecord, normalize_reg_no};
use crate::db::schema::SQLITE_INIT;
use crate::error::VerifierError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

const SELECT_COLUMNS: &str = r#"SELECT id, reg_no, usn, name, father_name, institution, degree,
       year, assigned_date, certificate_type, notes
       FROM certificates"#;

const UPSERT: &str = r#"
    INSERT INTO certificates (
        reg_no, usn, name, father_name, institution, degree,
        year, assigned_date, certificate_type, notes
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(reg_no) DO UPDATE SET
        usn=excluded.usn,
        name=excluded.name,
        father_name=excluded.father_name,
        institution=excluded.institution,
        degree=excluded.degree,
        year=excluded.year,
        assigned_date=excluded.assigned_date,
        certificate_type=excluded.certificate_type,
        notes=excluded.notes
"#;

#[derive(Clone)]
pub struct CertificateStore {
    pool: SqlitePool,
}

impl CertificateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, VerifierError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), VerifierError> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Upsert by unique reg_no. Returns the row id.
    pub async fn upsert(&self, record: &CertificateRecord) -> Result<i64, VerifierError> {
        let reg_no = normalize_reg_no(&record.reg_no);
        if reg_no.is_empty() {
            return Err(VerifierError::BadRequest(
                "registration number must not be empty".to_string(),
            ));
        }
        bind_record(sqlx::query(UPSERT), &reg_no, record)
            .execute(&self.pool)
            .await?;

        let rec: (i64,) = sqlx::query_as("SELECT id FROM certificates WHERE reg_no = ?")
            .bind(reg_no)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    /// Batch upsert using a single transaction. Returns ids in the same order.
    pub async fn upsert_many(
        &self,
        records: &[CertificateRecord],
    ) -> Result<Vec<i64>, VerifierError> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            let reg_no = normalize_reg_no(&record.reg_no);
            if reg_no.is_empty() {
                return Err(VerifierError::BadRequest(
                    "registration number must not be empty".to_string(),
                ));
            }
            bind_record(sqlx::query(UPSERT), &reg_no, record)
                .execute(&mut *tx)
                .await?;

            let rec: (i64,) = sqlx::query_as("SELECT id FROM certificates WHERE reg_no = ?")
                .bind(reg_no)
                .fetch_one(&mut *tx)
                .await?;
            ids.push(rec.0);
        }

        tx.commit().await?;
        Ok(ids)
    }

    pub async fn get_by_reg_no(
        &self,
        reg_no: &str,
    ) -> Result<Option<CertificateRecord>, VerifierError> {
        let sql = format!("{SELECT_COLUMNS} WHERE reg_no = ?");
        let row = sqlx::query_as::<_, CertificateRecord>(&sql)
            .bind(normalize_reg_no(reg_no))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Case-insensitive match on `reg_no`, then on `usn`.
    pub async fn lookup(&self, candidate: &str) -> Result<Option<CertificateRecord>, VerifierError> {
        let key = normalize_reg_no(candidate);
        if key.is_empty() {
            return Ok(None);
        }
        if let Some(found) = self.get_by_reg_no(&key).await? {
            return Ok(Some(found));
        }
        let sql = format!("{SELECT_COLUMNS} WHERE usn = ? COLLATE NOCASE ORDER BY id LIMIT 1");
        let row = sqlx::query_as::<_, CertificateRecord>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn count(&self) -> Result<i64, VerifierError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM certificates")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CertificateRecord>, VerifierError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id LIMIT ? OFFSET ?");
        let rows = sqlx::query_as::<_, CertificateRecord>(&sql)
            .bind(limit.max(0))
            .bind(offset.max(0))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, reg_no: &str) -> Result<bool, VerifierError> {
        let res = sqlx::query("DELETE FROM certificates WHERE reg_no = ?")
            .bind(normalize_reg_no(reg_no))
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

fn bind_record<'q>(
    query: sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    reg_no: &str,
    record: &CertificateRecord,
) -> sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    let usn = record
        .usn
        .as_deref()
        .map(normalize_reg_no)
        .filter(|u| !u.is_empty());
    query
        .bind(reg_no.to_string())
        .bind(usn)
        .bind(record.name.trim().to_string())
        .bind(record.father_name.clone())
        .bind(record.institution.trim().to_string())
        .bind(record.degree.trim().to_string())
        .bind(record.year)
        .bind(record.assigned_date.clone())
        .bind(record.certificate_type.clone())
        .bind(record.notes.clone())
}
