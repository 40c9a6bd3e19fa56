use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One issued certificate, keyed by its registration number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct CertificateRecord {
    #[serde(default)]
    pub id: i64,
    pub reg_no: String,
    #[serde(default)]
    pub usn: Option<String>,
    pub name: String,
    #[serde(default)]
    pub father_name: Option<String>,
    pub institution: String,
    pub degree: String,
    pub year: i64,
    #[serde(default)]
    pub assigned_date: Option<String>,
    #[serde(default)]
    pub certificate_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CertificateRecord {
    pub fn new(
        reg_no: impl AsRef<str>,
        name: impl Into<String>,
        institution: impl Into<String>,
        degree: impl Into<String>,
        year: i64,
    ) -> Self {
        Self {
            id: 0,
            reg_no: normalize_reg_no(reg_no.as_ref()),
            usn: None,
            name: name.into(),
            father_name: None,
            institution: institution.into(),
            degree: degree.into(),
            year,
            assigned_date: None,
            certificate_type: None,
            notes: None,
        }
    }
}

/// Canonical key form: trimmed, upper-case, without inner spaces or hyphens.
pub fn normalize_reg_no(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reg_no_is_normalized() {
        assert_eq!(normalize_reg_no(" abc-2023 001 "), "ABC2023001");
        assert_eq!(
            CertificateRecord::new("1bg19cs100", "A", "B", "C", 2023).reg_no,
            "1BG19CS100"
        );
    }
}
