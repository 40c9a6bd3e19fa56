//! Cleans OCR text and pulls certificate fields out of it.
//!
//! Patterns cover the layouts seen on issued certificates: the
//! "This is to certify that / NAME / ... / from / INSTITUTION" completion
//! format and the labelled grade-card format (`Name of the Student:`,
//! `USN:`).

use crate::db::normalize_reg_no;
use crate::types::ExtractedFields;
use regex::Regex;
use std::sync::LazyLock;

const MIN_REG_LEN: usize = 5;
const MAX_REG_LEN: usize = 15;

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());

static LABELLED_REG_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)registration\s*(?:number|no\.?|#)?\s*[:\-]?\s*([A-Z0-9][A-Z0-9\-]{3,18}[A-Z0-9])",
        r"(?i)\breg(?:istration)?\.?\s*no\.?\s*[:\-]?\s*([A-Z0-9][A-Z0-9\-]{3,18}[A-Z0-9])",
        r"(?i)\bUSN\s*[:\-]?\s*([A-Z0-9]{5,15})\b",
        r"(?i)\broll\s*(?:number|no\.?)\s*[:\-]?\s*([A-Z0-9][A-Z0-9\-]{3,18}[A-Z0-9])",
        r"(?i)certificate\s*(?:number|no\.?)\s*[:\-]?\s*([A-Z0-9][A-Z0-9\-]{3,18}[A-Z0-9])",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static UNLABELLED_REG_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // VTU-style USN, e.g. 1BG19CS100
        r"\b(\d[A-Z]{2}\d{2}[A-Z]{2}\d{3})\b",
        r"\b([A-Z]{2,5}\d{4,8})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static NAME_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*name\s+of\s+the\s+(?:student|candidate)\s*[:\-]\s*(.+?)\s*$").unwrap()
});

static CERTIFY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcertif(?:y|ies)\s+that\b").unwrap());

static COLLEGE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*name\s+of\s+the\s+(?:college|institution|institute)\s*[:\-]\s*(.+?)\s*$")
        .unwrap()
});

static FROM_INLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfrom\s+(.+?)\s*$").unwrap());

// "M.Tech AI from Global Tech University": the degree stops before "from"
static DEGREE_TAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+from\s+").unwrap());

static INSTITUTION_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:university|institute|college|academy|polytechnic)\b").unwrap()
});

static DEGREE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b((?:(?:B\.?\s?Tech|M\.?\s?Tech|B\.?\s?Sc|M\.?\s?Sc|B\.?\s?Com|MBA|BCA|MCA|Ph\.?\s?D)\b|(?:B\.\s?E|M\.\s?E|B\.\s?A|M\.\s?A)\.)[^\n]*)",
    )
    .unwrap()
});

static YEAR_LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:in\s+the\s+year|year\s*(?:of\s+passing)?\s*[:\-]?)\s*((?:19|20)\d{2})\b")
        .unwrap()
});

static YEAR_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

/// Normalise line endings, collapse horizontal whitespace, trim lines and drop blank ones.
pub fn clean_text(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(|line| SPACE_RUNS.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Registration-number candidates in priority order: labelled values first,
/// then bare tokens shaped like a registration number. De-duplicated.
pub fn extract_registration_numbers(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut push = |raw: &str| {
        let value = normalize_reg_no(raw);
        let plausible = (MIN_REG_LEN..=MAX_REG_LEN).contains(&value.len())
            && value.chars().any(|c| c.is_ascii_digit())
            && value.chars().all(|c| c.is_ascii_alphanumeric());
        if plausible && !found.contains(&value) {
            found.push(value);
        }
    };

    for pattern in LABELLED_REG_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                push(m.as_str());
            }
        }
    }

    let upper = text.to_uppercase();
    for pattern in UNLABELLED_REG_PATTERNS.iter() {
        for caps in pattern.captures_iter(&upper) {
            if let Some(m) = caps.get(1) {
                push(m.as_str());
            }
        }
    }
    found
}

pub fn extract_fields(text: &str) -> ExtractedFields {
    let cleaned = clean_text(text);
    let lines: Vec<&str> = cleaned.lines().collect();
    ExtractedFields {
        name: extract_name(&cleaned, &lines),
        institution: extract_institution(&cleaned, &lines),
        degree: extract_degree(&cleaned),
        year: extract_year(&cleaned),
        raw_text: cleaned.clone(),
    }
}

fn extract_name(text: &str, lines: &[&str]) -> Option<String> {
    if let Some(caps) = NAME_LABEL.captures(text) {
        return Some(caps[1].to_string());
    }
    let idx = lines.iter().position(|l| CERTIFY_LINE.is_match(l))?;
    // "certify that SAKSHAM SHARMA" on one line
    let tail = CERTIFY_LINE.splitn(lines[idx], 2).nth(1).map(str::trim);
    if let Some(tail) = tail.filter(|t| !t.is_empty()) {
        return Some(tail.to_string());
    }
    lines.get(idx + 1).map(|l| l.to_string())
}

fn extract_institution(text: &str, lines: &[&str]) -> Option<String> {
    if let Some(caps) = COLLEGE_LABEL.captures(text) {
        return Some(caps[1].to_string());
    }
    for (i, line) in lines.iter().enumerate() {
        if line.eq_ignore_ascii_case("from") {
            if let Some(next) = lines.get(i + 1) {
                return Some(next.to_string());
            }
        } else if let Some(caps) = FROM_INLINE.captures(line) {
            return Some(caps[1].to_string());
        }
    }
    lines
        .iter()
        .find(|l| INSTITUTION_WORD.is_match(l))
        .map(|l| l.to_string())
}

fn extract_degree(text: &str) -> Option<String> {
    let caps = DEGREE_PATTERN.captures(text)?;
    let degree = DEGREE_TAIL.split(&caps[1]).next().unwrap_or_default().trim();
    (!degree.is_empty()).then(|| degree.to_string())
}

fn extract_year(text: &str) -> Option<i64> {
    YEAR_LABELLED
        .captures(text)
        .or_else(|| YEAR_BARE.captures(text))
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETION: &str = "CERTIFICATE OF COMPLETION\n\n  This is to certify that\n\n  SAKSHAM   SHARMA\n\nhas successfully completed the course\n\nB.Tech Computer Engineering\n\nfrom\n\nDevLabs Institute\n\nin the year 2023\n\nRegistration Number: ABC2023001\n\nDate of Issue: December 2023";

    const GRADE_CARD: &str = "VISVESVARAYA TECHNOLOGICAL UNIVERSITY, BELAGA VI\nKARNATAKA, INDIA\nGRADE CARD\nB.E. Computer Science & Engineering August 2020\nTEUG 1B 19C100\nName of the Student: VIKRAM VERMA\nFather o / Mothers Name : ASHOK VERMA\nName of the College: B.N.M. INSTITUTE OF TECHNOLOGY, BANGALORE\nUSN: 1BG19CS100";

    #[test]
    fn clean_text_collapses_whitespace_and_blank_lines() {
        assert_eq!(clean_text("  a \t b \r\n\r\n c  "), "a b\nc");
    }

    #[test]
    fn completion_certificate_fields() {
        let fields = extract_fields(COMPLETION);
        assert_eq!(fields.name.as_deref(), Some("SAKSHAM SHARMA"));
        assert_eq!(fields.institution.as_deref(), Some("DevLabs Institute"));
        assert_eq!(fields.degree.as_deref(), Some("B.Tech Computer Engineering"));
        assert_eq!(fields.year, Some(2023));
        assert_eq!(extract_registration_numbers(COMPLETION)[0], "ABC2023001");
    }

    #[test]
    fn grade_card_fields() {
        let fields = extract_fields(GRADE_CARD);
        assert_eq!(fields.name.as_deref(), Some("VIKRAM VERMA"));
        assert_eq!(
            fields.institution.as_deref(),
            Some("B.N.M. INSTITUTE OF TECHNOLOGY, BANGALORE")
        );
        assert!(fields.degree.unwrap().starts_with("B.E. Computer Science"));
        assert_eq!(fields.year, Some(2020));

        let regs = extract_registration_numbers(GRADE_CARD);
        assert_eq!(regs[0], "1BG19CS100");
    }

    #[test]
    fn inline_certify_and_from() {
        let text = "This certifies that PRISHA VERMA\nhas completed M.Tech AI\nfrom Global Tech University\nYear: 2022\nRegistration: ABC2022007";
        let fields = extract_fields(text);
        assert_eq!(fields.name.as_deref(), Some("PRISHA VERMA"));
        assert_eq!(fields.institution.as_deref(), Some("Global Tech University"));
        assert_eq!(fields.degree.as_deref(), Some("M.Tech AI"));
        assert_eq!(fields.year, Some(2022));
        assert_eq!(extract_registration_numbers(text), vec!["ABC2022007"]);

        let sentence = "This certifies that PRISHA VERMA\nhas completed M.Tech AI from Global Tech University\nYear: 2022";
        let fields = extract_fields(sentence);
        assert_eq!(fields.institution.as_deref(), Some("Global Tech University"));
        assert_eq!(fields.degree.as_deref(), Some("M.Tech AI"));
    }

    #[test]
    fn registration_candidates_are_deduplicated_and_validated() {
        let text = "Reg No: UNI10009\nSerial UNI10009 and X1 and ABCDEFG";
        assert_eq!(extract_registration_numbers(text), vec!["UNI10009"]);
        assert!(extract_registration_numbers("no numbers here").is_empty());
    }
}
