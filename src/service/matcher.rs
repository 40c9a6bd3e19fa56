//! Fuzzy string similarity tolerant to OCR noise.
//!
//! All scores are in `[0, 1]`, case-insensitive and ignore punctuation.

use strsim::normalized_levenshtein;

/// Lowercase, map non-alphanumerics to spaces and collapse whitespace.
pub fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalised Levenshtein similarity of the normalised strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let (a, b) = (normalize(a), normalize(b));
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    normalized_levenshtein(&a, &b)
}

/// `ratio` after sorting the tokens of both sides, so word order does not matter.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Best `ratio` of `needle` against every run of `haystack` tokens with the
/// same token count as the needle.
pub fn partial_ratio(needle: &str, haystack: &str) -> f64 {
    let needle = normalize(needle);
    let haystack = normalize(haystack);
    if needle.is_empty() || haystack.is_empty() {
        return 0.0;
    }
    let hay_tokens: Vec<&str> = haystack.split(' ').collect();
    let width = needle.split(' ').count();
    if hay_tokens.len() <= width {
        return normalized_levenshtein(&needle, &haystack);
    }
    hay_tokens
        .windows(width)
        .map(|w| normalized_levenshtein(&needle, &w.join(" ")))
        .fold(0.0, f64::max)
}

/// Score an expected database value against OCR output.
///
/// Uses the extracted field when there is one and also searches the full
/// text, keeping the better of the two.
pub fn field_score(expected: &str, extracted: Option<&str>, full_text: &str) -> f64 {
    if normalize(expected).is_empty() {
        return 0.0;
    }
    let direct = extracted
        .map(|e| token_sort_ratio(expected, e))
        .unwrap_or(0.0);
    direct.max(partial_ratio(expected, full_text))
}

pub fn year_score(expected: i64, extracted: Option<i64>) -> f64 {
    match extracted {
        Some(y) if y == expected => 1.0,
        _ => 0.0,
    }
}

fn sorted_tokens(s: &str) -> String {
    let normalized = normalize(s);
    let mut tokens: Vec<&str> = normalized.split(' ').collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("  B.N.M.  Institute, BANGALORE "), "b n m institute bangalore");
    }

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(ratio("Saksham Sharma", "SAKSHAM SHARMA"), 1.0);
        assert_eq!(token_sort_ratio("Sharma Saksham", "saksham sharma"), 1.0);
    }

    #[test]
    fn ocr_noise_scores_high_but_not_perfect() {
        let s = ratio("Global Tech University", "G1obal Tech Universitv");
        assert!(s > 0.85 && s < 1.0, "score was {s}");
    }

    #[test]
    fn partial_ratio_finds_the_name_in_running_text() {
        let text = "This is to certify that SAKSHAM SHARMA has completed";
        assert_eq!(partial_ratio("Saksham Sharma", text), 1.0);
        assert!(partial_ratio("Prisha Verma", text) < 0.7);
        assert_eq!(partial_ratio("", text), 0.0);
    }

    #[test]
    fn field_score_prefers_the_better_source() {
        let text = "from DevLabs Institute in the year 2023";
        let s = field_score("DevLabs Institute", Some("Something Else"), text);
        assert_eq!(s, 1.0);
        assert_eq!(field_score("", Some("x"), text), 0.0);
    }

    #[test]
    fn year_is_exact() {
        assert_eq!(year_score(2023, Some(2023)), 1.0);
        assert_eq!(year_score(2023, Some(2022)), 0.0);
        assert_eq!(year_score(2023, None), 0.0);
    }
}
