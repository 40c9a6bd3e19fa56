use crate::config::SealConfig;
use crate::types::{CheckStatus, CombinedVerdict, Decision, SealSummary, Verdict, VerificationResult};

/// Fold the database verification and optional seal evidence into one verdict.
///
/// Fake seals seen with enough confidence reject the certificate whatever the
/// text says. Without seal evidence the text check alone must pass with a
/// high score; with it, both checks must pass.
pub fn combine(
    verification: &VerificationResult,
    seals: Option<&SealSummary>,
    cfg: &SealConfig,
) -> CombinedVerdict {
    let ocr_status = if verification.decision == Decision::Authentic {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };

    let Some(seals) = seals else {
        let real = ocr_status == CheckStatus::Pass && verification.final_score > cfg.ocr_only_score;
        let reason = if real {
            "Database verification passed; no seal verification performed".to_string()
        } else {
            format!(
                "Database verification {} (score {:.0}%); no seal verification performed",
                verification.decision,
                verification.final_score * 100.0
            )
        };
        return CombinedVerdict {
            verdict: if real { Verdict::Real } else { Verdict::Fake },
            ocr_status,
            seal_status: None,
            reason,
        };
    };

    if seals.fake_count > 0 && seals.confidence > cfg.fake_confidence {
        return CombinedVerdict {
            verdict: Verdict::Fake,
            ocr_status,
            seal_status: Some(seals.status),
            reason: format!(
                "{} fake seal(s) detected with {:.0}% confidence",
                seals.fake_count,
                seals.confidence * 100.0
            ),
        };
    }

    let real = ocr_status == CheckStatus::Pass && seals.status == CheckStatus::Pass;
    let reason = if real {
        "Database and seal verification both passed".to_string()
    } else {
        format!(
            "Database verification: {ocr_status}; seal verification: {} ({})",
            seals.status, seals.reason
        )
    };
    CombinedVerdict {
        verdict: if real { Verdict::Real } else { Verdict::Fake },
        ocr_status,
        seal_status: Some(seals.status),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractedFields;

    fn verification(decision: Decision, final_score: f64) -> VerificationResult {
        VerificationResult {
            decision,
            final_score,
            registration_no: Some("ABC2023001".to_string()),
            db_record: None,
            ocr_extracted: ExtractedFields::default(),
            field_scores: None,
            reasons: Vec::new(),
            confidence: 0.95,
            filename: None,
        }
    }

    fn seals(status: CheckStatus, confidence: f64, fake_count: usize, total: usize) -> SealSummary {
        SealSummary {
            status,
            confidence,
            real_count: total - fake_count,
            fake_count,
            total,
            reason: String::new(),
        }
    }

    #[test]
    fn confident_fake_seals_reject_good_text() {
        let v = combine(
            &verification(Decision::Authentic, 0.95),
            Some(&seals(CheckStatus::Fail, 0.85, 3, 3)),
            &SealConfig::default(),
        );
        assert_eq!(v.verdict, Verdict::Fake);
        assert_eq!(v.ocr_status, CheckStatus::Pass);
    }

    #[test]
    fn good_text_and_good_seals_pass() {
        let v = combine(
            &verification(Decision::Authentic, 0.95),
            Some(&seals(CheckStatus::Pass, 0.90, 0, 2)),
            &SealConfig::default(),
        );
        assert_eq!(v.verdict, Verdict::Real);
        assert_eq!(v.seal_status, Some(CheckStatus::Pass));
    }

    #[test]
    fn low_confidence_fake_seals_still_fail_the_seal_check() {
        let v = combine(
            &verification(Decision::Authentic, 0.95),
            Some(&seals(CheckStatus::Fail, 0.60, 2, 2)),
            &SealConfig::default(),
        );
        assert_eq!(v.verdict, Verdict::Fake);
    }

    #[test]
    fn poor_text_with_good_seals_fails() {
        let v = combine(
            &verification(Decision::Suspect, 0.60),
            Some(&seals(CheckStatus::Pass, 0.90, 0, 1)),
            &SealConfig::default(),
        );
        assert_eq!(v.verdict, Verdict::Fake);
        assert_eq!(v.ocr_status, CheckStatus::Fail);
    }

    #[test]
    fn text_alone_needs_a_high_score() {
        let cfg = SealConfig::default();
        let v = combine(&verification(Decision::Authentic, 0.90), None, &cfg);
        assert_eq!(v.verdict, Verdict::Real);
        assert!(v.seal_status.is_none());

        let mut strict = cfg.clone();
        strict.ocr_only_score = 0.95;
        let v = combine(&verification(Decision::Authentic, 0.90), None, &strict);
        assert_eq!(v.verdict, Verdict::Fake);
    }
}
