//! Seal evidence produced by an external detector and classifier.
//!
//! Nothing here runs a model; detections and class indices arrive as input
//! and are cleaned up, labelled and aggregated.

use crate::types::{
    BBox, CheckStatus, DetectionSummary, SealClassification, SealDetection, SealSummary,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const UNKNOWN_LABEL: &str = "unknown";
pub const FALLBACK_METHOD: &str = "fallback_positional";

const MIN_RADIUS: f64 = 30.0;
const MAX_RADIUS: f64 = 150.0;
const HIGH_CONFIDENCE: f64 = 0.8;
const GENUINE_LABELS: [&str; 4] = ["true", "real", "genuine", "authentic"];

/// Where seals usually sit on a certificate, as
/// `(x fraction, y fraction, radius px, confidence)`.
const SEAL_POSITIONS: [(f64, f64, f64, f64); 3] = [
    (0.85, 0.85, 60.0, 0.85), // bottom right
    (0.15, 0.85, 50.0, 0.75), // bottom left
    (0.85, 0.15, 55.0, 0.70), // top right
];

/// Intersection over union. Zero for disjoint or degenerate boxes.
pub fn iou(a: &BBox, b: &BBox) -> f64 {
    let inter = BBox::new(a.x1.max(b.x1), a.y1.max(b.y1), a.x2.min(b.x2), a.y2.min(b.y2));
    let inter_area = inter.area();
    if inter_area <= 0.0 {
        return 0.0;
    }
    let union = a.area() + b.area() - inter_area;
    if union <= 0.0 { 0.0 } else { inter_area / union }
}

fn by_confidence_desc(a: &SealDetection, b: &SealDetection) -> Ordering {
    b.confidence
        .partial_cmp(&a.confidence)
        .unwrap_or(Ordering::Equal)
}

/// Keep the most confident of any group of boxes overlapping more than `overlap`.
pub fn dedupe(mut detections: Vec<SealDetection>, overlap: f64) -> Vec<SealDetection> {
    detections.sort_by(by_confidence_desc);
    let mut kept: Vec<SealDetection> = Vec::with_capacity(detections.len());
    for det in detections {
        if kept.iter().all(|k| iou(&k.bbox, &det.bbox) <= overlap) {
            kept.push(det);
        }
    }
    kept
}

fn method_priority(method: &str) -> u8 {
    match method {
        "official_seal" => 3,
        "circular_validated" => 2,
        "template" => 1,
        _ => 0,
    }
}

/// Deduplicate, rank by detection method then confidence, and keep at most `max`.
pub fn select_best(detections: Vec<SealDetection>, overlap: f64, max: usize) -> Vec<SealDetection> {
    let mut kept = dedupe(detections, overlap);
    kept.sort_by(|a, b| {
        method_priority(&b.method)
            .cmp(&method_priority(&a.method))
            .then_with(|| by_confidence_desc(a, b))
    });
    kept.truncate(max);
    kept
}

/// Candidate seal regions at the usual seal positions, for when no detector is available.
pub fn propose_regions(width: u32, height: u32) -> Vec<SealDetection> {
    let (w, h) = (f64::from(width), f64::from(height));
    SEAL_POSITIONS
        .iter()
        .filter_map(|&(fx, fy, r, confidence)| {
            let (x, y) = ((w * fx).trunc(), (h * fy).trunc());
            let fits = (MIN_RADIUS..=MAX_RADIUS).contains(&r)
                && x - r >= 0.0
                && x + r < w
                && y - r >= 0.0
                && y + r < h;
            fits.then(|| SealDetection {
                bbox: BBox::new(x - r, y - r, x + r, y + r),
                confidence,
                method: FALLBACK_METHOD.to_string(),
                class_id: None,
            })
        })
        .collect()
}

/// Grow `bbox` by `padding` on every side, clamped to the image.
pub fn pad_bbox(bbox: &BBox, padding: u32, width: u32, height: u32) -> BBox {
    let p = f64::from(padding);
    BBox::new(
        (bbox.x1 - p).max(0.0),
        (bbox.y1 - p).max(0.0),
        (bbox.x2 + p).min(f64::from(width)),
        (bbox.y2 + p).min(f64::from(height)),
    )
}

/// Class-index to label mapping of a seal classifier.
#[derive(Debug, Clone)]
pub struct SealLabels {
    labels: Vec<String>,
}

impl Default for SealLabels {
    fn default() -> Self {
        Self::new(vec!["fake".to_string(), "true".to_string()])
    }
}

impl SealLabels {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn label(&self, class_id: usize) -> &str {
        self.labels
            .get(class_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn classify(&self, class_id: usize, confidence: f64) -> SealClassification {
        classification(self.label(class_id), confidence)
    }
}

fn classification(label: &str, confidence: f64) -> SealClassification {
    SealClassification {
        genuine: GENUINE_LABELS.iter().any(|g| label.eq_ignore_ascii_case(g)),
        label: label.to_string(),
        confidence: confidence.clamp(0.0, 1.0),
    }
}

/// Fold per-seal classifications into one summary. Passes only when at
/// least one seal was seen and none of them is fake. Seals with an unknown
/// label count as fake.
pub fn aggregate(classifications: &[SealClassification]) -> SealSummary {
    let total = classifications.len();
    if total == 0 {
        return SealSummary {
            status: CheckStatus::Fail,
            confidence: 0.0,
            real_count: 0,
            fake_count: 0,
            total: 0,
            reason: "No seals detected".to_string(),
        };
    }
    let real_count = classifications.iter().filter(|c| c.genuine).count();
    let fake_count = total - real_count;
    let confidence = classifications.iter().map(|c| c.confidence).sum::<f64>() / total as f64;
    let (status, reason) = if fake_count == 0 {
        (CheckStatus::Pass, format!("All {total} seal(s) classified as genuine"))
    } else {
        (
            CheckStatus::Fail,
            format!("{fake_count} of {total} seal(s) classified as fake"),
        )
    };
    SealSummary {
        status,
        confidence,
        real_count,
        fake_count,
        total,
        reason,
    }
}

pub fn detection_summary(detections: &[SealDetection], labels: &SealLabels) -> DetectionSummary {
    let mut class_distribution = BTreeMap::new();
    for det in detections {
        let label = det.class_id.map(|id| labels.label(id)).unwrap_or(UNKNOWN_LABEL);
        *class_distribution.entry(label.to_string()).or_insert(0) += 1;
    }
    let total_seals = detections.len();
    let average_confidence = if total_seals == 0 {
        0.0
    } else {
        detections.iter().map(|d| d.confidence).sum::<f64>() / total_seals as f64
    };
    DetectionSummary {
        total_seals,
        class_distribution,
        average_confidence,
        high_confidence_seals: detections
            .iter()
            .filter(|d| d.confidence > HIGH_CONFIDENCE)
            .count(),
    }
}

/// Classify every detection. One without a class index is labelled unknown,
/// which counts as fake.
pub fn classify_detections(detections: &[SealDetection], labels: &SealLabels) -> Vec<SealClassification> {
    detections
        .iter()
        .map(|d| match d.class_id {
            Some(id) => labels.classify(id, d.confidence),
            None => classification(UNKNOWN_LABEL, d.confidence),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64, method: &str) -> SealDetection {
        SealDetection {
            bbox: BBox::new(x1, y1, x2, y2),
            confidence,
            method: method.to_string(),
            class_id: None,
        }
    }

    #[test]
    fn iou_of_identical_disjoint_and_half_overlapping_boxes() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(iou(&a, &a), 1.0);
        assert_eq!(iou(&a, &BBox::new(20.0, 20.0, 30.0, 30.0)), 0.0);
        let half = iou(&a, &BBox::new(5.0, 0.0, 15.0, 10.0));
        assert!((half - 50.0 / 150.0).abs() < 1e-9);
    }

    #[test]
    fn dedupe_keeps_the_more_confident_box() {
        let kept = dedupe(
            vec![
                det(0.0, 0.0, 100.0, 100.0, 0.6, "template"),
                det(5.0, 5.0, 105.0, 105.0, 0.9, "template"),
                det(300.0, 300.0, 400.0, 400.0, 0.5, "template"),
            ],
            0.3,
        );
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].confidence, 0.9);
        assert_eq!(kept[1].confidence, 0.5);
    }

    #[test]
    fn select_best_ranks_by_method_before_confidence() {
        let best = select_best(
            vec![
                det(0.0, 0.0, 50.0, 50.0, 0.99, "template"),
                det(100.0, 0.0, 150.0, 50.0, 0.7, "official_seal"),
                det(200.0, 0.0, 250.0, 50.0, 0.8, "circular_validated"),
            ],
            0.3,
            2,
        );
        let methods: Vec<&str> = best.iter().map(|d| d.method.as_str()).collect();
        assert_eq!(methods, vec!["official_seal", "circular_validated"]);
    }

    #[test]
    fn proposals_fit_inside_the_image() {
        let regions = propose_regions(800, 600);
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].bbox, BBox::new(620.0, 450.0, 740.0, 570.0));
        assert!(regions.iter().all(|r| r.method == FALLBACK_METHOD));

        // too small for any seal circle
        assert!(propose_regions(100, 100).is_empty());
    }

    #[test]
    fn padding_is_clamped() {
        let padded = pad_bbox(&BBox::new(5.0, 5.0, 95.0, 95.0), 10, 100, 100);
        assert_eq!(padded, BBox::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn unknown_class_index_gets_placeholder_label() {
        let labels = SealLabels::default();
        assert_eq!(labels.label(1), "true");
        let c = labels.classify(7, 0.9);
        assert_eq!(c.label, UNKNOWN_LABEL);
        assert!(!c.genuine);
    }

    #[test]
    fn aggregate_fails_on_any_fake_or_no_seals() {
        let labels = SealLabels::default();
        let all_real = aggregate(&[labels.classify(1, 0.9), labels.classify(1, 0.8)]);
        assert_eq!(all_real.status, CheckStatus::Pass);
        assert!((all_real.confidence - 0.85).abs() < 1e-9);

        let mixed = aggregate(&[labels.classify(1, 0.9), labels.classify(0, 0.7)]);
        assert_eq!(mixed.status, CheckStatus::Fail);
        assert_eq!((mixed.real_count, mixed.fake_count), (1, 1));

        let none = aggregate(&[]);
        assert_eq!(none.status, CheckStatus::Fail);
        assert_eq!(none.reason, "No seals detected");
    }

    #[test]
    fn unclassified_detection_counts_as_fake() {
        let labels = SealLabels::default();
        let mut real = det(0.0, 0.0, 10.0, 10.0, 0.9, "DETR");
        real.class_id = Some(1);
        let bare = det(20.0, 0.0, 30.0, 10.0, 0.8, "DETR");
        let classes = classify_detections(&[real, bare], &labels);
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[1].label, UNKNOWN_LABEL);

        let summary = aggregate(&classes);
        assert_eq!(summary.status, CheckStatus::Fail);
        assert_eq!((summary.real_count, summary.fake_count, summary.total), (1, 1, 2));
    }

    #[test]
    fn detection_summary_counts_classes() {
        let labels = SealLabels::default();
        let mut a = det(0.0, 0.0, 10.0, 10.0, 0.9, "DETR");
        a.class_id = Some(1);
        let mut b = det(20.0, 0.0, 30.0, 10.0, 0.5, "DETR");
        b.class_id = Some(0);
        let c = det(40.0, 0.0, 50.0, 10.0, 0.85, "DETR");
        let summary = detection_summary(&[a, b, c], &labels);
        assert_eq!(summary.total_seals, 3);
        assert_eq!(summary.class_distribution["true"], 1);
        assert_eq!(summary.class_distribution["fake"], 1);
        assert_eq!(summary.class_distribution[UNKNOWN_LABEL], 1);
        assert_eq!(summary.high_confidence_seals, 2);
        assert!((summary.average_confidence - 0.75).abs() < 1e-9);
    }
}
