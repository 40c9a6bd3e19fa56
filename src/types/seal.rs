use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Axis-aligned box in pixel coordinates: `(x1, y1)` top-left, `(x2, y2)` bottom-right.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// A seal region reported by a detector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SealDetection {
    pub bbox: BBox,
    pub confidence: f64,
    #[serde(default)]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SealClassification {
    pub label: String,
    pub genuine: bool,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pass => f.write_str("Pass"),
            CheckStatus::Fail => f.write_str("Fail"),
        }
    }
}

/// Aggregate over every classified seal on one certificate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SealSummary {
    pub status: CheckStatus,
    pub confidence: f64,
    pub real_count: usize,
    pub fake_count: usize,
    pub total: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionSummary {
    pub total_seals: usize,
    pub class_distribution: BTreeMap<String, usize>,
    pub average_confidence: f64,
    pub high_confidence_seals: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Real,
    Fake,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombinedVerdict {
    pub verdict: Verdict,
    pub ocr_status: CheckStatus,
    pub seal_status: Option<CheckStatus>,
    pub reason: String,
}
