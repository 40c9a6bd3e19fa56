use serde::{Deserialize, Serialize};

/// One recognised word and its position on the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub text: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Output of an OCR engine run over one certificate image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OcrResult {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub extracted_text: String,
    /// Engines that report no confidence are trusted fully.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub bounding_boxes: Vec<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

fn default_confidence() -> f64 {
    1.0
}

impl OcrResult {
    pub fn from_text(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            success: true,
            extracted_text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
            bounding_boxes: Vec::new(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            extracted_text: String::new(),
            confidence: 0.0,
            bounding_boxes: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_to_a_successful_result() {
        let ocr: OcrResult =
            serde_json::from_str(r#"{"extracted_text":"USN: 1BG19CS100"}"#).unwrap();
        assert!(ocr.success);
        assert_eq!(ocr.confidence, 1.0);
        assert!(ocr.bounding_boxes.is_empty());
        assert!(ocr.error.is_none());
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(OcrResult::from_text("x", 1.7).confidence, 1.0);
    }
}
