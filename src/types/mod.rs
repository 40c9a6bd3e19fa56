pub mod ocr;
pub mod seal;
pub mod verification;

pub use ocr::{BoundingBox, OcrResult};
pub use seal::{
    BBox, CheckStatus, CombinedVerdict, DetectionSummary, SealClassification, SealDetection,
    SealSummary, Verdict,
};
pub use verification::{Decision, ExtractedFields, FieldScores, VerificationResult};
