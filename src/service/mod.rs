pub mod demo;
pub mod extractor;
pub mod matcher;
pub mod report;
pub mod seals;
pub mod verdict;
pub mod verifier;

pub use verifier::Verifier;
