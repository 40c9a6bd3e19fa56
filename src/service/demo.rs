use crate::types::OcrResult;

struct DemoSample {
    keys: &'static [&'static str],
    text: &'static str,
    confidence: f64,
}

const SAKSHAM: DemoSample = DemoSample {
    keys: &["saksham", "abc2023001"],
    text: "CERTIFICATE OF COMPLETION

This is to certify that

SAKSHAM SHARMA

has successfully completed the course

B.Tech Computer Engineering

from

DevLabs Institute

in the year 2023

Registration Number: ABC2023001

Date of Issue: December 2023",
    confidence: 0.92,
};

const PRISHA: DemoSample = DemoSample {
    keys: &["prisha", "abc2022007"],
    text: "GRADUATION CERTIFICATE

This certifies that

PRISHA VERMA

has completed

M.Tech AI

from

Global Tech University

Year: 2022

Registration: ABC2022007",
    confidence: 0.88,
};

const RAJEEV: DemoSample = DemoSample {
    keys: &["rajeev", "uni10009"],
    text: "CERTIFICATE OF COMPLETION

This is to certify that

RAJEEV KUMAR

has successfully completed the program

B.Sc Physics

from Northfield University

in the year 2019

Registration Number: UNI10009",
    confidence: 0.85,
};

const SAMPLES: [DemoSample; 3] = [SAKSHAM, PRISHA, RAJEEV];

/// Canned OCR output chosen by file name, for running the pipeline without an OCR engine.
/// Unrecognised names get the first sample.
pub fn demo_ocr(filename: Option<&str>) -> OcrResult {
    let lowered = filename.unwrap_or_default().to_lowercase();
    let sample = SAMPLES
        .iter()
        .find(|s| s.keys.iter().any(|k| lowered.contains(k)))
        .unwrap_or(&SAMPLES[0]);
    OcrResult::from_text(sample.text, sample.confidence)
}
