use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "CERTVERIFY_";

/// Process-wide configuration, resolved once on first access.
pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::load().expect("FATAL: invalid certificate verifier configuration"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub scoring: ScoringConfig,
    pub seals: SealConfig,
    pub roster: RosterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Key clients must present on every route except `/health`.
    pub api_key: String,
    /// When unset, `/verify` falls back to demo OCR samples.
    pub ocr_api_key: Option<String>,
    /// Roster CSV imported on startup.
    pub seed_csv: Option<PathBuf>,
    pub body_limit: usize,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:certs.db".to_string(),
            loglevel: "info".to_string(),
            api_key: String::new(),
            ocr_api_key: None,
            seed_csv: None,
            body_limit: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldWeights {
    pub name: f64,
    pub institution: f64,
    pub degree: f64,
    pub year: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 0.40,
            institution: 0.25,
            degree: 0.20,
            year: 0.15,
        }
    }
}

impl FieldWeights {
    /// Weights rescaled to sum to one. Falls back to the defaults when
    /// every weight is zero or negative.
    pub fn normalized(&self) -> Self {
        let parts = [self.name, self.institution, self.degree, self.year].map(|w| w.max(0.0));
        let total: f64 = parts.iter().sum();
        if total <= f64::EPSILON {
            return Self::default();
        }
        Self {
            name: parts[0] / total,
            institution: parts[1] / total,
            degree: parts[2] / total,
            year: parts[3] / total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: FieldWeights,
    pub authentic_threshold: f64,
    pub suspect_threshold: f64,
    /// OCR confidence below which the weighted score is scaled down.
    pub confidence_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            authentic_threshold: 0.85,
            suspect_threshold: 0.40,
            confidence_floor: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SealConfig {
    /// Fake seals above this confidence reject the certificate outright.
    pub fake_confidence: f64,
    /// Minimum verification score to pass without seal evidence.
    pub ocr_only_score: f64,
    pub overlap_threshold: f64,
    pub max_seals: usize,
    pub padding: u32,
    pub labels: Vec<String>,
}

impl Default for SealConfig {
    fn default() -> Self {
        Self {
            fake_confidence: 0.7,
            ocr_only_score: 0.8,
            overlap_threshold: 0.3,
            max_seals: 2,
            padding: 10,
            labels: vec!["fake".to_string(), "true".to_string()],
        }
    }
}

/// Values filled in for roster rows that only carry a serial number and names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub institution: String,
    pub degree: String,
    pub graduation_year: i64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            institution: "B.N.M. INSTITUTE OF TECHNOLOGY, BANGALORE".to_string(),
            degree: "B.E. Computer Science & Engineering".to_string(),
            graduation_year: 2023,
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `CERTVERIFY_*` variables
    /// (`__` separates sections, e.g. `CERTVERIFY_BASIC__API_KEY`).
    /// `OCRSPACE_API_KEY` is honoured as the OCR key.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(
                Env::raw()
                    .only(&["OCRSPACE_API_KEY"])
                    .map(|_| "basic.ocr_api_key".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn demo_fallback(&self) -> bool {
        self.basic
            .ocr_api_key
            .as_deref()
            .is_none_or(|k| k.trim().is_empty())
    }
}
