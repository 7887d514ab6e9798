// src/config.rs
//! Scanner configuration: keyword lists, institution links, classifier
//! polarity, and fusion numbers, loaded once at startup from TOML.
//!
//! Resolution order: `SCANNER_CONFIG_PATH` env var, then
//! `config/scanner.toml`, then the copy embedded at compile time.
//! `SCANNER_FUZZY_THRESHOLD` overrides the scope threshold (clamped).

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::info;

use crate::classifier::ClassifierSection;
use crate::fusion::FusionConfig;
use crate::lexicon::LexiconSection;
use crate::scope::ScopeSection;

pub const DEFAULT_CONFIG_PATH: &str = "config/scanner.toml";
pub const ENV_CONFIG_PATH: &str = "SCANNER_CONFIG_PATH";
pub const ENV_FUZZY_THRESHOLD: &str = "SCANNER_FUZZY_THRESHOLD";

const EMBEDDED_CONFIG: &str = include_str!("../config/scanner.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    pub scope: ScopeSection,
    pub lexicon: LexiconSection,
    #[serde(default)]
    pub institutions: BTreeMap<String, String>,
    pub classifier: ClassifierSection,
    #[serde(default)]
    pub fusion: FusionConfig,
}

impl ScannerConfig {
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: ScannerConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The compiled-in `config/scanner.toml`; also the fallback when no
    /// file is present at runtime.
    pub fn embedded_default() -> Self {
        Self::from_toml_str(EMBEDDED_CONFIG).expect("embedded scanner config is valid")
    }

    /// Load using env overrides; falls back to the embedded copy when the
    /// file is missing (a bad file is still an error).
    pub fn from_env() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut cfg = match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content).map_err(|e| {
                anyhow::anyhow!("invalid scanner config at {}: {}", path.display(), e)
            })?,
            Err(_) => {
                info!(path = %path.display(), "scanner config not found, using embedded default");
                Self::embedded_default()
            }
        };

        if let Some(t) = parse_threshold_env(std::env::var(ENV_FUZZY_THRESHOLD).ok()) {
            cfg.scope.fuzzy_threshold = t;
        }

        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.scope.keywords.is_empty() {
            anyhow::bail!("scope.keywords must not be empty");
        }
        if !self.scope.fuzzy_threshold.is_finite() {
            anyhow::bail!("scope.fuzzy_threshold must be finite");
        }
        Ok(())
    }
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_threshold_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .map(|v| v.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::FusionPolicy;

    #[test]
    fn embedded_config_parses_and_validates() {
        let cfg = ScannerConfig::embedded_default();
        assert!(cfg.scope.keywords.iter().any(|k| k == "deped"));
        assert!(!cfg.lexicon.malicious.is_empty());
        assert!(cfg.institutions.contains_key("ched"));
        assert!(cfg.classifier.labels_flipped);
        assert_eq!(
            cfg.fusion.policy,
            FusionPolicy::FixedWeight {
                w_text: 0.7,
                w_image: 0.3
            }
        );
    }

    #[test]
    fn empty_keyword_list_is_rejected() {
        let bad = r#"
[scope]
keywords = []

[lexicon]
suspicious = []
informal = []
malicious = []

[classifier]
labels_flipped = true
"#;
        assert!(ScannerConfig::from_toml_str(bad).is_err());
    }

    #[test]
    fn fusion_section_defaults_when_omitted() {
        let minimal = r#"
[scope]
keywords = ["deped"]

[lexicon]
suspicious = []
informal = []
malicious = []

[classifier]
labels_flipped = false
"#;
        let cfg = ScannerConfig::from_toml_str(minimal).unwrap();
        assert!((cfg.fusion.penalty_single - 30.0).abs() < f32::EPSILON);
        assert!((cfg.fusion.penalty_multiple - 40.0).abs() < f32::EPSILON);
        assert!((cfg.scope.fuzzy_threshold - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn threshold_env_parse_clamps() {
        assert_eq!(parse_threshold_env(Some("0.75".into())), Some(0.75));
        assert_eq!(parse_threshold_env(Some("7.5".into())), Some(1.0));
        assert_eq!(parse_threshold_env(Some("nonsense".into())), None);
        assert_eq!(parse_threshold_env(None), None);
    }
}
