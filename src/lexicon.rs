// src/lexicon.rs
//! Lexical analytics over the three configured word lists.
//!
//! Matching is substring containment against the lower-cased text, not
//! tokenized, so a configured word can match inside a larger word
//! ("scammer" counts for "scam"). Counts are the number of configured
//! words present, not occurrence counts. Pure and deterministic.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconSection {
    pub suspicious: Vec<String>,
    pub informal: Vec<String>,
    pub malicious: Vec<String>,
}

/// Per-category lists of matched terms, for explanations and debugging.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectedWords {
    pub suspicious: Vec<String>,
    pub informal: Vec<String>,
    pub malicious: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analytics {
    pub suspicious_count: usize,
    pub informal_count: usize,
    pub malicious_count: usize,
    /// `|suspicious_count - informal_count|`: sensational framing without
    /// a matching casual register (or vice versa) reads as inconsistent.
    pub inconsistency_score: usize,
    pub detected: DetectedWords,
}

impl Analytics {
    pub fn total_flagged(&self) -> usize {
        self.suspicious_count + self.informal_count + self.malicious_count
    }
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    suspicious: Vec<String>,
    informal: Vec<String>,
    malicious: Vec<String>,
}

impl Lexicon {
    pub fn new(section: &LexiconSection) -> Self {
        let lower = |v: &[String]| v.iter().map(|w| w.to_lowercase()).collect();
        Self {
            suspicious: lower(&section.suspicious),
            informal: lower(&section.informal),
            malicious: lower(&section.malicious),
        }
    }

    pub fn analyze(&self, text: &str) -> Analytics {
        let lower = text.to_lowercase();
        let hits = |words: &[String]| -> Vec<String> {
            words
                .iter()
                .filter(|w| lower.contains(w.as_str()))
                .cloned()
                .collect()
        };

        let detected = DetectedWords {
            suspicious: hits(&self.suspicious),
            informal: hits(&self.informal),
            malicious: hits(&self.malicious),
        };

        let suspicious_count = detected.suspicious.len();
        let informal_count = detected.informal.len();
        let malicious_count = detected.malicious.len();

        Analytics {
            suspicious_count,
            informal_count,
            malicious_count,
            inconsistency_score: suspicious_count.abs_diff(informal_count),
            detected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex() -> Lexicon {
        Lexicon::new(&LexiconSection {
            suspicious: vec!["shocking".into(), "leaked".into(), "viral".into()],
            informal: vec!["grabe".into(), "hahaha".into(), "sino may alam".into()],
            malicious: vec!["scam".into(), "hoax".into()],
        })
    }

    #[test]
    fn counts_and_detected_terms() {
        let a = lex().analyze("Grabe sino may alam nito hahaha scam");
        assert_eq!(a.suspicious_count, 0);
        assert_eq!(a.informal_count, 3);
        assert_eq!(a.malicious_count, 1);
        assert_eq!(a.inconsistency_score, 3);
        assert_eq!(a.detected.informal, vec!["grabe", "hahaha", "sino may alam"]);
        assert_eq!(a.detected.malicious, vec!["scam"]);
    }

    #[test]
    fn substring_matches_inside_larger_word() {
        let a = lex().analyze("beware of scammers");
        assert_eq!(a.malicious_count, 1);
    }

    #[test]
    fn each_configured_word_counted_once() {
        let a = lex().analyze("scam scam scam");
        assert_eq!(a.malicious_count, 1);
    }

    #[test]
    fn clean_text_yields_zero_analytics() {
        let a = lex().analyze("DepEd announces class suspension due to typhoon");
        assert_eq!(a.total_flagged(), 0);
        assert_eq!(a.inconsistency_score, 0);
        assert_eq!(a, Analytics::default());
    }

    #[test]
    fn inconsistency_is_absolute_difference() {
        let a = lex().analyze("shocking leaked viral grabe");
        assert_eq!(a.suspicious_count, 3);
        assert_eq!(a.informal_count, 1);
        assert_eq!(a.inconsistency_score, 2);
    }
}
