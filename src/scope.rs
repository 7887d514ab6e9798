// src/scope.rs
//! Scope gate: decides whether normalized text is about Philippine
//! education at all, before any classifier resources are spent on it.
//!
//! Exact substring containment over the configured keyword list wins
//! first (in list order); otherwise each whitespace token is compared to
//! each keyword with `strsim::normalized_levenshtein` against a fixed
//! threshold. Pure classification, no side effects; on a miss the whole
//! pipeline short-circuits with an out-of-scope result.

use serde::Deserialize;
use strsim::normalized_levenshtein;

/// Default minimum similarity ratio for a fuzzy keyword hit.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Deserialize)]
pub struct ScopeSection {
    #[serde(default = "default_threshold")]
    pub fuzzy_threshold: f64,
    pub keywords: Vec<String>,
}

fn default_threshold() -> f64 {
    DEFAULT_FUZZY_THRESHOLD
}

/// Result of a scope check. `matched` carries the winning keyword (or a
/// `fuzzy match: <keyword>` marker) for diagnostics, even on fuzzy hits.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeCheck {
    pub in_scope: bool,
    pub matched: Option<String>,
}

impl ScopeCheck {
    fn out() -> Self {
        Self {
            in_scope: false,
            matched: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScopeGate {
    keywords: Vec<String>,
    fuzzy_threshold: f64,
}

impl ScopeGate {
    /// Keywords are lower-cased once here; the threshold is clamped to [0,1].
    pub fn new(section: &ScopeSection) -> Self {
        Self {
            keywords: section
                .keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            fuzzy_threshold: section.fuzzy_threshold.clamp(0.0, 1.0),
        }
    }

    pub fn check(&self, text: &str) -> ScopeCheck {
        if text.trim().is_empty() {
            return ScopeCheck::out();
        }
        let lower = text.to_lowercase();

        // 1) Exact containment, first keyword in list order wins.
        for kw in &self.keywords {
            if lower.contains(kw.as_str()) {
                return ScopeCheck {
                    in_scope: true,
                    matched: Some(kw.clone()),
                };
            }
        }

        // 2) Fuzzy pass over whitespace tokens (catches OCR misreads like
        //    "depfd" or "tvition").
        for kw in &self.keywords {
            for tok in lower.split_whitespace() {
                if normalized_levenshtein(kw, tok) >= self.fuzzy_threshold {
                    return ScopeCheck {
                        in_scope: true,
                        matched: Some(format!("fuzzy match: {kw}")),
                    };
                }
            }
        }

        ScopeCheck::out()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> ScopeGate {
        ScopeGate::new(&ScopeSection {
            fuzzy_threshold: 0.8,
            keywords: vec![
                "deped".into(),
                "class suspension".into(),
                "tuition".into(),
                "scholarship".into(),
            ],
        })
    }

    #[test]
    fn exact_substring_hit_first_in_list_order() {
        let g = gate();
        let r = g.check("DepEd announces class suspension due to typhoon");
        assert!(r.in_scope);
        // "deped" precedes "class suspension" in the configured list.
        assert_eq!(r.matched.as_deref(), Some("deped"));
    }

    #[test]
    fn substring_matches_inside_larger_word() {
        let g = gate();
        let r = g.check("the depedsecretary spoke today");
        assert!(r.in_scope);
        assert_eq!(r.matched.as_deref(), Some("deped"));
    }

    #[test]
    fn fuzzy_hit_on_ocr_misread() {
        let g = gate();
        // "tvition" vs "tuition": 6 of 7 chars align, ratio ~0.857.
        let r = g.check("tvition fee increase announced");
        assert!(r.in_scope, "expected fuzzy pass, got {:?}", r);
        assert_eq!(r.matched.as_deref(), Some("fuzzy match: tuition"));
    }

    #[test]
    fn unrelated_text_is_out_of_scope() {
        let g = gate();
        let r = g.check("bitcoin price surges past 100k overnight");
        assert!(!r.in_scope);
        assert!(r.matched.is_none());
    }

    #[test]
    fn empty_text_is_out_of_scope() {
        let g = gate();
        assert!(!g.check("").in_scope);
        assert!(!g.check("   ").in_scope);
    }

    #[test]
    fn threshold_is_clamped() {
        let g = ScopeGate::new(&ScopeSection {
            fuzzy_threshold: 7.5,
            keywords: vec!["deped".into()],
        });
        // Clamped to 1.0: only an identical token can pass the fuzzy path.
        assert!(g.check("deped").in_scope);
        assert!(!g.check("depfd").in_scope);
    }
}
