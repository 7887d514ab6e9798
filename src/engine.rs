//! # Evaluation pipeline
//! Pure logic mapping `(recognized words, optional image tensor)` to either
//! an out-of-scope result or a full verdict report. No I/O; suitable for
//! unit tests and offline evaluation.
//!
//! The `ScannerContext` replaces the globals the service grew out of: one
//! immutable bundle of gate, lexicon, institution index, classifier
//! adapter, and fusion config, built at startup and shared by reference.
//! Calling `evaluate` twice with identical inputs yields identical output.

use serde::Serialize;
use tracing::debug;

use crate::classifier::{ClassifierAdapter, ClassifierScore, ImageTensor};
use crate::config::ScannerConfig;
use crate::fusion::{self, FusionConfig, Verdict};
use crate::institutions::{InstitutionIndex, Suggestion};
use crate::lexicon::{Analytics, Lexicon};
use crate::normalize::{join_words, normalize};
use crate::ocr::RecognizedWord;
use crate::scope::ScopeGate;

/// Immutable per-process configuration and model handles.
#[derive(Clone)]
pub struct ScannerContext {
    pub scope: ScopeGate,
    pub lexicon: Lexicon,
    pub institutions: InstitutionIndex,
    pub classifiers: ClassifierAdapter,
    pub fusion: FusionConfig,
}

impl ScannerContext {
    pub fn new(cfg: &ScannerConfig, classifiers: ClassifierAdapter) -> Self {
        Self {
            scope: ScopeGate::new(&cfg.scope),
            lexicon: Lexicon::new(&cfg.lexicon),
            institutions: InstitutionIndex::new(&cfg.institutions),
            classifiers,
            fusion: cfg.fusion.clone(),
        }
    }
}

/// Terminal outcome when the scope gate rejects the text. Not an error:
/// the caller renders it as a regular response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutOfScopeReport {
    pub reason: String,
    pub matched_keyword: Option<String>,
    pub extracted_text: String,
}

/// Full verdict payload: everything the caller needs for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictReport {
    pub extracted_text: String,
    pub words: Vec<RecognizedWord>,
    pub matched_keyword: String,
    pub text_score: ClassifierScore,
    pub image_score: ClassifierScore,
    pub analytics: Analytics,
    pub suggestions: Vec<Suggestion>,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Evaluation {
    Verdict(VerdictReport),
    OutOfScope(OutOfScopeReport),
}

/// Run the whole pipeline: normalize, gate, analyze, score, fuse.
///
/// Empty OCR output normalizes to an empty string and falls out at the
/// gate; classifier absence surfaces only as near-neutral scores. The
/// classifiers are never consulted for out-of-scope text.
pub fn evaluate(
    ctx: &ScannerContext,
    words: &[RecognizedWord],
    image: Option<&ImageTensor>,
) -> Evaluation {
    let raw = join_words(words.iter().map(|w| w.text.as_str()));
    let text = normalize(&raw);

    let check = ctx.scope.check(&text);
    if !check.in_scope {
        debug!(
            id = %anon_hash(&text),
            "out of scope, skipping classifiers"
        );
        return Evaluation::OutOfScope(OutOfScopeReport {
            reason: if text.is_empty() {
                "no text detected".to_string()
            } else {
                "content is not education-related".to_string()
            },
            matched_keyword: check.matched,
            extracted_text: text,
        });
    }
    let matched_keyword = check.matched.unwrap_or_default();

    // Independent signals; order does not affect the result.
    let analytics = ctx.lexicon.analyze(&text);
    let suggestions = ctx.institutions.suggest(&text);
    let text_score = ctx.classifiers.score_text(&text);
    let image_score = ctx.classifiers.score_image(image);

    let verdict = fusion::fuse(&ctx.fusion, text_score, image_score, &analytics, &suggestions);

    debug!(
        id = %anon_hash(&text),
        label = ?verdict.label,
        real = verdict.real_score,
        fake = verdict.fake_score,
        flagged = analytics.total_flagged(),
        "verdict"
    );

    Evaluation::Verdict(VerdictReport {
        extracted_text: text,
        words: words.to_vec(),
        matched_keyword,
        text_score,
        image_score,
        analytics,
        suggestions,
        verdict,
    })
}

/// Short content hash for logs; raw text never hits the log stream.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierAdapter;
    use crate::config::ScannerConfig;

    fn ctx() -> ScannerContext {
        let cfg = ScannerConfig::embedded_default();
        ScannerContext::new(&cfg, ClassifierAdapter::unloaded(cfg.classifier.labels_flipped))
    }

    fn words(text: &str) -> Vec<RecognizedWord> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, w)| RecognizedWord::new(w, (i as i32) * 40, 0, 38, 14, 0.9))
            .collect()
    }

    #[test]
    fn empty_input_is_out_of_scope_not_an_error() {
        match evaluate(&ctx(), &[], None) {
            Evaluation::OutOfScope(r) => {
                assert_eq!(r.reason, "no text detected");
                assert_eq!(r.extracted_text, "");
                assert!(r.matched_keyword.is_none());
            }
            other => panic!("expected out-of-scope, got {:?}", other),
        }
    }

    #[test]
    fn out_of_scope_text_short_circuits() {
        match evaluate(&ctx(), &words("bitcoin hits new all time high"), None) {
            Evaluation::OutOfScope(r) => {
                assert_eq!(r.reason, "content is not education-related");
            }
            other => panic!("expected out-of-scope, got {:?}", other),
        }
    }

    #[test]
    fn verdict_report_carries_text_and_boxes() {
        let ws = words("DepEd announces class suspension due to typhoon");
        match evaluate(&ctx(), &ws, None) {
            Evaluation::Verdict(r) => {
                assert_eq!(
                    r.extracted_text,
                    "DepEd announces class suspension due to typhoon"
                );
                assert_eq!(r.words, ws);
                assert_eq!(r.matched_keyword, "deped");
            }
            other => panic!("expected verdict, got {:?}", other),
        }
    }

    #[test]
    fn evaluate_is_idempotent() {
        let ws = words("CHED scholarship application now open");
        let a = evaluate(&ctx(), &ws, None);
        let b = evaluate(&ctx(), &ws, None);
        assert_eq!(a, b);
    }
}
