// src/fusion.rs
//! Fusion & verdict engine: combines both classifier scores with lexical
//! penalties and credibility bonuses into one clamped 0..100 verdict.
//!
//! The combination step is a named, config-selected `FusionPolicy` rather
//! than an inline constant, so deployments can switch behavior without a
//! parallel code path. Adjustments run in a fixed order: policy combine,
//! lexical penalty, credibility, then the final per-side clamp to [0,100].
//! This module never errors; every branch has a numeric fallback.

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierScore;
use crate::institutions::Suggestion;
use crate::lexicon::Analytics;

/// How the two classifier probabilities are merged before adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FusionPolicy {
    /// A side whose max probability is below `min_confidence` is treated
    /// as having no opinion; if only one side has an opinion, trust it
    /// alone, otherwise average.
    ConfidenceGated { min_confidence: f32 },
    /// Weighted average with explicit weights.
    FixedWeight { w_text: f32, w_image: f32 },
    /// Plain average; all nuance comes from the additive adjustments.
    AveragePenalty,
}

impl Default for FusionPolicy {
    fn default() -> Self {
        // The weights the deployed models were tuned against.
        FusionPolicy::FixedWeight {
            w_text: 0.7,
            w_image: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FusionConfig {
    #[serde(default)]
    pub policy: FusionPolicy,
    /// Penalty (0..100 points) when exactly one lexicon word is flagged.
    #[serde(default = "default_penalty_single")]
    pub penalty_single: f32,
    /// Penalty when two or more lexicon words are flagged.
    #[serde(default = "default_penalty_multiple")]
    pub penalty_multiple: f32,
    /// Added to the real side when a known institution is referenced.
    #[serde(default = "default_credibility_bonus")]
    pub credibility_bonus: f32,
    /// Shifted from real to fake when no institution is referenced.
    #[serde(default = "default_credibility_penalty")]
    pub credibility_penalty: f32,
}

fn default_penalty_single() -> f32 {
    30.0
}
fn default_penalty_multiple() -> f32 {
    40.0
}
fn default_credibility_bonus() -> f32 {
    20.0
}
fn default_credibility_penalty() -> f32 {
    10.0
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            policy: FusionPolicy::default(),
            penalty_single: default_penalty_single(),
            penalty_multiple: default_penalty_multiple(),
            credibility_bonus: default_credibility_bonus(),
            credibility_penalty: default_credibility_penalty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Real,
    Fake,
}

/// Final categorical verdict with bounded scores and ordered reasons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub real_score: f32,
    pub fake_score: f32,
    pub label: Label,
    pub confidence: f32,
    pub reasons: Vec<String>,
}

/// Merge the two probability pairs on the 0..100 scale per policy.
fn combine(policy: FusionPolicy, text: ClassifierScore, image: ClassifierScore) -> (f32, f32) {
    let (real, fake) = match policy {
        FusionPolicy::ConfidenceGated { min_confidence } => {
            let gate = min_confidence.clamp(0.0, 1.0);
            let text_weak = text.confidence() < gate;
            let image_weak = image.confidence() < gate;
            match (text_weak, image_weak) {
                (false, true) => (text.real, text.fake),
                (true, false) => (image.real, image.fake),
                _ => ((text.real + image.real) / 2.0, (text.fake + image.fake) / 2.0),
            }
        }
        FusionPolicy::FixedWeight { w_text, w_image } => (
            w_text * text.real + w_image * image.real,
            w_text * text.fake + w_image * image.fake,
        ),
        FusionPolicy::AveragePenalty => (
            (text.real + image.real) / 2.0,
            (text.fake + image.fake) / 2.0,
        ),
    };
    (real * 100.0, fake * 100.0)
}

/// Turn classifier scores, analytics, and suggestions into a `Verdict`.
pub fn fuse(
    cfg: &FusionConfig,
    text: ClassifierScore,
    image: ClassifierScore,
    analytics: &Analytics,
    suggestions: &[Suggestion],
) -> Verdict {
    let (mut real, mut fake) = combine(cfg.policy, text, image);
    let mut reasons = Vec::new();

    // 1) Lexical penalty, tiered on the total flagged-word count.
    let flagged = analytics.total_flagged();
    if flagged > 0 {
        let penalty = if flagged == 1 {
            cfg.penalty_single
        } else {
            cfg.penalty_multiple
        };
        real -= penalty;
        fake += penalty;
        reasons.push(format!(
            "Flagged wording: {} suspicious, {} informal, {} malicious term(s) (-{:.0} real)",
            analytics.suspicious_count,
            analytics.informal_count,
            analytics.malicious_count,
            penalty
        ));
        if analytics.inconsistency_score > 0 {
            reasons.push(format!(
                "Tone inconsistency score {}",
                analytics.inconsistency_score
            ));
        }
    }

    // 2) Credibility bonus or penalty.
    if suggestions.is_empty() {
        real -= cfg.credibility_penalty;
        fake += cfg.credibility_penalty;
        reasons.push(format!(
            "No known institution referenced (-{:.0} real)",
            cfg.credibility_penalty
        ));
    } else {
        real += cfg.credibility_bonus;
        let names: Vec<&str> = suggestions.iter().map(|s| s.institution.as_str()).collect();
        reasons.push(format!(
            "References known institution(s): {} (+{:.0} real)",
            names.join(", "),
            cfg.credibility_bonus
        ));
    }

    // 3) Final safety bound, per side, after all additive adjustments.
    let real_score = real.clamp(0.0, 100.0);
    let fake_score = fake.clamp(0.0, 100.0);

    // Ties go to Real: fake must be strictly greater to win.
    let label = if fake_score > real_score {
        Label::Fake
    } else {
        Label::Real
    };

    if reasons.is_empty() {
        reasons.push("No strong indicators either way".to_string());
    }

    Verdict {
        real_score,
        fake_score,
        label,
        confidence: real_score.max(fake_score),
        reasons,
    }
}
