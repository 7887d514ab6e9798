// src/classifier.rs
//! Dual classifier adapter: a uniform `(real, fake)` probability contract
//! over two independently trained, possibly absent oracles.
//!
//! Absence of a model is an expected deployment condition, not a fault —
//! a missing (or failing) oracle scores the neutral 0.5/0.5 prior. The
//! image oracle's label polarity comes from configuration (`labels_flipped`)
//! because retraining can silently swap the positive class.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Square edge of the normalized pixel grid the image oracle consumes.
pub const IMAGE_EDGE: usize = 128;
/// RGB.
pub const IMAGE_CHANNELS: usize = 3;
const TENSOR_LEN: usize = IMAGE_EDGE * IMAGE_EDGE * IMAGE_CHANNELS;

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSection {
    pub labels_flipped: bool,
}

/// Complementary probability pair; `real + fake == 1` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifierScore {
    pub real: f32,
    pub fake: f32,
}

impl ClassifierScore {
    /// The prior substituted when no oracle is available.
    pub fn neutral() -> Self {
        Self {
            real: 0.5,
            fake: 0.5,
        }
    }

    pub fn from_fake_prob(fake: f32) -> Self {
        let fake = fake.clamp(0.0, 1.0);
        Self {
            real: 1.0 - fake,
            fake,
        }
    }

    /// The stronger side's probability; near 0.5 means "no opinion".
    pub fn confidence(&self) -> f32 {
        self.real.max(self.fake)
    }
}

/// Fixed-size normalized pixel grid: 128x128, 3 channels, row-major,
/// values in [0,1].
#[derive(Debug, Clone)]
pub struct ImageTensor {
    data: Vec<f32>,
}

impl ImageTensor {
    /// From already-scaled values. Length must be exactly 128*128*3;
    /// values are clamped into [0,1].
    pub fn from_scaled(mut data: Vec<f32>) -> anyhow::Result<Self> {
        if data.len() != TENSOR_LEN {
            anyhow::bail!(
                "image tensor length {} != expected {} ({}x{}x{})",
                data.len(),
                TENSOR_LEN,
                IMAGE_EDGE,
                IMAGE_EDGE,
                IMAGE_CHANNELS
            );
        }
        for v in &mut data {
            *v = v.clamp(0.0, 1.0);
        }
        Ok(Self { data })
    }

    /// From raw 8-bit RGB pixels, scaled by 1/255.
    pub fn from_rgb8(pixels: &[u8]) -> anyhow::Result<Self> {
        if pixels.len() != TENSOR_LEN {
            anyhow::bail!(
                "pixel buffer length {} != expected {}",
                pixels.len(),
                TENSOR_LEN
            );
        }
        Ok(Self {
            data: pixels.iter().map(|&b| f32::from(b) / 255.0).collect(),
        })
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// Sparse bag-of-words term frequencies over normalized text, the input
/// contract of the text oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFeatures {
    terms: Vec<(String, f32)>,
}

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?u)\b\w+\b").expect("word regex"));

impl TextFeatures {
    /// Lower-cased word tokens, counted, L1-normalized. Empty text yields
    /// empty features.
    pub fn from_text(text: &str) -> Self {
        let mut counts: std::collections::BTreeMap<String, usize> = Default::default();
        for m in WORD_RE.find_iter(text) {
            *counts.entry(m.as_str().to_lowercase()).or_insert(0) += 1;
        }
        let total: usize = counts.values().sum();
        let terms = counts
            .into_iter()
            .map(|(t, c)| (t, c as f32 / total.max(1) as f32))
            .collect();
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[(String, f32)] {
        &self.terms
    }
}

/// Opaque image classifier. Returns the probability of its positive class
/// for a normalized pixel grid; polarity is resolved by the adapter.
pub trait ImageOracle: Send + Sync {
    fn predict(&self, tensor: &ImageTensor) -> anyhow::Result<f32>;
}

/// Opaque text classifier. Returns the probability of the "fake" class
/// directly.
pub trait TextOracle: Send + Sync {
    fn predict_fake(&self, features: &TextFeatures) -> anyhow::Result<f32>;
}

#[derive(Clone)]
pub struct ClassifierAdapter {
    image: Option<Arc<dyn ImageOracle>>,
    text: Option<Arc<dyn TextOracle>>,
    labels_flipped: bool,
}

impl ClassifierAdapter {
    pub fn new(
        image: Option<Arc<dyn ImageOracle>>,
        text: Option<Arc<dyn TextOracle>>,
        labels_flipped: bool,
    ) -> Self {
        Self {
            image,
            text,
            labels_flipped,
        }
    }

    /// Adapter with both oracles absent; every score is the neutral prior.
    pub fn unloaded(labels_flipped: bool) -> Self {
        Self::new(None, None, labels_flipped)
    }

    pub fn has_image_oracle(&self) -> bool {
        self.image.is_some()
    }

    pub fn has_text_oracle(&self) -> bool {
        self.text.is_some()
    }

    /// Score the screenshot pixels. `None` tensor, absent oracle, or a
    /// failing oracle all yield the neutral prior.
    pub fn score_image(&self, tensor: Option<&ImageTensor>) -> ClassifierScore {
        let (oracle, tensor) = match (&self.image, tensor) {
            (Some(o), Some(t)) => (o, t),
            _ => return ClassifierScore::neutral(),
        };
        match oracle.predict(tensor) {
            Ok(p) => {
                let p = p.clamp(0.0, 1.0);
                if self.labels_flipped {
                    ClassifierScore::from_fake_prob(p)
                } else {
                    ClassifierScore::from_fake_prob(1.0 - p)
                }
            }
            Err(e) => {
                warn!(error = %e, "image oracle failed; falling back to neutral prior");
                ClassifierScore::neutral()
            }
        }
    }

    /// Score the normalized text. Empty text never consults the oracle.
    pub fn score_text(&self, text: &str) -> ClassifierScore {
        let features = TextFeatures::from_text(text);
        if features.is_empty() {
            return ClassifierScore::neutral();
        }
        let oracle = match &self.text {
            Some(o) => o,
            None => return ClassifierScore::neutral(),
        };
        match oracle.predict_fake(&features) {
            Ok(p) => ClassifierScore::from_fake_prob(p),
            Err(e) => {
                warn!(error = %e, "text oracle failed; falling back to neutral prior");
                ClassifierScore::neutral()
            }
        }
    }
}
