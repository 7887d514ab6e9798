//! OCR provider seam.
//!
//! Text recognition itself lives outside this crate (Tesseract, a cloud
//! OCR, a test stub). The pipeline only consumes the recognized word list;
//! the route layer uses `OcrProvider` when it receives raw image bytes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One recognized word with its bounding box and recognition confidence.
/// Order within a request is the reading order returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedWord {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f32,
}

impl RecognizedWord {
    pub fn new(text: impl Into<String>, x: i32, y: i32, width: i32, height: i32, confidence: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
            confidence,
        }
    }
}

/// External OCR collaborator. Implementations may block on I/O or model
/// inference; the decision core never calls this directly.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn recognize(&self, image_bytes: &[u8]) -> anyhow::Result<Vec<RecognizedWord>>;
}
