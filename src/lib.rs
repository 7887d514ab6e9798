// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod fusion;
pub mod history;
pub mod institutions;
pub mod lexicon;
pub mod normalize;
pub mod ocr;
pub mod scope;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::engine::{evaluate, Evaluation, ScannerContext};
pub use crate::fusion::{Label, Verdict};
