use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::classifier::ImageTensor;
use crate::engine::{evaluate, Evaluation, ScannerContext};
use crate::history::{History, HistoryEntry};
use crate::ocr::{OcrProvider, RecognizedWord};

#[derive(Clone)]
pub struct AppState {
    ctx: Arc<ScannerContext>,
    ocr: Option<Arc<dyn OcrProvider>>,
    history: Arc<History>,
}

impl AppState {
    pub fn new(ctx: ScannerContext, ocr: Option<Arc<dyn OcrProvider>>) -> Self {
        Self {
            ctx: Arc::new(ctx),
            ocr,
            history: Arc::new(History::with_capacity(2000)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/scan", post(scan))
        .route("/predict/text", post(predict_text))
        .route("/predict/image", post(predict_image))
        .route("/debug/history", get(debug_history))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct ScanReq {
    words: Vec<RecognizedWord>,
    /// Optional pre-scaled 128x128x3 pixel buffer for the image classifier.
    #[serde(default)]
    pixels: Option<Vec<f32>>,
}

/// Full pipeline over OCR words already produced by a collaborator.
async fn scan(
    State(state): State<AppState>,
    Json(body): Json<ScanReq>,
) -> Result<Json<Evaluation>, (StatusCode, String)> {
    let tensor = match body.pixels {
        Some(p) => Some(
            ImageTensor::from_scaled(p)
                .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        ),
        None => None,
    };

    let eval = evaluate(&state.ctx, &body.words, tensor.as_ref());
    if let Evaluation::Verdict(report) = &eval {
        state.history.push(report);
    }
    Ok(Json(eval))
}

#[derive(serde::Deserialize)]
struct PredictTextReq {
    text: String,
}

#[derive(serde::Serialize)]
struct PredictTextResp {
    real: f32,
    fake: f32,
}

/// Text-only scoring, bypassing the scope gate; returns percentages.
/// A missing model answers with the neutral prior, not an error.
async fn predict_text(
    State(state): State<AppState>,
    Json(body): Json<PredictTextReq>,
) -> Result<Json<PredictTextResp>, (StatusCode, String)> {
    let text = crate::normalize::normalize(&body.text);
    if text.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "no text provided".to_string()));
    }
    let score = state.ctx.classifiers.score_text(&text);
    Ok(Json(PredictTextResp {
        real: score.real * 100.0,
        fake: score.fake * 100.0,
    }))
}

/// Raw screenshot bytes: OCR via the configured provider, then the full
/// pipeline. The pixel tensor is absent here (preprocessing for the image
/// classifier happens upstream), so the image side scores neutral.
async fn predict_image(
    State(state): State<AppState>,
    bytes: Bytes,
) -> Result<Json<Evaluation>, (StatusCode, String)> {
    let ocr = state.ocr.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "no OCR provider configured".to_string(),
    ))?;

    let words = ocr.recognize(&bytes).await.map_err(|e| {
        error!(error = %e, "OCR provider failed");
        (StatusCode::BAD_GATEWAY, format!("OCR failed: {e}"))
    })?;

    let eval = evaluate(&state.ctx, &words, None);
    if let Evaluation::Verdict(report) = &eval {
        state.history.push(report);
    }
    Ok(Json(eval))
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.snapshot_last_n(10))
}
