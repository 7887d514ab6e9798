//! Scanner Service — Binary Entrypoint
//! Boots the Axum HTTP server: loads the scanner config, builds the
//! immutable evaluation context, and wires routes plus CORS.
//!
//! Model oracles and the OCR provider are deployment plug-ins; without
//! them the service still answers, substituting neutral priors.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use edscan::api::{self, AppState};
use edscan::classifier::ClassifierAdapter;
use edscan::config::ScannerConfig;
use edscan::engine::ScannerContext;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("edscan=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op elsewhere. Enables SCANNER_CONFIG_PATH
    // and SCANNER_FUZZY_THRESHOLD overrides.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = ScannerConfig::from_env()?;
    tracing::info!(
        keywords = cfg.scope.keywords.len(),
        institutions = cfg.institutions.len(),
        labels_flipped = cfg.classifier.labels_flipped,
        "scanner config loaded"
    );

    // Oracles are registered here by deployments that ship model weights;
    // the default build runs with neutral priors.
    let classifiers = ClassifierAdapter::unloaded(cfg.classifier.labels_flipped);
    if !classifiers.has_image_oracle() && !classifiers.has_text_oracle() {
        tracing::warn!("no classifier oracles registered; verdicts will use neutral priors");
    }
    let ctx = ScannerContext::new(&cfg, classifiers);

    let state = AppState::new(ctx, None);
    let app = api::router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
