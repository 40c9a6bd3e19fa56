use std::sync::Arc;

use cert_verifier::config::Config;
use cert_verifier::db::{CertificateStore, import_csv};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &cert_verifier::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        demo_mode = cfg.demo_fallback(),
    );

    if cfg.basic.api_key.is_empty() {
        warn!("no api_key configured; every protected route will answer 401");
    }
    if cfg.demo_fallback() {
        warn!("no OCR key configured; /verify falls back to demo samples");
    }

    let store = CertificateStore::connect(&cfg.basic.database_url).await?;

    if let Some(seed_path) = cfg.basic.seed_csv.as_ref() {
        match std::fs::File::open(seed_path) {
            Ok(file) => match import_csv(&store, file, &cfg.roster).await {
                Ok(summary) => {
                    info!(
                        path = %seed_path.display(),
                        imported = summary.imported,
                        skipped = summary.skipped,
                        "seeded certificates from CSV"
                    );
                }
                Err(e) => {
                    warn!(path = %seed_path.display(), error = %e, "failed to import seed CSV");
                }
            },
            Err(e) => {
                warn!(path = %seed_path.display(), error = %e, "failed to open seed CSV");
            }
        }
    }

    let api_key: Arc<str> = Arc::from(cfg.basic.api_key.as_str());
    let state = cert_verifier::router::VerifierState::new(store, api_key, Config::clone(cfg));
    let app = cert_verifier::router::verifier_router(state);

    let listener = TcpListener::bind(&cfg.basic.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
