use anyhow::Result;
use feedback_hub::{
    api::{self, AppState},
    config::{Config, Sheet},
    sheets::{LazySheets, SheetStore},
};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config + logging ─────────────────────────────────────────
    let config = Config::from_env();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    info!("Starting Feedback Hub Backend");
    for sheet in Sheet::ALL {
        let cfg = config.sheet(sheet);
        match &cfg.spreadsheet_id {
            Some(id) => info!(sheet = ?sheet, id = %id, worksheet = %cfg.worksheet, "configured"),
            None => warn!("{} not set; {:?} routes will return 400", sheet.id_var(), sheet),
        }
    }

    // ─── 2) store, connected eagerly so startup logs say whether it works ──
    let store = Arc::new(LazySheets::new(config.credentials.clone()));
    match store.ready().await {
        Ok(()) => info!("Backend ready with Google Sheets connection"),
        Err(e) => warn!("Backend ready but Google Sheets not connected: {}", e),
    }

    // ─── 3) serve ────────────────────────────────────────────────────
    let port = config.port;
    let state = Arc::new(AppState {
        config,
        store: store as Arc<dyn SheetStore>,
    });
    let routes = api::routes(state);

    info!("Server starting on port {}", port);
    info!("Health check: http://localhost:{}/api/health", port);
    info!("Questions:    GET  http://localhost:{}/api/questions", port);
    info!("Mapping:      GET  http://localhost:{}/api/mapping?email=", port);
    info!("Responses:    GET  http://localhost:{}/api/responses", port);
    info!("Submit:       POST http://localhost:{}/api/submit-feedback", port);
    info!("Sheets test:  GET  http://localhost:{}/api/test-sheets", port);

    warp::serve(routes).run(([0, 0, 0, 0], port)).await;

    Ok(())
}
