//! Composition root: load configuration, set up tracing, open the store,
//! build the upstream AI clients, and serve the HTTP boundary until
//! ctrl-c.

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sensecap_ai::{LlmClient, SttClient, TtsClient};
use sensecap_config::CliArgs;
use sensecap_core::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliArgs::parse();

    let config = match sensecap_config::load_config(cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("FATAL: failed to load configuration: {e}");
            return Err(Box::new(e));
        }
    };

    init_tracing();

    info!("sensecap-local-server starting");
    info!(
        listen_host = %config.listen_host,
        listen_port = config.listen_port,
        db_path = %config.db_path.display(),
        "configuration loaded"
    );

    let db_url = format!("sqlite:{}", config.db_path.display());
    let db_pool = match sensecap_db::init_db(&db_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "failed to initialize database, exiting");
            return Err(Box::new(e));
        }
    };

    let http_client = reqwest::Client::new();
    let stt_client = SttClient::new(http_client.clone(), config.stt_base_url.clone());
    let tts_client = TtsClient::new(http_client.clone(), config.tts_base_url.clone());
    let llm_client = LlmClient::new(
        http_client,
        config.llm_base_url.clone(),
        config.llm_text_model.clone(),
        config.llm_vision_model.clone(),
    );

    let listen_host = config.listen_host.clone();
    let listen_port = config.listen_port;

    let state = Arc::new(AppState::new(
        Arc::new(config),
        db_pool,
        stt_client,
        tts_client,
        llm_client,
    ));

    let app = sensecap_api::build_router(state);

    let addr = format!("{listen_host}:{listen_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sensecap-local-server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install ctrl-c handler");
        return;
    }
    info!("shutdown signal received");
}
