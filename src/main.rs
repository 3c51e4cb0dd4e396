use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use url_summarizer::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("url_summarizer=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    tracing::info!(
        model = %config.llm_model,
        llm_base_url = %config.llm_base_url,
        languages = ?config.transcript_languages,
        "Configuration loaded"
    );

    let app_state = AppState::from_config(&config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!("Listening on http://{}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
