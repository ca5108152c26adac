use tokio::net::TcpListener;

use flatwiki::{build_router, AppState, Config, Logger, WikiError};

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = Config::from_env();
    log::info!(
        "Starting wiki: data in {:?}, templates from {:?}",
        config.data_dir,
        config.template_dir
    );

    let state = AppState::from_config(&config).await?;
    let app = build_router(state);

    let addr = config.socket_addr().await?;
    log::info!("Wiki listening on http://{}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.map_err(WikiError::from)
}
