use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use taskserver::config::AppConfig;
use taskserver::server::run_server;
use taskserver::shared::state::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let config = AppConfig::from_env();
    std::fs::create_dir_all(&config.uploads.dir)?;
    info!("Storing uploads in {}", config.uploads.dir.display());

    let app_state = Arc::new(AppState::new(config));
    run_server(app_state).await
}
