use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use accounts_server::routes;
use accounts_server::settings::Settings;
use accounts_server::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "accounts-server", version, about = "User accounts HTTP service")]
struct Args {
    /// Path to the YAML settings file
    #[arg(short, long, env = "ACCOUNTS_SETTINGS", default_value = "config/settings.yaml")]
    settings: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("accounts=info".parse()?))
        .with_target(false)
        .init();

    let args = Args::parse();
    tracing::info!(path = %args.settings.display(), "Loading settings");
    let settings = Settings::load(&args.settings)?;

    let state = Arc::new(AppState::from_settings(&settings).await?);

    let app = routes::app(state);

    let addr = settings.api.bind_addr();
    tracing::info!(
        "Starting server on {addr}, routes under '{}'",
        settings.api.mount_prefix().unwrap_or("/")
    );
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
