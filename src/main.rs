use cargodesk::{
    config::{database, settings},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Non-fatal: env vars can be set externally
    dotenv().ok();

    let engine_settings = match settings::load_default_settings() {
        Ok(loaded) => {
            info!("Engine settings loaded from settings.toml.");
            loaded
        }
        Err(e) => {
            tracing::warn!("No usable settings.toml ({e}); using built-in defaults.");
            settings::EngineSettings::default()
        }
    };

    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| tracing::error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;
    info!(
        prefix = %engine_settings.tracking_id_prefix,
        "Cargodesk ready; schema initialized."
    );

    Ok(())
}
