use pollgate::{api::Server, config::Config, state::EventCatalog};
use tracing::info;

/// The main entry point for the poll service.
///
/// Initializes logging, loads the configuration and the event catalog, and
/// starts the API server.
#[tokio::main] // Runs the async main function on the Tokio runtime.
async fn main() -> anyhow::Result<()> {
    // Initialize logging using tracing_subscriber with the default stdout formatter.
    tracing_subscriber::fmt::init();

    // Load the application configuration from the TOML file.
    // The `?` operator propagates any errors that occur during loading.
    let config = Config::load("config/default.toml")?;
    // Log the loaded configuration for debugging purposes.
    info!("Poll service starting with config: {:?}", config);

    // Seed the event catalog from the configured file.
    // Without a seed file the catalog starts empty and is filled over the API.
    let catalog = match &config.events.path {
        Some(path) => EventCatalog::load(path).await?,
        None => EventCatalog::new(),
    };
    info!("Event catalog ready with {} events", catalog.len().await);

    // Create the API server with the configuration and the shared catalog.
    let server = Server::new(config, catalog);
    // Bind to the configured address and serve until shutdown.
    // Binding errors are propagated with `?`.
    server.start().await?;

    // Return `Ok(())` to indicate a clean shutdown.
    Ok(())
}
