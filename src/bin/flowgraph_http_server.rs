use clap::Parser;
use flowgraph::{
    load_server_config, FlowGraphHttpServer, RecordStore, ReferenceIdentity, SharedSecret,
    TokenVerifier,
};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Command line options for the HTTP server binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Configuration file (defaults to $FLOWGRAPH_CONFIG or config/flowgraph.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Port for the HTTP server, overriding the configuration
    #[arg(long)]
    port: Option<u16>,
    /// Directory holding the record collections and the identity file
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Main entry point for the flowgraph HTTP server.
///
/// Loads the configuration, the five record collections and the reference
/// identity, then serves GraphQL until shut down. Any startup failure ends
/// the process with an error.
///
/// # Environment Variables
///
/// * `FLOWGRAPH_CONFIG` - Path to the configuration file
/// * `TOKEN_SECRET` - Shared secret for bearer tokens
/// * `PORT`, `FLOWGRAPH_DATA_DIR`, `FLOWGRAPH_LOG_LEVEL` - Overrides
#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_server_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.validate()?;

    flowgraph::logging::init(config.log_level_filter()?).ok();
    info!("Starting flowgraph HTTP server...");
    info!("Config loaded: {:?}", config);

    let store = RecordStore::load(&config.data_dir)?;
    let reference = ReferenceIdentity::load(&config.identity_path())?;
    let verifier = TokenVerifier::new(SharedSecret::new(config.token_secret()?), reference);

    let http_server = FlowGraphHttpServer::new(&config, Arc::new(store), verifier);
    http_server.run().await?;

    Ok(())
}
