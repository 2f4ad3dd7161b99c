use anyhow::Result;
use modelhub_core::Config;

pub async fn execute(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    println!("Starting modelhub server...");
    println!("Listening on http://{}:{}", config.server.host, config.server.port);
    println!("Models directory: {}", config.storage.base_path.display());
    println!("\nAPI endpoints:");
    println!("  GET  /health              - Health check");
    println!("  GET  /models              - List models");
    println!("  GET  /metadata/{{model_id}} - Model descriptor and metadata");
    println!("  GET  /download/{{model_id}} - Download model file (API key required)");
    println!("\nPress Ctrl+C to stop.\n");

    modelhub_daemon::run_server(config).await?;

    Ok(())
}
