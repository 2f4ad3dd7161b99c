use anyhow::Result;
use modelhub_core::Config;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct Health {
    status: String,
    service: String,
    available_models: usize,
    #[serde(default)]
    version: Option<String>,
}

pub async fn execute(config: &Config, url: Option<&str>) -> Result<()> {
    let base = url
        .map(|u| u.trim_end_matches('/').to_string())
        .unwrap_or_else(|| config.public_url());

    println!("modelhub status\n");
    println!("Server: {}", base);

    match check_health(&base).await {
        Ok(health) => {
            println!("Status: {} ({})", health.status, health.service);
            if let Some(version) = health.version {
                println!("Version: {}", version);
            }
            println!("Registered models: {}", health.available_models);
        }
        Err(e) => {
            println!("Status: not reachable ({})", e);
            println!("\nRun `modelhub serve` to start the server.");
        }
    }

    Ok(())
}

async fn check_health(base: &str) -> Result<Health> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let health = client
        .get(format!("{}/health", base))
        .send()
        .await?
        .error_for_status()?
        .json::<Health>()
        .await?;

    Ok(health)
}
