use anyhow::Result;
use modelhub_core::Config;
use std::path::{Path, PathBuf};

pub async fn execute(path: Option<&Path>, key: Option<&str>, value: Option<&str>) -> Result<()> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };

    // Read the file as written so an env-supplied key is never saved back
    let mut config = if config_path.exists() {
        Config::read_file(&config_path)?
    } else {
        Config::default()
    };

    match (key, value) {
        // Show all config
        (None, None) => {
            println!("Configuration file: {:?}\n", config_path);
            println!("[server]");
            println!("  host = \"{}\"", config.server.host);
            println!("  port = {}", config.server.port);
            println!("  public_url = \"{}\"", config.public_url());
            println!("  idle_timeout_secs = {}", config.server.idle_timeout_secs);
            println!();
            println!("[auth]");
            println!("  api_key = {}", mask(&config.auth.api_key));
            println!();
            println!("[storage]");
            println!("  base_path = {:?}", config.storage.base_path);
            println!();
            println!("[registry]");
            match &config.registry.file {
                Some(file) => println!("  file = {:?}", file),
                None => {
                    for model in &config.registry.models {
                        println!("  {} -> {}", model.id, model.path);
                    }
                }
            }
        }

        // Get a specific key
        (Some(key), None) => {
            let value = get_config_value(&config, key)?;
            println!("{}", value);
        }

        // Set a specific key
        (Some(key), Some(value)) => {
            set_config_value(&mut config, key, value)?;
            config.validate()?;
            config.save_to(&config_path)?;
            println!("Set {} = {}", key, value);
        }

        _ => unreachable!(),
    }

    Ok(())
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else {
        let visible: String = secret.chars().take(4).collect();
        format!("{}***", visible)
    }
}

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    match key {
        "server.host" => Ok(config.server.host.clone()),
        "server.port" => Ok(config.server.port.to_string()),
        "server.public_url" => Ok(config.public_url()),
        "server.idle_timeout_secs" => Ok(config.server.idle_timeout_secs.to_string()),
        "auth.api_key" => Ok(mask(&config.auth.api_key)),
        "storage.base_path" => Ok(config.storage.base_path.display().to_string()),
        "registry.file" => Ok(config
            .registry
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "server.host" => config.server.host = value.to_string(),
        "server.port" => config.server.port = value.parse()?,
        "server.public_url" => {
            config.server.public_url = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }
        "server.idle_timeout_secs" => config.server.idle_timeout_secs = value.parse()?,
        "auth.api_key" => config.auth.api_key = value.to_string(),
        "storage.base_path" => config.storage.base_path = PathBuf::from(value),
        "registry.file" => {
            config.registry.file = if value.is_empty() {
                None
            } else {
                Some(value.into())
            }
        }
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
    Ok(())
}
