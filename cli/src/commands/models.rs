use anyhow::Result;
use modelhub_core::{ArtifactStore, Config, ModelRegistry};

pub async fn execute(config: &Config) -> Result<()> {
    let registry = ModelRegistry::from_config(config)?;
    let store = ArtifactStore::new(&config.storage.base_path);

    if registry.is_empty() {
        println!("No models registered.");
        println!("\nAdd [[registry.models]] entries to the config file.");
        return Ok(());
    }

    println!("Models directory: {}\n", store.base_dir().display());
    println!(
        "{:<30} {:<10} {:<12} {:<12} {}",
        "ID", "VERSION", "STATUS", "SIZE", "PATH"
    );
    println!("{}", "-".repeat(90));

    for model in registry.list() {
        let (status, size) = match store.stat(&model.path).await {
            Ok(Some(info)) => ("available", format_size(info.size_bytes)),
            Ok(None) => ("missing", "-".to_string()),
            Err(e) => {
                tracing::warn!(model = %model.id, "{}", e);
                ("unusable", "-".to_string())
            }
        };

        println!(
            "{:<30} {:<10} {:<12} {:<12} {}",
            model.id, model.version, status, size, model.path
        );
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(900_000), "878.91 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.00 GB");
    }
}
