use anyhow::Result;
use std::path::PathBuf;

pub async fn run(path: PathBuf, title: Option<String>) -> Result<()> {
    let title = title.unwrap_or_else(|| "MediaVault".to_string());
    let config_path = path.join("mediavault.toml");

    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    std::fs::create_dir_all(path.join("data/media"))?;

    let config = format!(
        r#"[site]
title = "{}"
url = "http://localhost:3000"

[server]
host = "127.0.0.1"
port = 3000

[database]
path = "./data/mediavault.db"

[media]
upload_dir = "./data/media"
max_upload_size = "50MB"
thumbnails = true
thumbnail_size = 300

[auth]
session_lifetime = "1d"
remember_lifetime = "30d"
"#,
        title.replace('"', "\\\"")
    );

    std::fs::write(&config_path, config)?;

    tracing::info!("Created new gallery at {:?}", path);
    tracing::info!("Run 'mediavault migrate' to set up the database");
    tracing::info!("Run 'mediavault user add --username admin --role admin' to create the first account");
    tracing::info!("Run 'mediavault serve' to start the server");

    Ok(())
}
