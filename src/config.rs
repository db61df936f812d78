use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Publicly servable root directory.
    pub public_dir: PathBuf,
    /// Sub-directory of `public_dir` and URL prefix for customer images.
    pub images_prefix: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub listen_addr: SocketAddr,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let listen_addr = listen_addr(
            &std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            &std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into()),
        )?;
        let storage = StorageConfig {
            public_dir: std::env::var("PUBLIC_DIR")
                .unwrap_or_else(|_| "public".into())
                .into(),
            images_prefix: normalize_prefix(
                &std::env::var("CUSTOMER_IMAGES_PREFIX").unwrap_or_else(|_| "customers".into()),
            )?,
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(5 * 1024 * 1024),
        };
        Ok(Self {
            database_url,
            max_connections,
            listen_addr,
            storage,
        })
    }
}

fn listen_addr(host: &str, port: &str) -> anyhow::Result<SocketAddr> {
    format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid APP_HOST/APP_PORT {}:{}", host, port))
}

// The prefix doubles as a URL segment and a directory name, so it is kept to one plain segment.
fn normalize_prefix(raw: &str) -> anyhow::Result<String> {
    let prefix = raw.trim().trim_matches('/');
    anyhow::ensure!(
        !prefix.is_empty()
            && prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
        "CUSTOMER_IMAGES_PREFIX must be a single path segment, got {:?}",
        raw
    );
    Ok(prefix.to_string())
}
