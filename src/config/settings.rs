use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/recipe.db";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_URL: &str = "/media";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub media_root: PathBuf,
    pub media_url: String,
    pub max_upload_bytes: usize,
    pub cors_permissive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8000)),
            media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
            media_url: DEFAULT_MEDIA_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_permissive: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Settings::default();

        let bind_address = env_or("BIND_ADDRESS", DEFAULT_BIND_ADDRESS)
            .parse()
            .unwrap_or_else(|_| {
                warn!("BIND_ADDRESS is not a valid socket address; using {}", DEFAULT_BIND_ADDRESS);
                defaults.bind_address
            });

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                warn!("MAX_UPLOAD_BYTES is not a number; using {}", DEFAULT_MAX_UPLOAD_BYTES);
                DEFAULT_MAX_UPLOAD_BYTES
            }),
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Settings {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_address,
            media_root: PathBuf::from(env_or("MEDIA_ROOT", DEFAULT_MEDIA_ROOT)),
            media_url: normalize_media_url(&env_or("MEDIA_URL", DEFAULT_MEDIA_URL)),
            max_upload_bytes,
            cors_permissive: env_flag_enabled("CORS_PERMISSIVE"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_flag_enabled(key: &str) -> bool {
    env::var(key)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false)
}

/// Ensures a leading slash and no trailing slash (`media/` -> `/media`).
fn normalize_media_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        warn!("MEDIA_URL cannot be the site root; using {}", DEFAULT_MEDIA_URL);
        return DEFAULT_MEDIA_URL.to_string();
    }
    if trimmed.starts_with('/') || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
