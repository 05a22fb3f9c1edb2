use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::extract::{ImagePattern, GOOGLE_PHOTOS_V1};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ALBUM_BIND_ADDR is not a valid socket address: {0}")]
    InvalidBindAddr(String),
    #[error("ALBUM_FETCH_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
    #[error("ALBUM_PATTERN names an unknown image pattern version: {0}")]
    UnknownPattern(String),
    #[error("ALBUM_DEFAULT_URL is not usable: {0}")]
    InvalidDefaultAlbum(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub default_album_url: Option<String>,
    pub pattern: ImagePattern,
    pub fetch_timeout: Duration,
    pub insecure_ssl: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = var("ALBUM_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr.clone()))?;

        let default_album_url = match var("ALBUM_DEFAULT_URL") {
            Some(url) => {
                validate_album_url(&url).map_err(ConfigError::InvalidDefaultAlbum)?;
                Some(url)
            }
            None => None,
        };

        let version = var("ALBUM_PATTERN").unwrap_or_else(|| GOOGLE_PHOTOS_V1.to_string());
        let pattern =
            ImagePattern::by_version(&version).ok_or(ConfigError::UnknownPattern(version))?;

        let fetch_timeout = match var("ALBUM_FETCH_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        let insecure_ssl = var("ALBUM_INSECURE_SSL").as_deref() == Some("1");

        Ok(Self {
            bind_addr,
            default_album_url,
            pattern,
            fetch_timeout,
            insecure_ssl,
        })
    }
}

fn validate_album_url(album_url: &str) -> Result<Url, String> {
    let parsed = Url::parse(album_url).map_err(|_| "not a valid URL".to_string())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", parsed.scheme()));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err("URL has no host".to_string());
    }
    Ok(parsed)
}
