//! Configuration management

use std::env;
use std::str::FromStr;

use serde::Deserialize;

use crate::extract::MAX_FULL_TEXT_CHARS;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,
    /// Wall-clock budget for one extraction
    pub extraction_timeout_secs: u64,
    /// Cap on stored full text, in characters
    pub max_extracted_text_chars: usize,
    /// Accepted upload MIME types
    pub allowed_mime_types: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite:./pdf-tutor.db".to_string(),
                max_connections: 5,
            },
            ingest: IngestConfig::default(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            max_upload_bytes: 10 * 1024 * 1024,
            extraction_timeout_secs: 120,
            max_extracted_text_chars: MAX_FULL_TEXT_CHARS,
            allowed_mime_types: vec!["application/pdf".to_string()],
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or("SERVER_PORT", defaults.server.port),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: parse_or("DB_MAX_CONNECTIONS", defaults.database.max_connections),
            },
            ingest: IngestConfig {
                max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", defaults.ingest.max_upload_bytes),
                extraction_timeout_secs: parse_or(
                    "EXTRACTION_TIMEOUT_SECS",
                    defaults.ingest.extraction_timeout_secs,
                ),
                max_extracted_text_chars: parse_or(
                    "MAX_EXTRACTED_TEXT_CHARS",
                    defaults.ingest.max_extracted_text_chars,
                ),
                allowed_mime_types: match env::var("ALLOWED_MIME_TYPES") {
                    Ok(list) => list
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                    Err(env::VarError::NotPresent) => defaults.ingest.allowed_mime_types,
                    Err(e) => return Err(e),
                },
            },
        })
    }
}
