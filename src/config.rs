// Connection configuration for the record store. Values come from command
// line flags, falling back to environment variables; `.env` files are loaded
// into the environment first so they act as the lowest-priority layer.

use crate::error::ConfigError;
use clap::Parser;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "novel-uploader";
const DEFAULT_TABLE: &str = "novels";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command line arguments. Every flag can also be supplied through the
/// environment variable named next to it.
#[derive(Debug, Clone, Parser)]
#[command(name = "novel-uploader", version, about = "Interactively add novels to the catalogue")]
pub struct Args {
    /// Base URL of the hosted project, e.g. https://xyz.supabase.co
    #[arg(long, env = "SUPABASE_URL")]
    pub url: Option<String>,

    /// API key sent with every request
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Table the novels are inserted into
    #[arg(long, env = "NOVELS_TABLE", default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Request timeout in seconds
    #[arg(long, env = "NOVEL_UPLOADER_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Immutable settings handed to the store client at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: Url,
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

// Keeps the key out of logs and panic messages.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"***")
            .field("table", &self.table)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StoreConfig {
    /// Validate parsed arguments into a config.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let raw_url = non_empty(args.url.as_deref()).ok_or(ConfigError::Missing("store url (SUPABASE_URL)"))?;
        let api_key = non_empty(args.key.as_deref()).ok_or(ConfigError::Missing("api key (SUPABASE_KEY)"))?;
        let table = non_empty(Some(args.table.as_str())).ok_or(ConfigError::Missing("table name (NOVELS_TABLE)"))?;

        Ok(StoreConfig {
            url: parse_base_url(raw_url)?,
            api_key: api_key.to_string(),
            table: table.to_string(),
            timeout: Duration::from_secs(args.timeout_secs),
        })
    }

    /// Endpoint rows are inserted through.
    pub fn table_endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.url.as_str().trim_end_matches('/'), self.table)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

/// Per-user env file, e.g. `~/.config/novel-uploader/.env` on Linux.
pub fn user_env_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(".env"))
}

/// Load `./.env` and then the per-user env file into the process
/// environment. Variables that are already set win, and missing files are
/// skipped.
pub fn load_env_files() -> Result<Vec<PathBuf>, ConfigError> {
    let mut loaded = Vec::new();
    let candidates = [Some(PathBuf::from(".env")), user_env_file()];
    for path in candidates.into_iter().flatten() {
        if load_env_file(&path)? {
            loaded.push(path);
        }
    }
    Ok(loaded)
}

fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
    if !path.is_file() {
        return Ok(false);
    }
    dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(url: Option<&str>, key: Option<&str>) -> Args {
        Args {
            url: url.map(String::from),
            key: key.map(String::from),
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn builds_table_endpoint() {
        let cfg = StoreConfig::from_args(&args(Some("https://abc.supabase.co/"), Some("k"))).unwrap();
        assert_eq!(cfg.table_endpoint(), "https://abc.supabase.co/rest/v1/novels");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_values_are_reported() {
        let err = StoreConfig::from_args(&args(None, Some("k"))).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));

        let err = StoreConfig::from_args(&args(Some("https://abc.supabase.co"), Some("   "))).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn rejects_non_http_urls() {
        let err = StoreConfig::from_args(&args(Some("ftp://abc"), Some("k"))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = StoreConfig::from_args(&args(Some("not a url"), Some("k"))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn debug_hides_key() {
        let cfg = StoreConfig::from_args(&args(Some("https://abc.supabase.co"), Some("secret-key"))).unwrap();
        assert!(!format!("{:?}", cfg).contains("secret-key"));
    }

    #[test]
    fn env_file_is_loaded_without_overriding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "NOVEL_UPLOADER_TEST_FROM_FILE=file").unwrap();
        writeln!(file, "NOVEL_UPLOADER_TEST_PRESET=file").unwrap();
        std::env::set_var("NOVEL_UPLOADER_TEST_PRESET", "process");

        assert!(load_env_file(&path).unwrap());
        assert_eq!(std::env::var("NOVEL_UPLOADER_TEST_FROM_FILE").unwrap(), "file");
        assert_eq!(std::env::var("NOVEL_UPLOADER_TEST_PRESET").unwrap(), "process");
    }

    #[test]
    fn missing_env_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_env_file(&dir.path().join("absent.env")).unwrap());
    }
}
