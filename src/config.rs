use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Request header carrying the caller's user name.
    pub principal_header: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub principal_header: String,
    pub log_filter: String,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PRINCIPAL_HEADER: &str = "x-user-name";
const DEFAULT_LOG_FILTER: &str = "video_like_backend=debug,tower_http=debug";

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let base_dir = std::env::current_dir()?;

        // Try to load config file
        let config_path = base_dir.join("config.toml");
        let config_file = read_config_file(&config_path)?;

        Ok(Self::resolve(config_file, |key| std::env::var(key).ok()))
    }

    /// Merge the sources in priority order: env vars, then config file, then defaults.
    pub fn resolve<F>(config_file: Option<ConfigFile>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = config_file.unwrap_or_default();

        let host = env("HOST")
            .or(file.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = env("PORT")
            .and_then(|p| p.parse().ok())
            .or(file.server.port)
            .unwrap_or(DEFAULT_PORT);

        let principal_header = env("PRINCIPAL_HEADER")
            .or(file.auth.principal_header)
            .unwrap_or_else(|| DEFAULT_PRINCIPAL_HEADER.to_string())
            .to_ascii_lowercase();

        let log_filter = env("RUST_LOG")
            .or(file.logging.filter)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            host,
            port,
            principal_header,
            log_filter,
        }
    }

    pub fn from_env() -> Self {
        Self::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Self::resolve(None, |key| std::env::var(key).ok())
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(None, |_| None)
    }
}

fn read_config_file(path: &Path) -> anyhow::Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(toml::from_str::<ConfigFile>(&content)?))
}
