use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://employees.db?mode=rwc";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Request bodies may carry inline images, hence the generous limit.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Debug)]
pub struct ConfigError(String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration Error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Sqlite,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => Err(ConfigError(format!("STORE must be 'memory' or 'sqlite', got '{}'", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub store: StoreKind,
    pub database_url: String,
    pub max_connections: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("STORE") {
            Some(value) => value.parse()?,
            None => StoreKind::Sqlite,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError(format!("DATABASE_MAX_CONNECTIONS must be a number, got '{}'", value)))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(ServerConfig {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            store,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_connections,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_file = match lookup("SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        Ok(ClientConfig {
            api_url: lookup("API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            session_file,
        })
    }
}

fn default_session_file() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("employee-directory").join("session.json"))
        .ok_or_else(|| ConfigError("could not determine a data directory; set SESSION_FILE".to_string()))
}
