use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_DATABASE_PATH: &str = "databrowse.db";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub client: Option<ClientConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: Option<String>,
    pub database_path: Option<String>,
    /// Directory served under `/static` (the built wasm package).
    pub static_dir: Option<String>,
    /// SQL script loaded into an empty database on startup.
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn bind_addr(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind_addr.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
    }

    pub fn database_path(&self) -> PathBuf {
        self.server
            .as_ref()
            .and_then(|s| s.database_path.as_ref())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    pub fn static_dir(&self) -> PathBuf {
        self.server
            .as_ref()
            .and_then(|s| s.static_dir.as_ref())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR))
    }

    pub fn seed_path(&self) -> Option<PathBuf> {
        self.server
            .as_ref()
            .and_then(|s| s.seed_path.as_ref())
            .map(PathBuf::from)
    }

    pub fn base_url(&self) -> String {
        self.client
            .as_ref()
            .and_then(|c| c.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.client
                .as_ref()
                .and_then(|c| c.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }
}

/// Platform config directory path: `<config_dir>/databrowse/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("databrowse").join("config.toml"))
}

/// Load config by cascading CWD `.databrowse.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".databrowse.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let server = match (base.server, overlay.server) {
        (None, None) => None,
        (b, o) => {
            let b = b.unwrap_or_default();
            let o = o.unwrap_or_default();
            Some(ServerConfig {
                bind_addr: o.bind_addr.or(b.bind_addr),
                database_path: o.database_path.or(b.database_path),
                static_dir: o.static_dir.or(b.static_dir),
                seed_path: o.seed_path.or(b.seed_path),
            })
        }
    };
    let client = match (base.client, overlay.client) {
        (None, None) => None,
        (b, o) => {
            let b = b.unwrap_or_default();
            let o = o.unwrap_or_default();
            Some(ClientConfig {
                base_url: o.base_url.or(b.base_url),
                timeout_secs: o.timeout_secs.or(b.timeout_secs),
            })
        }
    };
    ConfigFile { server, client }
}
