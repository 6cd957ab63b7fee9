use serde::{Deserialize, Serialize};
use serve_videos_common::ExtensionSet;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address and port to listen to
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Directory to serve; resolved to an absolute path at startup
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File name suffixes to serve
    #[serde(default)]
    pub extensions: ExtensionSet,
}

fn default_addr() -> String {
    "0.0.0.0:8010".to_string()
}
fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            root: default_root(),
            extensions: ExtensionSet::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Time allowed for a client to send request headers
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,

    /// Upper bound on a single connection's lifetime, sized for large transfers
    #[serde(default = "default_write_timeout")]
    pub write_timeout_secs: u64,

    /// How long in-flight connections may keep running after shutdown starts
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

fn default_read_timeout() -> u64 {
    10
}
fn default_write_timeout() -> u64 {
    3600
}
fn default_shutdown_grace() -> u64 {
    10
}

impl HttpConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            read_timeout_secs: default_read_timeout(),
            write_timeout_secs: default_write_timeout(),
            shutdown_grace_secs: default_shutdown_grace(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// `max-age` sent with ordinary media files
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,

    /// Files ending with one of these are never cached (live playlists)
    #[serde(default = "default_no_store_suffixes")]
    pub no_store_suffixes: Vec<String>,
}

fn default_max_age() -> u64 {
    86400
}
fn default_no_store_suffixes() -> Vec<String> {
    vec![".m3u8".to_string()]
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age(),
            no_store_suffixes: default_no_store_suffixes(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WatchConfig {
    /// Quiet period used to fold bursts of events into one rescan; 0 rescans
    /// on every event
    #[serde(default)]
    pub coalesce_ms: u64,
}

impl WatchConfig {
    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_ms)
    }
}
