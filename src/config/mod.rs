//! Configuration for the dashboard
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/honeyscope/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! Command line flags are applied on top by `main`.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod serialization;

#[cfg(test)]
mod tests;

pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_URL: &str = "http://localhost:8083/api";
pub const DEFAULT_DEMO_ADDR: &str = "127.0.0.1:8083";

/// Largest `limit` the query API accepts for list endpoints
pub const MAX_PAGE_SIZE: u32 = 500;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Query API origin, including the `/api` prefix
    pub api_url: String,

    /// Rows per page for sessions and alerts
    pub page_size: u32,

    /// How long the error banner stays up (0 = until dismissed)
    pub error_message_ms: u64,

    /// How long the success banner stays up (0 = until dismissed)
    pub success_message_ms: u64,

    /// Initial statistics window: 1, 7 or 30 days
    pub stats_days: u32,

    /// Per-request timeout; `None` leaves the transport default
    pub request_timeout_secs: Option<u64>,

    /// Demo mode: serve canned data locally and point the client at it
    pub demo_mode: bool,

    /// Where the demo backend listens
    pub demo_addr: SocketAddr,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 50,
            error_message_ms: 5000,
            success_message_ms: 3000,
            stats_days: 7,
            request_timeout_secs: None,
            demo_mode: false,
            demo_addr: SocketAddr::from(([127, 0, 0, 1], 8083)),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub api_url: Option<String>,
    pub page_size: Option<u32>,
    pub error_message_ms: Option<u64>,
    pub success_message_ms: Option<u64>,
    pub stats_days: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub demo_addr: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/honeyscope/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("honeyscope").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but cannot be read or parsed is fatal: the
    /// process exits with a message pointing at the file rather than running
    /// on defaults the user didn't ask for.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  To reset, run `honeyscope config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        Self::resolve(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // API URL: env > file > default
        let api_url = env("HONEYSCOPE_API_URL")
            .or(file.api_url)
            .unwrap_or(defaults.api_url);

        // Page size: env > file > default, never zero, capped at the API limit
        let page_size = env("HONEYSCOPE_PAGE_SIZE")
            .and_then(|v| v.parse().ok())
            .or(file.page_size)
            .filter(|&n| n > 0)
            .unwrap_or(defaults.page_size);
        let page_size = if page_size > MAX_PAGE_SIZE {
            eprintln!(
                "page_size {} exceeds the API limit, using {}",
                page_size, MAX_PAGE_SIZE
            );
            MAX_PAGE_SIZE
        } else {
            page_size
        };

        // Request timeout: env > file > none
        let request_timeout_secs = env("HONEYSCOPE_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .or(file.request_timeout_secs)
            .filter(|&secs| secs > 0);

        // Demo mode: env only (runtime flag)
        let demo_mode = env("HONEYSCOPE_DEMO")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let demo_addr = match file.demo_addr {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                eprintln!("Invalid demo_addr '{}', using {}", raw, DEFAULT_DEMO_ADDR);
                defaults.demo_addr
            }),
            None => defaults.demo_addr,
        };

        Self {
            api_url,
            page_size,
            error_message_ms: file.error_message_ms.unwrap_or(defaults.error_message_ms),
            success_message_ms: file
                .success_message_ms
                .unwrap_or(defaults.success_message_ms),
            stats_days: file.stats_days.unwrap_or(defaults.stats_days),
            request_timeout_secs,
            demo_mode,
            demo_addr,
            logging: LoggingConfig::from_file(file.logging),
        }
    }

    /// Base URL of the local demo backend
    pub fn demo_api_url(&self) -> String {
        format!("http://{}/api", self.demo_addr)
    }
}
