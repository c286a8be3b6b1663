//! TOML serialization for Config

use super::Config;

impl Config {
    /// Serialize config to TOML string (single source of truth for format)
    pub fn to_toml(&self) -> String {
        let timeout = match self.request_timeout_secs {
            Some(secs) => format!("request_timeout_secs = {}", secs),
            None => "# request_timeout_secs = 30".to_string(),
        };

        format!(
            r#"# honeyscope configuration

# Query API origin (HONEYSCOPE_API_URL overrides)
api_url = "{api_url}"

# Rows per page for sessions and alerts (1-500)
page_size = {page_size}

# Banner auto-dismiss in milliseconds (0 = stay until dismissed)
error_message_ms = {error_ms}
success_message_ms = {success_ms}

# Initial statistics window in days: 1, 7 or 30
stats_days = {stats_days}

# Per-request timeout in seconds (unset = transport default)
{timeout}

# Address for the built-in demo backend (honeyscope --demo)
demo_addr = "{demo_addr}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON file logging (in addition to the Logs panel or stdout)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            api_url = self.api_url,
            page_size = self.page_size,
            error_ms = self.error_message_ms,
            success_ms = self.success_message_ms,
            stats_days = self.stats_days,
            timeout = timeout,
            demo_addr = self.demo_addr,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<(), std::io::Error> {
        let Some(path) = Self::config_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config path",
            ));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml())
    }
}
