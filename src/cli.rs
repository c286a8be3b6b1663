// CLI module - command-line argument parsing and handlers
//
// Top-level flags override the loaded configuration. Subcommands:
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --path: Print the config file location
// - serve-demo: Run only the demo backend (no TUI)

use crate::config::{Config, VERSION};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::net::SocketAddr;

/// honeyscope - terminal dashboard for honeypot analytics
#[derive(Parser, Debug)]
#[command(name = "honeyscope")]
#[command(version = VERSION)]
#[command(about = "Terminal dashboard for honeypot attack analytics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Query API base URL (e.g. http://localhost:8083/api)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Start the built-in demo backend and connect to it
    #[arg(long)]
    pub demo: bool,

    /// Rows per page for sessions and alerts
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..=crate::config::MAX_PAGE_SIZE as i64)
    )]
    pub page_size: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Serve the demo backend in the foreground
    ServeDemo {
        /// Listen address (defaults to demo_addr from config)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
}

impl Cli {
    /// Apply command-line overrides on top of env/file/defaults
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if self.demo {
            config.demo_mode = true;
        }
        if let Some(n) = self.page_size {
            config.page_size = n;
        }
    }
}

/// Handle `config` subcommands. Returns true if one was handled (exit after).
pub fn handle_config_command(cli: &Cli) -> bool {
    let Some(Commands::Config { show, reset, path }) = &cli.command else {
        return false;
    };

    if *path {
        handle_config_path();
    } else if *show {
        handle_config_show();
    } else if *reset {
        handle_config_reset();
    } else {
        println!("Usage: honeyscope config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
    true
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());
    println!();
    println!("# demo_mode = {} (HONEYSCOPE_DEMO / --demo)", config.demo_mode);

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = Config::default().save() {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "honeyscope",
            "--api-url",
            "http://10.0.0.5:8083/api",
            "--demo",
            "--page-size",
            "20",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.api_url, "http://10.0.0.5:8083/api");
        assert!(config.demo_mode);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_no_flags_leaves_config() {
        let cli = Cli::try_parse_from(["honeyscope"]).unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.api_url, Config::default().api_url);
        assert!(!config.demo_mode);
        assert!(!handle_config_command(&cli));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(Cli::try_parse_from(["honeyscope", "--page-size", "0"]).is_err());
    }

    #[test]
    fn test_page_size_above_api_limit_rejected() {
        assert!(Cli::try_parse_from(["honeyscope", "--page-size", "501"]).is_err());
        assert!(Cli::try_parse_from(["honeyscope", "--page-size", "500"]).is_ok());
    }

    #[test]
    fn test_serve_demo_addr() {
        let cli = Cli::try_parse_from(["honeyscope", "serve-demo", "--addr", "0.0.0.0:9000"])
            .unwrap();
        match cli.command {
            Some(Commands::ServeDemo { addr }) => {
                assert_eq!(addr, Some("0.0.0.0:9000".parse().unwrap()))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
