// honeyscope - terminal dashboard for honeypot attack analytics
//
// Reads pre-computed sessions, alerts, statistics and threat intelligence
// from the honeypot query API and renders them in a ratatui TUI.
//
// Architecture:
// - API client (reqwest): typed GETs against the query API
// - Store: single owner of everything the views render
// - Controller: turns user intents into fetches; spawned fetches report back
//   over a channel and only the newest request per target is applied
// - TUI (ratatui): tabs, tables, modals, message banner, logs panel
// - Demo (axum): canned backend for trying the dashboard without a honeypot

mod api;
mod cli;
mod clipboard;
mod config;
mod controller;
mod demo;
mod format;
mod logging;
mod store;
mod tui;

use anyhow::{Context, Result};
use api::ApiClient;
use clap::Parser;
use cli::{Cli, Commands};
use clipboard::SystemClipboard;
use config::{Config, LogRotation};
use controller::{Controller, ControllerOptions};
use logging::{LogBuffer, TuiLogLayer};
use std::sync::Arc;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // config --show / --reset / --path exit straight away
    if cli::handle_config_command(&cli) {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    cli.apply_overrides(&mut config);

    let headless = matches!(cli.command, Some(Commands::ServeDemo { .. }));
    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config, !headless, &log_buffer);

    if let Some(Commands::ServeDemo { addr }) = cli.command {
        return demo::serve(addr.unwrap_or(config.demo_addr)).await;
    }

    if config.demo_mode {
        demo::spawn(config.demo_addr)
            .await
            .context("Failed to start demo backend")?;
        config.api_url = config.demo_api_url();
    }

    tracing::info!("honeyscope {} using {}", config::VERSION, config.api_url);

    let client = ApiClient::new(
        config.api_url.clone(),
        config.request_timeout_secs.map(Duration::from_secs),
    )
    .context("Failed to create API client")?;

    let (controller, completions) = Controller::new(
        Arc::new(client),
        Box::new(SystemClipboard),
        ControllerOptions::from(&config),
    );

    let app = tui::app::App::new(controller, log_buffer);
    tui::run_tui(app, completions).await
}

/// Initialize tracing with conditional output
///
/// In TUI mode logs are captured to the buffer (stdout would garble the
/// display); headless they go to stdout. File logging optionally adds a JSON
/// layer on a rotating file. The returned guard must live until exit so the
/// background writer flushes.
///
/// Precedence: RUST_LOG env var > config file > default "info"
fn init_tracing(config: &Config, tui: bool, log_buffer: &LogBuffer) -> Option<WorkerGuard> {
    let default_filter = format!("honeyscope={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let tui_layer = tui.then(|| TuiLogLayer::new(log_buffer.clone()));
    let stdout_layer = (!tui).then(tracing_subscriber::fmt::layer);

    let mut guard = None;
    let file_layer = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let dir = &config.logging.file_dir;
                let prefix = &config.logging.file_prefix;
                let appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
                    LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
                    LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
                };
                let (non_blocking, g) = tracing_appender::non_blocking(appender);
                guard = Some(g);
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
            }
            Err(e) => {
                // Fall back to non-file logging
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}
