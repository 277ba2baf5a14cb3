// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! QuotaWatch CLI - Claude usage quota monitoring from the command line.
//!
//! # Examples
//!
//! ```bash
//! # One-time setup with a session key
//! quotawatch setup
//!
//! # Show current usage (default command)
//! quotawatch
//!
//! # Bypass the cache
//! quotawatch status --force
//!
//! # JSON output for scripting
//! quotawatch status --json
//!
//! # Poll continuously with notifications
//! quotawatch watch --interval 120
//!
//! # Remove the stored session key
//! quotawatch clear
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::time::{interval, Duration};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quotawatch_api::ApiClient;
use quotawatch_app::{AppModel, NotificationService, SystemNotificationSink, UsageService};
use quotawatch_core::{
    UsageSnapshot, UsageWindow, MAX_REFRESH_INTERVAL_SECS, MIN_REFRESH_INTERVAL_SECS,
};
use quotawatch_store::{
    default_config_dir, KeyringStore, SecretStore, SettingsStore, UsageCache,
};

// ============================================================================
// CLI Definition
// ============================================================================

/// QuotaWatch CLI - Claude usage quota monitoring.
#[derive(Parser)]
#[command(name = "quotawatch")]
#[command(about = "Claude usage quota monitoring CLI")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'status' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration directory override.
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Validate and store a session key.
    Setup(SetupArgs),

    /// Show current usage (default if no command specified).
    #[command(visible_alias = "s")]
    Status(StatusArgs),

    /// Poll usage continuously and emit threshold notifications.
    #[command(visible_alias = "w")]
    Watch(WatchArgs),

    /// Remove the stored session key and cached organization.
    Clear,
}

/// Arguments for the setup command.
#[derive(Args)]
pub struct SetupArgs {
    /// Session key. Prompted for interactively when omitted.
    #[arg(long)]
    pub key: Option<String>,
}

/// Arguments for the status command.
#[derive(Args, Default)]
pub struct StatusArgs {
    /// Bypass the cache and fetch fresh data.
    #[arg(long, short)]
    pub force: bool,

    /// JSON output for scripting.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds. Defaults to the configured interval.
    #[arg(long, short)]
    pub interval: Option<u64>,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("quotawatch=debug,info")
    } else {
        EnvFilter::new("quotawatch=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Wiring
// ============================================================================

/// Builds the app model with production collaborators.
async fn build_model(cli: &Cli) -> Result<Arc<AppModel>> {
    let config_dir = cli.config_dir.clone().unwrap_or_else(default_config_dir);

    let settings_store = Arc::new(SettingsStore::load(config_dir).await);
    let cache = Arc::new(UsageCache::new());
    let secret_store: Arc<dyn SecretStore> = Arc::new(KeyringStore::new());
    let executor = Arc::new(ApiClient::new().context("failed to build HTTP client")?);

    let service = Arc::new(UsageService::new(
        executor,
        cache.clone(),
        secret_store.clone(),
        settings_store.clone(),
    ));
    let notifications = Arc::new(NotificationService::new(
        settings_store.clone(),
        Arc::new(SystemNotificationSink),
    ));

    Ok(Arc::new(AppModel::new(
        service,
        notifications,
        secret_store,
        settings_store,
        cache,
    )))
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let model = build_model(&cli).await?;

    let result = match &cli.command {
        Some(Commands::Setup(args)) => run_setup(&model, args).await,
        Some(Commands::Status(args)) => run_status(&model, args).await,
        Some(Commands::Watch(args)) => run_watch(&model, args).await,
        Some(Commands::Clear) => run_clear(&model).await,
        None => run_status(&model, &StatusArgs::default()).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

/// Runs the setup command.
async fn run_setup(model: &AppModel, args: &SetupArgs) -> Result<()> {
    let raw = match &args.key {
        Some(key) => key.clone(),
        None => prompt_for_key()?,
    };

    model.validate_and_save_session_key(&raw).await?;
    println!("Session key saved. Setup complete.");

    if let Some(snapshot) = model.usage().await {
        println!();
        print_snapshot(&snapshot, false);
    }
    Ok(())
}

fn prompt_for_key() -> Result<String> {
    print!("Paste your Claude session key (sk-ant-...): ");
    io::stdout().flush()?;

    let mut raw = String::new();
    io::stdin()
        .read_line(&mut raw)
        .context("failed to read session key from stdin")?;
    Ok(raw)
}

/// Runs the status command.
async fn run_status(model: &AppModel, args: &StatusArgs) -> Result<()> {
    model.bootstrap().await;

    if !model.is_setup_complete().await {
        bail!("No session key found. Run `quotawatch setup` first.");
    }

    if args.force {
        model.refresh_usage(true).await;
    }

    let Some(snapshot) = model.usage().await else {
        let message = model
            .error_message()
            .await
            .unwrap_or_else(|| "No usage data available.".to_string());
        bail!(message);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        let show_sonnet = model.settings().await.show_sonnet_usage;
        print_snapshot(&snapshot, show_sonnet);
    }
    Ok(())
}

/// Runs the watch command.
async fn run_watch(model: &AppModel, args: &WatchArgs) -> Result<()> {
    model.bootstrap().await;

    if !model.is_setup_complete().await {
        bail!("No session key found. Run `quotawatch setup` first.");
    }

    let settings = model.settings().await;
    let secs = args
        .interval
        .unwrap_or(settings.refresh_interval_secs)
        .clamp(MIN_REFRESH_INTERVAL_SECS, MAX_REFRESH_INTERVAL_SECS);

    let mut ticker = interval(Duration::from_secs(secs));

    loop {
        ticker.tick().await;
        model.refresh_usage(false).await;

        // Clear screen
        print!("\x1b[2J\x1b[H");
        io::stdout().flush()?;

        let now = chrono::Local::now();
        println!(
            "QuotaWatch - {} (refresh: {secs}s)",
            now.format("%H:%M:%S")
        );
        println!("{}", "─".repeat(50));
        println!();

        match model.usage().await {
            Some(snapshot) => print_snapshot(&snapshot, settings.show_sonnet_usage),
            None => {
                let message = model
                    .error_message()
                    .await
                    .unwrap_or_else(|| "No usage data available.".to_string());
                println!("{message}");
            }
        }

        println!();
        println!("Press Ctrl+C to exit");
    }
}

/// Runs the clear command.
async fn run_clear(model: &AppModel) -> Result<()> {
    model.clear_session_key().await?;
    println!("Session key cleared.");
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

const BAR_WIDTH: usize = 20;

fn print_snapshot(snapshot: &UsageSnapshot, show_sonnet: bool) {
    println!("Status: {}", snapshot.primary_status());
    print_window("Session", &snapshot.session);
    print_window("Weekly", &snapshot.weekly);
    if show_sonnet {
        if let Some(sonnet) = &snapshot.sonnet {
            print_window("Sonnet", sonnet);
        }
    }
}

fn print_window(label: &str, window: &UsageWindow) {
    println!(
        "{label:<8} [{}] {:>5.1}%  resets {}",
        usage_bar(window.percentage()),
        window.percentage(),
        window.resets_at.format("%b %d %H:%M UTC")
    );
}

fn usage_bar(percentage: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_bar_boundaries() {
        assert_eq!(usage_bar(0.0), "░".repeat(BAR_WIDTH));
        assert_eq!(usage_bar(100.0), "█".repeat(BAR_WIDTH));
        assert_eq!(usage_bar(50.0).chars().filter(|c| *c == '█').count(), 10);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["quotawatch", "status", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Status(StatusArgs { force: true, .. }))
        ));

        let cli = Cli::try_parse_from(["quotawatch", "watch", "--interval", "120"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Watch(WatchArgs {
                interval: Some(120)
            }))
        ));

        let cli = Cli::try_parse_from(["quotawatch"]).unwrap();
        assert!(cli.command.is_none());
    }
}
