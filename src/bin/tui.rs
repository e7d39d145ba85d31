//! Clinic Booking - TUI Launcher
//!
//! Entry point for the clinic booking terminal client.

#[cfg(feature = "tui")]
use std::path::PathBuf;
#[cfg(feature = "tui")]
use std::sync::Arc;

#[cfg(feature = "tui")]
use anyhow::Context;
#[cfg(feature = "tui")]
use clap::Parser;
#[cfg(feature = "tui")]
use clinic_booking_sdk::{
    session::FileThemeStore,
    tui::{check_terminal_support, run_tui, utils::{default_log_path, init_logger}},
    ClinicClient, ClinicConfig, SessionStore,
};

#[cfg(feature = "tui")]
#[derive(Parser)]
#[command(name = "clinic-tui")]
#[command(about = "Clinic Booking Terminal User Interface")]
#[command(version)]
struct Args {
    /// Base URL of the clinic API (overrides config and CLINIC_API_URL)
    #[arg(short, long)]
    api_url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default log level when CLINIC_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Show help information
    #[arg(long)]
    help_mode: bool,
}

#[cfg(feature = "tui")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    if args.help_mode {
        println!("Clinic Booking TUI - browse doctors and book consultations");
        println!();
        println!("CONFIGURATION:");
        println!("  api_url is read from, in order of precedence:");
        println!("    --api-url, CLINIC_API_URL, --config <file>");
        println!("  Without --config, $CLINIC_CONFIG_DIR/clinic.toml is read (default config/clinic.toml)");
        println!("  Default: http://localhost:3000");
        println!();
        println!("USAGE:");
        println!("  cargo run --bin clinic-tui --features tui");
        println!("  cargo run --bin clinic-tui --features tui -- --api-url http://localhost:3000");
        println!();
        println!("CONTROLS:");
        println!("  F1-F9         - Menu entries");
        println!("  Tab/Shift+Tab - Move between form fields");
        println!("  Arrow keys    - Select in lists");
        println!("  Enter         - Open/submit");
        println!("  Esc           - Go back");
        println!("  Ctrl+T        - Toggle theme");
        println!("  Ctrl+Q        - Quit application");
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => ClinicConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ClinicConfig::load().context("Failed to load config")?,
    };
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    config.validate().context("Invalid configuration")?;

    let log_path = default_log_path();
    init_logger(&log_path, &args.log_level).context("Failed to initialize logging")?;
    tracing::info!("Connecting to {}", config.api_url);

    check_terminal_support().context("Terminal not supported")?;

    let session = SessionStore::new(Arc::new(FileThemeStore::new(config.preferences_file())));
    let client = ClinicClient::new(config).context("Failed to create API client")?;

    run_tui(Arc::new(client), session)
        .await
        .context("TUI exited with an error")?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn main() {
    eprintln!("TUI feature is not enabled. Please run with: cargo run --bin clinic-tui --features tui");
    std::process::exit(1);
}
