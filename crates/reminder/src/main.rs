//! Reminder bot binary.
//!
//! Start the bot with:
//! ```bash
//! cargo run -p reminder -- --config-dir config
//! ```

mod bootstrap;

use std::path::PathBuf;

use clap::Parser;
use reminder_core::DEFAULT_CONFIG_DIR;
use reminder_runtime::{ReminderJob, Runtime};
use tracing_subscriber::EnvFilter;

/// Task reminder bot - posts due and overdue tasks to a chat group every day
#[derive(Parser, Debug)]
#[command(name = "reminder")]
#[command(about = "Posts a daily task deadline summary to a chat webhook")]
struct Args {
    /// Directory holding config.toml and members.csv
    #[arg(short, long, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Run the pipeline once now and exit
    #[arg(long)]
    once: bool,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Environment overrides from the config directory first, then the working directory
    let _ = dotenvy::from_path(args.config_dir.join(".env"));
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "reminder=info,reminder_core=info,reminder_notify=info,reminder_runtime=info",
        1 => "reminder=debug,reminder_core=debug,reminder_notify=debug,reminder_runtime=debug",
        2 => "reminder=trace,reminder_core=trace,reminder_notify=trace,reminder_runtime=trace,reqwest=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = match bootstrap::build(&args.config_dir) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(config_dir = %args.config_dir.display(), error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    if args.once {
        let outcome = app.pipeline.run().await?;
        tracing::info!(outcome = ?outcome, "Single run finished");
        return Ok(());
    }

    let mut runtime = Runtime::new(app.runtime_config, app.pipeline)?;
    runtime.start()?;

    println!("\nReminder bot running");
    println!("   Press Ctrl+C to stop\n");

    tokio::signal::ctrl_c().await?;
    runtime.shutdown().await?;

    Ok(())
}
