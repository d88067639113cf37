use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use herald_gateway::{Config, DiscordGateway, Host, builtin};

/// Herald - Discord bot host with manifest-driven handler dispatch
#[derive(Parser)]
#[command(name = "herald", version, about)]
struct Cli {
    /// Path to the config file (default: ~/.config/herald/herald.toml)
    #[arg(short, long, env = "HERALD_CONFIG")]
    config: Option<PathBuf>,

    /// Base handler tree
    #[arg(long, env = "HERALD_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Extensions root
    #[arg(long, env = "HERALD_EXTENSIONS_DIR")]
    extensions_dir: Option<PathBuf>,

    /// Reject duplicate handler keys instead of overwriting
    #[arg(long)]
    strict: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the handler trees and print load counts without connecting
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,herald_gateway=info",
        1 => "info,herald_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let started = Instant::now();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_dir) = cli.base_dir {
        config.base_dir = base_dir;
    }
    if let Some(extensions_dir) = cli.extensions_dir {
        config.extensions_dir = extensions_dir;
    }
    if cli.strict {
        config.strict_registration = true;
    }

    tracing::info!(
        base = %config.base_dir.display(),
        extensions = %config.extensions_dir.display(),
        strict = config.strict_registration,
        "starting herald gateway"
    );

    let host = Arc::new(Host::new(&config, builtin::catalog(started)));
    let counts = host.load_all().await;

    if let Some(Command::Check) = cli.command {
        println!("Loaded: {counts}");
        return Ok(());
    }

    // The only fatal startup path: no credentials to connect with
    let Some(token) = config.token.clone() else {
        anyhow::bail!("no bot token configured (set {})", herald_gateway::config::TOKEN_ENV);
    };

    DiscordGateway::new(token, host).run().await?;

    tracing::info!("herald gateway stopped");
    Ok(())
}
