mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use fairdraw_core::{DrawError, DrawService, ErrorKind};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fairdraw")]
#[command(about = "Provably fair random numbers with verifiable keys")]
#[command(version)]
struct Cli {
    /// Data directory for the draw database
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a random number in [min, max]
    Draw {
        /// Minimum (inclusive)
        #[arg(allow_hyphen_values = true)]
        min: String,
        /// Maximum (inclusive)
        #[arg(allow_hyphen_values = true)]
        max: String,
        /// Identifier of the requesting user
        #[arg(short, long)]
        owner: Option<String>,
    },
    /// Reveal and verify a draw by its key
    Verify {
        /// Verification key
        key: String,
    },
    /// Recompute a draw offline from its disclosed values
    Check {
        /// Seed (hex string)
        #[arg(short, long)]
        secret: String,
        /// Minimum used for the draw
        #[arg(long, allow_hyphen_values = true)]
        min: String,
        /// Maximum used for the draw
        #[arg(long, allow_hyphen_values = true)]
        max: String,
        /// Reported result to compare against
        #[arg(short, long, allow_hyphen_values = true)]
        result: Option<i64>,
        /// Published seed hash to compare against
        #[arg(short, long)]
        commitment: Option<String>,
    },
    /// Show the draw history of a user
    History {
        /// Identifier of the user
        #[arg(short, long)]
        owner: String,
        /// Maximum number of draws to show
        #[arg(short, long, default_value_t = 50)]
        limit: u32,
    },
    /// Administrative history management
    #[command(subcommand)]
    Admin(commands::AdminCommands),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "fairdraw={},fairdraw_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Offline check needs no storage
    if let Commands::Check {
        secret,
        min,
        max,
        result,
        commitment,
    } = &cli.command
    {
        match commands::check_draw(secret, min, max, *result, commitment.clone(), cli.json) {
            Ok(true) => return Ok(()),
            Ok(false) => std::process::exit(2),
            Err(e) => report_error(&e),
        }
    }

    let config = CliConfig::load(cli.data_dir)?;
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let service = match DrawService::open(&config.data_dir, config.engine.clone()).await {
        Ok(service) => service,
        Err(e) => report_error(&e),
    };

    let json = cli.json;
    let result = match cli.command {
        Commands::Draw { min, max, owner } => {
            commands::create_draw(&service, &min, &max, owner, json).await
        }
        Commands::Verify { key } => commands::verify_draw(&service, &key, json).await,
        Commands::History { owner, limit } => {
            commands::show_history(&service, &owner, limit, json).await
        }
        Commands::Admin(cmd) => commands::handle_admin_command(cmd, &service, json).await,
        Commands::Check { .. } => Ok(()),
    };

    if let Err(e) = result {
        report_error(&e);
    }

    Ok(())
}

fn report_error(e: &DrawError) -> ! {
    tracing::debug!("Command failed: {:?}", e);

    eprintln!("Error [{}]: {}", e.kind(), e);
    match e.kind() {
        ErrorKind::NotFound => {
            eprintln!("Check the key for typos; keys never contain 0, O, I or l.");
        }
        ErrorKind::StorageFailure => {
            eprintln!("The draw store is unavailable. Try again later.");
        }
        ErrorKind::KeyAllocationFailed => {
            eprintln!("No draw was recorded. Try again.");
        }
        _ => {}
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_draw_and_admin() {
        let cli = Cli::try_parse_from(["fairdraw", "--json", "draw", "1", "6", "--owner", "42"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Draw { ref min, ref max, owner: Some(ref o) } if min == "1" && max == "6" && o == "42"
        ));

        let cli = Cli::try_parse_from(["fairdraw", "admin", "list", "--page", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Admin(commands::AdminCommands::List { page: 2, per_page: 20 })
        ));
    }
}
