use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::{Context, Result};
use clap::{self, Parser, ValueEnum};
use env_logger::Env;
use tokio::task;

use efhotel::{add_data, drop_data, get_config, write_report, Config, HotelContext};

/// Operations the CLI can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Command {
    /// Insert the demonstration hotels
    Add,
    /// Print every hotel as Markdown
    Query,
    /// Delete all rows from all tables
    Drop,
}

#[derive(Parser)]
#[command(name = "EF Hotel")]
#[command(about = "Seed, list and clear a hotel database", long_about = None)]
struct Cli {
    /// Operation to run
    #[arg(value_enum)]
    command: Command,

    /// Settings file holding the connection string
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every database step to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    ExitCode::from(exit_status(dispatch(cli).await))
}

/// Log a failed run and map it to the process exit status.
fn exit_status(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{:#}", err);
            1
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = get_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let command = cli.command;

    // rusqlite calls block
    task::spawn_blocking(move || run(&config, command))
        .await
        .context("Database task failed")??;

    Ok(())
}

fn run(config: &Config, command: Command) -> Result<()> {
    let mut ctx = HotelContext::open(config).context("Failed to open database")?;
    log::debug!("Running {:?}", command);

    match command {
        Command::Add => {
            add_data(&mut ctx).context("Failed to add hotels")?;
            println!("Hotels added");
        }
        Command::Query => {
            let mut stdout = io::stdout().lock();
            write_report(&ctx, &mut stdout).context("Failed to query hotels")?;
        }
        Command::Drop => {
            drop_data(&mut ctx).context("Failed to drop hotels")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_command() {
        for (arg, expected) in [
            ("add", Command::Add),
            ("query", Command::Query),
            ("drop", Command::Drop),
        ] {
            let cli = Cli::try_parse_from(["efhotel", arg]).unwrap();
            assert_eq!(cli.command, expected);
            assert!(cli.config.is_none());
        }
    }

    #[test]
    fn missing_command_is_a_usage_error() {
        let err = Cli::try_parse_from(["efhotel"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn unknown_command_is_rejected() {
        let err = Cli::try_parse_from(["efhotel", "seed"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn failures_exit_with_status_one() {
        assert_eq!(exit_status(Ok(())), 0);
        assert_eq!(exit_status(Err(anyhow::anyhow!("database is locked"))), 1);
    }

    #[test]
    fn accepts_settings_file_and_verbosity() {
        let cli = Cli::try_parse_from(["efhotel", "-v", "--config", "other.toml", "query"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("other.toml")));
    }
}
