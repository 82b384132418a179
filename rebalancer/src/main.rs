//! CLI entry point for the goalbook rebalancer.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use goalbook_rebalancer::config::Config;
use goalbook_rebalancer::error::Error;
use goalbook_rebalancer::run::{self, PlanOptions};

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Goal-based portfolio rebalancer: whole-share orders toward target weights")]
#[command(version)]
struct Cli {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show holdings, P/L and sector summary
    Holdings,

    /// Compute BUY/SELL/HOLD suggestions toward target weights
    Plan {
        /// Path to target.json (defaults to the current participation)
        #[arg(long)]
        target: Option<PathBuf>,

        /// Cash to add (negative to withdraw); overrides the config
        #[arg(long, allow_hyphen_values = true)]
        contribution: Option<f64>,

        /// Prompt for each target and the contribution
        #[arg(long)]
        interactive: bool,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare plans for several contribution amounts
    Sweep {
        /// Comma-separated contributions, e.g. 0,500,1000
        #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
        contributions: Vec<f64>,

        /// Path to target.json (defaults to the current participation)
        #[arg(long)]
        target: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Holdings => run::show_holdings(&config),
        Command::Plan {
            target,
            contribution,
            interactive,
            json,
        } => {
            let opts = PlanOptions {
                target,
                contribution,
                interactive,
                json,
            };
            run::run_plan(&config, &opts).map(|_| ())
        }
        Command::Sweep {
            contributions,
            target,
        } => run::run_sweep(&config, &contributions, target.as_deref()).map(|_| ()),
    };

    if let Err(e) = result {
        match &e {
            Error::Rebalance(_) => {
                eprintln!("\nAborted: {e}");
                process::exit(2);
            }
            Error::Aborted(msg) => {
                eprintln!("{msg}");
                process::exit(0);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}
