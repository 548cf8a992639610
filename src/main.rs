//! Token Ledger CLI Application
//!
//! Deploys a ledger, lists development accounts and runs scripted sessions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use token_ledger::cli;
use token_ledger::deploy::DeployConfig;

#[derive(Parser)]
#[command(name = "ledger")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A fixed-supply fungible token ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a ledger and print the deployment record
    Deploy {
        #[command(flatten)]
        token: TokenArgs,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List development accounts
    Accounts {
        /// Number of accounts to list
        #[arg(short, long, default_value = "10")]
        count: u32,

        /// Generate a fresh random key pair instead
        #[arg(short, long)]
        generate: bool,
    },

    /// Deploy a ledger and run a JSON script of operations against it
    Run {
        /// Script file
        #[arg(short, long)]
        script: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Overrides for the ledger's constructor arguments
#[derive(clap::Args)]
struct TokenArgs {
    /// Token name
    #[arg(long)]
    name: Option<String>,

    /// Token symbol
    #[arg(long)]
    symbol: Option<String>,

    /// Decimal places
    #[arg(long)]
    decimals: Option<u8>,

    /// Initial (and total) supply
    #[arg(long)]
    supply: Option<u128>,
}

impl TokenArgs {
    fn apply(self, config: &mut DeployConfig) {
        if let Some(name) = self.name {
            config.token.name = name;
        }
        if let Some(symbol) = self.symbol {
            config.token.symbol = symbol;
        }
        if let Some(decimals) = self.decimals {
            config.token.decimals = decimals;
        }
        if let Some(supply) = self.supply {
            config.token.supply = supply;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy { token, json } => {
            let mut config = DeployConfig::from_env()?;
            token.apply(&mut config);
            cli::cmd_deploy(&config, json)?;
        }

        Commands::Accounts { count, generate } => {
            cli::cmd_accounts(count, generate)?;
        }

        Commands::Run { script, json } => {
            let config = DeployConfig::from_env()?;
            cli::cmd_run(&config, &script, json)?;
        }
    }

    Ok(())
}
