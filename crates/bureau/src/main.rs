// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bureau -- conversational support and intake bot for Telegram.
//!
//! Binary entry point.

mod serve;

use clap::{Parser, Subcommand};

/// Bureau -- conversational support and intake bot for Telegram.
#[derive(Parser, Debug)]
#[command(name = "bureau", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot: Telegram long polling plus the admin gateway.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match bureau_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            bureau_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(err) = serve::run_serve(config).await {
                eprintln!("bureau serve failed: {err}");
                std::process::exit(1);
            }
        }
        None => {
            println!("bureau: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Config loads with defaults, no config file needed.
        let config = bureau_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.bot.name, "bureau");
    }
}
