//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fanfou-relay")]
#[command(about = "Relay Telegram messages to Fanfou", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot and the callback server (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}
