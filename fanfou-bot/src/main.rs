//! fanfou-relay: run the Telegram relay bot and its OAuth callback server.

use anyhow::Result;
use clap::Parser;
use fanfou_bot::cli::{Cli, Commands};
use fanfou_bot::{run_bot, BotConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
    }
}
