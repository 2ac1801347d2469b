//! REPL runner: converts each teloxide message to an InboundMessage and hands it to the
//! HandlerChain in its own task, so one slow or failing message never blocks another.

use handler_chain::HandlerChain;
use teloxide::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::TelegramMessageWrapper;

/// Runs the long-polling REPL until the dispatcher stops (e.g. Ctrl-C).
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> relay_core::Result<()> {
    let username = match bot.get_me().await {
        Ok(me) => {
            info!(username = ?me.user.username, "Bot identity resolved");
            me.user.username.clone()
        }
        Err(e) => {
            warn!(error = %e, "get_me failed, continuing");
            None
        }
    };

    let chain = handler_chain;
    teloxide::repl(bot, move |msg: Message| {
        let chain = chain.clone();
        let username = username.clone();
        async move {
            let inbound = TelegramMessageWrapper(&msg).to_inbound();
            if !inbound.content.is_addressed_to(username.as_deref()) {
                debug!(sender = %inbound.sender, "Command for another bot, skipping");
                return respond(());
            }
            info!(
                sender = %inbound.sender,
                message_id = %inbound.id,
                kind = %inbound.content.kind(),
                "Received message"
            );

            tokio::spawn(async move {
                if let Err(e) = chain.handle(&inbound).await {
                    error!(error = %e, sender = %inbound.sender, "Handler chain failed");
                }
            });
            respond(())
        }
    })
    .await;

    info!("Telegram REPL stopped");
    Ok(())
}
