use std::sync::Arc;

use common::RelayOutcome;
use dotenv::dotenv;
use teloxide::Bot;
use teloxide::types::Message;

use crate::bot::{TelegramGateway, event_from_message};
use crate::cache::RecencyCache;
use crate::config::Config;
use crate::extractor::LinkExtractor;
use crate::handler::RelayHandler;

mod bot;
mod cache;
mod config;
mod extractor;
mod format;
mod handler;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let bot = Bot::from_env();

    let extractor =
        LinkExtractor::new(&config.link_domains).expect("Failed to build link pattern");
    let handler = Arc::new(RelayHandler::new(
        TelegramGateway::new(bot.clone()),
        extractor,
        RecencyCache::new(),
        config.target_channel,
    ));

    log::info!("Link relay bot started. Listening for messages...");

    teloxide::repl(bot, move |msg: Message| {
        let handler = Arc::clone(&handler);
        async move {
            let event = event_from_message(&msg);
            match handler.handle(&event).await {
                RelayOutcome::Forwarded { link } => {
                    log::debug!("Forwarded link from chat {}: {}", event.channel_id, link);
                }
                RelayOutcome::Skipped(reason) => {
                    log::debug!("Skipped message in chat {}: {:?}", event.channel_id, reason);
                }
                // 错误已在 handler 内部记录
                RelayOutcome::Failed(_) => {}
            }
            Ok(())
        }
    })
    .await;
}
