use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use chrono::Local;
use common::{DetectedLink, MessageEvent, RelayOutcome, SkipReason, WorkspaceGateway};

use crate::cache::RecencyCache;
use crate::extractor::LinkExtractor;
use crate::format::{UNKNOWN_USER, format_notification};

/// 转发编排器
///
/// 持有网关、提取器、去重缓存和目标频道，按固定顺序处理每个入站事件。
/// 缓存是唯一的跨事件共享状态，用互斥锁保护容量不变量，
/// 因为 SDK 可能并发投递事件。
pub struct RelayHandler<G: WorkspaceGateway> {
    gateway: G,
    extractor: LinkExtractor,
    cache: Mutex<RecencyCache>,
    target_channel: String,
}

impl<G: WorkspaceGateway> RelayHandler<G> {
    pub fn new(
        gateway: G,
        extractor: LinkExtractor,
        cache: RecencyCache,
        target_channel: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            extractor,
            cache: Mutex::new(cache),
            target_channel: target_channel.into(),
        }
    }

    /// 处理一条入站消息事件
    ///
    /// 任何意外错误都在这里捕获并记录，事件被丢弃，
    /// 绝不向上传播导致进程退出，也不做重试。
    pub async fn handle(&self, event: &MessageEvent) -> RelayOutcome {
        match self.process(event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!(
                    "Error relaying message {} in channel {}: {:#}",
                    event.message_id,
                    event.channel_id,
                    e
                );
                RelayOutcome::Failed(e.to_string())
            }
        }
    }

    async fn process(&self, event: &MessageEvent) -> Result<RelayOutcome> {
        // 过滤：无正文或自动化来源直接跳过
        let text = match event.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => return Ok(RelayOutcome::Skipped(SkipReason::NoText)),
        };
        if event.from_bot {
            return Ok(RelayOutcome::Skipped(SkipReason::AutomatedSender));
        }

        let Some(link) = self.extractor.extract(text) else {
            return Ok(RelayOutcome::Skipped(SkipReason::NoLink));
        };

        // 去重：全局范围，不区分频道和发送者
        if self.lock_cache().contains(&link) {
            log::info!("Duplicate link suppressed: {}", link);
            return Ok(RelayOutcome::Skipped(SkipReason::Duplicate));
        }

        // 尽力而为的身份补全，失败不阻断转发
        let profile = match &event.sender_id {
            Some(sender_id) => {
                match self
                    .gateway
                    .sender_profile(&event.channel_id, sender_id)
                    .await
                {
                    Ok(profile) => Some(profile),
                    Err(e) => {
                        log::warn!("Sender lookup failed for {}: {}", sender_id, e);
                        None
                    }
                }
            }
            None => None,
        };

        // 查到的身份是机器人时静默丢弃
        if profile.as_ref().is_some_and(|p| p.is_bot) {
            return Ok(RelayOutcome::Skipped(SkipReason::AutomatedSender));
        }

        let permalink = match self
            .gateway
            .message_permalink(&event.channel_id, &event.message_id)
            .await
        {
            Ok(permalink) => Some(permalink),
            Err(e) => {
                log::warn!(
                    "Permalink lookup failed for message {}: {}",
                    event.message_id,
                    e
                );
                None
            }
        };

        let detected = DetectedLink {
            raw_text: text.to_string(),
            link: link.clone(),
            channel_id: event.channel_id.clone(),
            sender_name: profile.as_ref().map(|p| p.display_name.clone()),
            sender_email: profile.as_ref().and_then(|p| p.email.clone()),
            permalink,
            timestamp: Local::now(),
        };

        let notification = format_notification(&detected);
        self.gateway
            .post_notification(&self.target_channel, &notification)
            .await
            .context("Failed to post notification")?;

        // 只有转发成功才记录，必要时淘汰最早的条目
        self.lock_cache().insert(link.clone());

        log::info!(
            "Relayed link from {}: {}",
            detected.sender_name.as_deref().unwrap_or(UNKNOWN_USER),
            link
        );
        Ok(RelayOutcome::Forwarded { link })
    }

    fn lock_cache(&self) -> MutexGuard<'_, RecencyCache> {
        // 缓存状态只是去重提示，锁中毒时直接取回继续用，进程不退出
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
