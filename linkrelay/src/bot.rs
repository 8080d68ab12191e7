use async_trait::async_trait;
use common::{GatewayError, GatewayResult, MessageEvent, SenderProfile, WorkspaceGateway};
use teloxide::prelude::*;
use teloxide::types::{Message, UserId};

/// Telegram 网关
///
/// 在 teloxide 的 Bot 上实现身份查询、引用链接解析和消息发送。
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl WorkspaceGateway for TelegramGateway {
    async fn sender_profile(
        &self,
        channel_id: &str,
        sender_id: &str,
    ) -> GatewayResult<SenderProfile> {
        let chat_id = parse_chat_id(channel_id)?;
        let user_id: u64 = sender_id
            .parse()
            .map_err(|_| GatewayError::new(format!("Invalid sender id: {}", sender_id)))?;

        let member = self
            .bot
            .get_chat_member(chat_id, UserId(user_id))
            .await
            .map_err(|e| GatewayError::with_source("User info lookup failed", e.to_string()))?;

        Ok(SenderProfile {
            display_name: member.user.full_name(),
            // Telegram 不暴露邮箱，展示层会使用占位符
            email: None,
            is_bot: member.user.is_bot,
        })
    }

    async fn message_permalink(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> GatewayResult<String> {
        // 超级群的内部 ID 带 -100 前缀，去掉后可以构造 t.me/c 链接；
        // 其余会话没有稳定引用，返回错误由上层降级处理
        let internal_id = channel_id.strip_prefix("-100").ok_or_else(|| {
            GatewayError::new(format!(
                "Permalink is only available for supergroups, got chat {}",
                channel_id
            ))
        })?;

        Ok(format!("https://t.me/c/{}/{}", internal_id, message_id))
    }

    async fn post_notification(&self, channel_id: &str, text: &str) -> GatewayResult<()> {
        let chat_id = parse_chat_id(channel_id)?;
        self.bot
            .send_message(chat_id, text)
            .await
            .map_err(|e| GatewayError::with_source("Failed to send message", e.to_string()))?;
        Ok(())
    }
}

fn parse_chat_id(channel_id: &str) -> GatewayResult<ChatId> {
    channel_id
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| GatewayError::new(format!("Invalid chat id: {}", channel_id)))
}

/// 把 Telegram 消息转换成平台无关的消息事件
///
/// 消息作者是机器人、或消息经由内联机器人发出时，都视为自动化来源。
pub fn event_from_message(msg: &Message) -> MessageEvent {
    let from_bot = msg.from.as_ref().is_some_and(|user| user.is_bot) || msg.via_bot.is_some();

    MessageEvent {
        text: msg.text().map(|text| text.to_string()),
        sender_id: msg.from.as_ref().map(|user| user.id.to_string()),
        channel_id: msg.chat.id.to_string(),
        message_id: msg.id.0.to_string(),
        from_bot,
    }
}
