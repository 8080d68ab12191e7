use anyhow::{Context, Result, bail};
use common::get_env_var;

use crate::extractor::DEFAULT_LINK_DOMAINS;

/// 运行配置，全部来自环境变量
///
/// 机器人凭证由 `TELOXIDE_TOKEN` 提供，直接被 `Bot::from_env` 消费；
/// 日志级别由 `RUST_LOG` 控制。
#[derive(Debug, Clone)]
pub struct Config {
    /// 通知的目标频道（数字形式的 chat id）
    pub target_channel: String,
    /// 链接域名白名单
    pub link_domains: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let target_channel =
            get_env_var("TARGET_CHANNEL_ID").context("TARGET_CHANNEL_ID is not set")?;
        target_channel
            .parse::<i64>()
            .context("TARGET_CHANNEL_ID must be a numeric chat id")?;

        // 逗号分隔的域名列表，未设置时使用内置白名单
        let link_domains: Vec<String> = match get_env_var("LINK_DOMAINS") {
            Some(raw) => raw
                .split(',')
                .map(|domain| domain.trim().to_ascii_lowercase())
                .filter(|domain| !domain.is_empty())
                .collect(),
            None => DEFAULT_LINK_DOMAINS.iter().map(|d| d.to_string()).collect(),
        };
        if link_domains.is_empty() {
            bail!("LINK_DOMAINS must contain at least one domain");
        }

        Ok(Self {
            target_channel,
            link_domains,
        })
    }
}
