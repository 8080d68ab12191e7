use chrono::{DateTime, Local};

/// 入站消息事件（平台无关）
///
/// 由各平台适配层从 SDK 的消息类型转换而来。
#[derive(Debug, Clone)]
pub struct MessageEvent {
    /// 消息正文，可能缺失（贴纸、入群提示等）
    pub text: Option<String>,
    /// 发送者标识，可能缺失（频道匿名消息等）
    pub sender_id: Option<String>,
    /// 来源会话标识
    pub channel_id: String,
    /// 消息标识，用于构造固定引用链接
    pub message_id: String,
    /// 消息是否来自自动化来源（机器人）
    pub from_bot: bool,
}

/// 发送者资料，由身份查询补全
#[derive(Debug, Clone)]
pub struct SenderProfile {
    pub display_name: String,
    /// 部分平台不提供邮箱
    pub email: Option<String>,
    pub is_bot: bool,
}

/// 单次检测产生的事实集合
///
/// 仅在一个事件的处理过程中存在，不做任何持久化。
#[derive(Debug, Clone)]
pub struct DetectedLink {
    /// 原始消息正文
    pub raw_text: String,
    /// 提取出的链接子串，保持原样不做规范化
    pub link: String,
    /// 来源会话标识
    pub channel_id: String,
    /// 发送者显示名，身份查询失败时缺失
    pub sender_name: Option<String>,
    /// 发送者邮箱，平台不提供或查询失败时缺失
    pub sender_email: Option<String>,
    /// 指向原始消息的固定引用链接，解析失败时缺失
    pub permalink: Option<String>,
    /// 捕获时间，仅用于展示
    pub timestamp: DateTime<Local>,
}

/// 单个事件的处理结果
///
/// 每个分支都是显式结果，便于独立测试和观察。
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    /// 事件被静默跳过
    Skipped(SkipReason),
    /// 通知已转发，链接已记录
    Forwarded { link: String },
    /// 处理过程中出现意外错误，事件被丢弃
    Failed(String),
}

/// 跳过事件的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 消息没有正文
    NoText,
    /// 发送者是自动化来源
    AutomatedSender,
    /// 正文中没有命中白名单的链接
    NoLink,
    /// 链接近期已转发过
    Duplicate,
}

/// 统一的网关错误类型
#[derive(Debug, Clone)]
pub struct GatewayError {
    pub message: String,
    pub source: Option<String>,
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {}", self.message, source),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for GatewayError {}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl From<anyhow::Error> for GatewayError {
    fn from(error: anyhow::Error) -> Self {
        GatewayError::new(error.to_string())
    }
}

/// 统一的网关结果类型别名
pub type GatewayResult<T> = Result<T, GatewayError>;

/// 工作区网关契约
///
/// 把身份查询、引用链接解析和消息发送隔离在核心逻辑之外，
/// 每个调用都可能独立失败，调用方自行决定降级策略。
#[async_trait::async_trait]
pub trait WorkspaceGateway: Send + Sync {
    /// 查询发送者资料
    async fn sender_profile(
        &self,
        channel_id: &str,
        sender_id: &str,
    ) -> GatewayResult<SenderProfile>;

    /// 解析指向某条消息的固定引用链接
    async fn message_permalink(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> GatewayResult<String>;

    /// 向目标频道发送通知文本
    async fn post_notification(&self, channel_id: &str, text: &str) -> GatewayResult<()>;
}
