use common::DetectedLink;

/// 身份查询失败时的显示名占位符
pub const UNKNOWN_USER: &str = "Unknown User";
/// 平台不提供邮箱或查询失败时的占位符
pub const UNKNOWN_EMAIL: &str = "Unknown email";

/// 把检测事实渲染成固定模板的通知文本
///
/// 纯函数，无 I/O。缺失的补全字段用占位符替代而不是报错，
/// 链接字段在任何情况下都不会缺失。
pub fn format_notification(detected: &DetectedLink) -> String {
    let sender_name = detected.sender_name.as_deref().unwrap_or(UNKNOWN_USER);
    let sender_email = detected.sender_email.as_deref().unwrap_or(UNKNOWN_EMAIL);

    let mut lines = vec![
        "🔗 Link Detected".to_string(),
        format!("• Link: {}", detected.link),
        format!("• By: {} ({})", sender_name, sender_email),
        format!("• Original Message: \"{}\"", detected.raw_text),
        format!("• Channel: {}", detected.channel_id),
        format!("• Time: {}", detected.timestamp.format("%Y-%m-%d %H:%M:%S")),
    ];

    if let Some(permalink) = &detected.permalink {
        lines.push(format!("• Permalink: {}", permalink));
    }

    lines.join("\n")
}
