use std::borrow::Cow;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use url::Url;

/// 默认的会议/聊天平台域名白名单
///
/// 可通过 `LINK_DOMAINS` 环境变量覆盖。
pub const DEFAULT_LINK_DOMAINS: &[&str] = &[
    "zoom.us",
    "meet.google.com",
    "teams.microsoft.com",
    "teams.live.com",
    "webex.com",
    "meet.jit.si",
    "whereby.com",
    "discord.gg",
    "slack.com",
];

static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();

/// 链接提取器
///
/// 纯函数式组件：输入消息正文，输出第一个命中白名单的链接。
/// 同一条消息里的后续链接会被忽略（已知限制，按原样保留）。
pub struct LinkExtractor {
    regex: Regex,
    domains: Vec<String>,
}

impl LinkExtractor {
    /// 根据域名白名单编译匹配模式
    ///
    /// 所有域名族都支持子域名通配，匹配不区分大小写。
    pub fn new(domains: &[String]) -> Result<Self> {
        let domains: Vec<String> = domains.iter().map(|d| d.to_ascii_lowercase()).collect();
        let alternation = domains
            .iter()
            .map(|d| regex::escape(d))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(
            r"(?i)https?://(?:[a-z0-9-]+\.)*(?:{})[^\s<>|]*",
            alternation
        );
        let regex = Regex::new(&pattern)?;
        Ok(Self { regex, domains })
    }

    /// 提取正文中第一个命中白名单的链接
    ///
    /// 返回的子串保持原样，不做大小写、尾部标点或查询串的规范化，
    /// 以保证去重时的精确字符串匹配。
    pub fn extract(&self, text: &str) -> Option<String> {
        if text.is_empty() {
            return None;
        }

        let normalized = strip_link_markup(text);

        // 按出现顺序扫描，用 host 校验排除仅包含白名单域名的冒充主机
        for candidate in self.regex.find_iter(&normalized) {
            if let Ok(url) = Url::parse(candidate.as_str()) {
                if url.host_str().is_some_and(|host| self.host_allowed(host)) {
                    return Some(candidate.as_str().to_string());
                }
            }
        }

        None
    }

    fn host_allowed(&self, host: &str) -> bool {
        self.domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)))
    }
}

/// 去掉平台的尖括号链接标记
///
/// `<url>` 和 `<url|显示文本>` 都还原成裸 URL。
fn strip_link_markup(text: &str) -> Cow<'_, str> {
    let regex = MARKUP_REGEX.get_or_init(|| {
        Regex::new(r"<(https?://[^>|\s]+)(?:\|[^>]*)?>").expect("Invalid markup regex pattern")
    });
    regex.replace_all(text, "$1")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> LinkExtractor {
        let domains: Vec<String> = DEFAULT_LINK_DOMAINS.iter().map(|d| d.to_string()).collect();
        LinkExtractor::new(&domains).unwrap()
    }

    #[test]
    fn test_extract_no_link() {
        let extractor = extractor();

        // 没有任何链接
        assert_eq!(extractor.extract("meeting at 3pm"), None);
        // 空字符串
        assert_eq!(extractor.extract(""), None);
        // 有链接但不在白名单内
        assert_eq!(extractor.extract("see https://example.com/page"), None);
        assert_eq!(
            extractor.extract("docs: https://docs.rs/regex/latest"),
            None
        );
    }

    #[test]
    fn test_extract_first_match() {
        let extractor = extractor();

        let text = "join https://zoom.us/j/123 or https://meet.google.com/abc-defg";
        assert_eq!(
            extractor.extract(text),
            Some("https://zoom.us/j/123".to_string())
        );

        // 白名单外的链接在前，白名单内的链接在后
        let text = "notes https://example.com/notes then https://meet.google.com/abc-defg";
        assert_eq!(
            extractor.extract(text),
            Some("https://meet.google.com/abc-defg".to_string())
        );
    }

    #[test]
    fn test_extract_subdomain_and_case() {
        let extractor = extractor();

        assert_eq!(
            extractor.extract("https://us02web.zoom.us/j/987654"),
            Some("https://us02web.zoom.us/j/987654".to_string())
        );

        // 大小写不敏感匹配，返回原样子串
        assert_eq!(
            extractor.extract("HTTPS://ZOOM.US/j/1"),
            Some("HTTPS://ZOOM.US/j/1".to_string())
        );
    }

    #[test]
    fn test_extract_strips_markup() {
        let extractor = extractor();

        assert_eq!(
            extractor.extract("<https://meet.google.com/abc-defg|Join>"),
            Some("https://meet.google.com/abc-defg".to_string())
        );
        assert_eq!(
            extractor.extract("call here <https://zoom.us/j/123>"),
            Some("https://zoom.us/j/123".to_string())
        );
    }

    #[test]
    fn test_extract_rejects_impostor_host() {
        let extractor = extractor();

        // 主机名仅以白名单域名开头，实际注册域不同
        assert_eq!(extractor.extract("https://zoom.us.evil.com/j/123"), None);
        assert_eq!(extractor.extract("https://notzoom.us/j/123"), None);
    }
}
