//! 长链接校验
//!
//! 只接受带主机名的绝对 http(s) URL，拒绝危险协议。

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
    MissingHost,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::MissingHost => write!(f, "URL must contain a host"),
        }
    }
}

impl std::error::Error for UrlValidationError {}

const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 校验长链接，返回解析后的 [`Url`]
///
/// 1. 非空
/// 2. 不是危险协议（javascript:, data:, file: 等）
/// 3. 能解析为绝对 URL，协议为 http 或 https
/// 4. 带主机名
pub fn validate_url(raw: &str) -> Result<Url, UrlValidationError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let lower = raw.to_lowercase();
    for proto in DANGEROUS_PROTOCOLS {
        if lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    // 相对路径、"not a url" 之类在这里失败
    let parsed = Url::parse(raw).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::InvalidProtocol(format!("{}:", other))),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/path?query=1").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("  https://www.google.com/search?q=go+lang  ").is_ok());
    }

    #[test]
    fn test_not_a_url() {
        assert!(matches!(
            validate_url("not a url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_url("/relative/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_dangerous_protocols() {
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
        assert!(matches!(
            validate_url("JAVASCRIPT:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
    }

    #[test]
    fn test_invalid_protocols() {
        assert_eq!(
            validate_url("ftp://example.com"),
            Err(UrlValidationError::InvalidProtocol("ftp:".to_string()))
        );
        assert!(matches!(
            validate_url("mailto:test@example.com"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn test_empty_url() {
        assert_eq!(validate_url(""), Err(UrlValidationError::EmptyUrl));
        assert_eq!(validate_url("   "), Err(UrlValidationError::EmptyUrl));
    }
}
