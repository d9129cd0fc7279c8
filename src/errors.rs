use std::fmt;

#[derive(Debug, Clone)]
pub enum ShortenerError {
    InvalidInput(String),
    NotFound(String),
    GenerationExhausted(String),
    StoreUnavailable(String),
    ChannelFull(String),
    Config(String),
    Io(String),
}

impl ShortenerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortenerError::InvalidInput(_) => "E001",
            ShortenerError::NotFound(_) => "E002",
            ShortenerError::GenerationExhausted(_) => "E003",
            ShortenerError::StoreUnavailable(_) => "E004",
            ShortenerError::ChannelFull(_) => "E005",
            ShortenerError::Config(_) => "E006",
            ShortenerError::Io(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortenerError::InvalidInput(_) => "Invalid Input",
            ShortenerError::NotFound(_) => "Resource Not Found",
            ShortenerError::GenerationExhausted(_) => "Shortcode Generation Exhausted",
            ShortenerError::StoreUnavailable(_) => "Store Unavailable",
            ShortenerError::ChannelFull(_) => "Click Channel Full",
            ShortenerError::Config(_) => "Configuration Error",
            ShortenerError::Io(_) => "I/O Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortenerError::InvalidInput(msg) => msg,
            ShortenerError::NotFound(msg) => msg,
            ShortenerError::GenerationExhausted(msg) => msg,
            ShortenerError::StoreUnavailable(msg) => msg,
            ShortenerError::ChannelFull(msg) => msg,
            ShortenerError::Config(msg) => msg,
            ShortenerError::Io(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortenerError {}

// 便捷的构造函数
impl ShortenerError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        ShortenerError::InvalidInput(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortenerError::NotFound(msg.into())
    }

    pub fn generation_exhausted<T: Into<String>>(msg: T) -> Self {
        ShortenerError::GenerationExhausted(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        ShortenerError::StoreUnavailable(msg.into())
    }

    pub fn channel_full<T: Into<String>>(msg: T) -> Self {
        ShortenerError::ChannelFull(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Config(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Io(msg.into())
    }
}

impl From<crate::storage::StoreError> for ShortenerError {
    fn from(err: crate::storage::StoreError) -> Self {
        use crate::storage::StoreError;
        match err {
            StoreError::NotFound(msg) => ShortenerError::NotFound(msg),
            other => ShortenerError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for ShortenerError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShortenerError::StoreUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for ShortenerError {
    fn from(err: std::io::Error) -> Self {
        ShortenerError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortenerError>;
