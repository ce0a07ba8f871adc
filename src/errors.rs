use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnaplinkError {
    ValidationFailed(Vec<String>),
    DuplicateShortCode(String),
    ConcurrencyLimitExceeded(usize),
    StorageUnavailable(String),
    Serialization(String),
    NotFound(String),
    Config(String),
}

impl SnaplinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SnaplinkError::ValidationFailed(_) => "E001",
            SnaplinkError::DuplicateShortCode(_) => "E002",
            SnaplinkError::ConcurrencyLimitExceeded(_) => "E003",
            SnaplinkError::StorageUnavailable(_) => "E004",
            SnaplinkError::Serialization(_) => "E005",
            SnaplinkError::NotFound(_) => "E006",
            SnaplinkError::Config(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SnaplinkError::ValidationFailed(_) => "Validation Failed",
            SnaplinkError::DuplicateShortCode(_) => "Duplicate Short Code",
            SnaplinkError::ConcurrencyLimitExceeded(_) => "Concurrency Limit Exceeded",
            SnaplinkError::StorageUnavailable(_) => "Storage Unavailable",
            SnaplinkError::Serialization(_) => "Serialization Error",
            SnaplinkError::NotFound(_) => "Resource Not Found",
            SnaplinkError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> String {
        match self {
            SnaplinkError::ValidationFailed(errors) => errors.join("; "),
            SnaplinkError::DuplicateShortCode(code) => {
                format!("Short code '{}' is already in use", code)
            }
            SnaplinkError::ConcurrencyLimitExceeded(limit) => format!(
                "At most {} links may be active at once; wait for one to expire or delete one",
                limit
            ),
            SnaplinkError::StorageUnavailable(msg) => msg.clone(),
            SnaplinkError::Serialization(msg) => msg.clone(),
            SnaplinkError::NotFound(msg) => msg.clone(),
            SnaplinkError::Config(msg) => msg.clone(),
        }
    }

    /// Every violated rule when this is a validation failure, empty otherwise
    pub fn violations(&self) -> &[String] {
        match self {
            SnaplinkError::ValidationFailed(errors) => errors,
            _ => &[],
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
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

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SnaplinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SnaplinkError {}

// 便捷的构造函数
impl SnaplinkError {
    pub fn validation_failed<I, T>(errors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        SnaplinkError::ValidationFailed(errors.into_iter().map(Into::into).collect())
    }

    pub fn duplicate_short_code<T: Into<String>>(code: T) -> Self {
        SnaplinkError::DuplicateShortCode(code.into())
    }

    pub fn concurrency_limit_exceeded(limit: usize) -> Self {
        SnaplinkError::ConcurrencyLimitExceeded(limit)
    }

    pub fn storage_unavailable<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::StorageUnavailable(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Serialization(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::NotFound(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Config(msg.into())
    }
}

impl From<std::io::Error> for SnaplinkError {
    fn from(err: std::io::Error) -> Self {
        SnaplinkError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for SnaplinkError {
    fn from(err: serde_json::Error) -> Self {
        SnaplinkError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnaplinkError>;
