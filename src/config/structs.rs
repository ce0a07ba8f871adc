use serde::{Deserialize, Serialize};

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "snaplink.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - registry: 活跃链接上限、默认有效期、短码长度、过期扫描间隔
/// - privacy: 点击记录中的 IP 掩码与固定地区
/// - event_log: 事件日志环形缓冲区容量
/// - storage: 存储后端
/// - redirect: 短链接前缀与跳转延迟
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub privacy: PrivacyConfig,
    #[serde(default)]
    pub event_log: EventLogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > snaplink.toml > 默认值
    /// ENV 前缀：SNAPLINK，分隔符：__
    /// 示例：SNAPLINK__REGISTRY__MAX_ACTIVE_LINKS=10
    pub fn load() -> Self {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: &str) -> Self {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SNAPLINK")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// Registry limits and timings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    #[serde(default = "default_max_active_links")]
    pub max_active_links: usize,
    #[serde(default = "default_ttl_minutes")]
    pub default_ttl_minutes: u32,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// Attempts at drawing an unused generated code; custom codes are never retried
    #[serde(default = "default_generated_code_attempts")]
    pub generated_code_attempts: u32,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// What a click record is allowed to say about the visitor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivacyConfig {
    #[serde(default = "default_masked_ip")]
    pub masked_ip: String,
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
    #[serde(default = "default_compliance")]
    pub compliance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLogConfig {
    #[serde(default = "default_event_log_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// "file" or "memory"
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedirectConfig {
    #[serde(default = "default_base_origin")]
    pub base_origin: String,
    #[serde(default = "default_redirect_delay_ms")]
    pub delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_max_active_links() -> usize {
    5
}

fn default_ttl_minutes() -> u32 {
    30
}

fn default_code_length() -> usize {
    6
}

fn default_generated_code_attempts() -> u32 {
    5
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_masked_ip() -> String {
    "xxx.xxx.xxx.xxx".to_string()
}

fn default_jurisdiction() -> String {
    "India".to_string()
}

fn default_compliance() -> String {
    "local-data-residency".to_string()
}

fn default_event_log_capacity() -> usize {
    1000
}

fn default_storage_backend() -> String {
    "file".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_base_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_redirect_delay_ms() -> u64 {
    1500
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_active_links: default_max_active_links(),
            default_ttl_minutes: default_ttl_minutes(),
            code_length: default_code_length(),
            generated_code_attempts: default_generated_code_attempts(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            masked_ip: default_masked_ip(),
            jurisdiction: default_jurisdiction(),
            compliance: default_compliance(),
        }
    }
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            capacity: default_event_log_capacity(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            base_origin: default_base_origin(),
            delay_ms: default_redirect_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
