//! 日志系统模块
//!
//! 基于 tracing 生态实现启动套件的日志能力，包括：
//!
//! - 多级别日志支持（TRACE, DEBUG, INFO, WARN, ERROR）
//! - 结构化日志（JSON 格式输出）
//! - 文件日志输出（异步非阻塞，按时间轮转）
//! - 日志过滤（EnvFilter 指令）
//!
//! # 示例
//!
//! ```rust,no_run
//! use fries_web::utils::logger::{Logger, LoggerConfig, RotationStrategy};
//! use std::path::PathBuf;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LoggerConfig::builder()
//!         .level("debug")
//!         .file_output(PathBuf::from("./logs"))
//!         .rotation(RotationStrategy::Daily)
//!         .build();
//!
//!     let _guard = Logger::init(config)?;
//!     tracing::info!(accessor = "blog", "模块注册完成");
//!     Ok(())
//! }
//! ```

use crate::core::app::AppSettings;
use crate::utils::{CoreError, Result};
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// 日志轮转策略
// ============================================================================

/// 日志轮转策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationStrategy {
    /// 不轮转（单个日志文件）
    Never,
    /// 每小时轮转
    Hourly,
    /// 每天轮转（默认）
    #[default]
    Daily,
}

impl RotationStrategy {
    /// 转换为 tracing-appender 的 Rotation 类型
    fn to_rotation(self) -> Rotation {
        match self {
            RotationStrategy::Never => Rotation::NEVER,
            RotationStrategy::Hourly => Rotation::HOURLY,
            RotationStrategy::Daily => Rotation::DAILY,
        }
    }

    /// 从字符串解析轮转策略，无法识别时回退到默认值
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "never" | "none" => RotationStrategy::Never,
            "hourly" | "hour" => RotationStrategy::Hourly,
            _ => RotationStrategy::Daily,
        }
    }
}

impl std::fmt::Display for RotationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationStrategy::Never => write!(f, "never"),
            RotationStrategy::Hourly => write!(f, "hourly"),
            RotationStrategy::Daily => write!(f, "daily"),
        }
    }
}

// ============================================================================
// 日志配置
// ============================================================================

/// 日志系统配置
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// 默认日志级别（例如 "trace", "debug", "info", "warn", "error"）
    pub level: String,

    /// 是否使用 JSON 格式输出
    pub json_format: bool,

    /// 是否输出到控制台
    pub console_output: bool,

    /// 文件输出目录（None 表示不输出到文件）
    pub file_output: Option<PathBuf>,

    /// 日志文件名前缀
    pub file_prefix: String,

    /// 日志轮转策略
    pub rotation: RotationStrategy,

    /// 是否显示目标模块
    pub show_target: bool,

    /// 是否显示文件名和行号
    pub show_file_line: bool,

    /// 自定义过滤指令（EnvFilter 格式）
    /// 例如："fries_web=debug,fries_web::module=trace"
    pub filter_directives: Option<String>,

    /// 是否启用 ANSI 颜色（控制台输出）
    pub ansi_colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: None,
            file_prefix: "fries-web".to_string(),
            rotation: RotationStrategy::Daily,
            show_target: true,
            show_file_line: false,
            filter_directives: None,
            ansi_colors: true,
        }
    }
}

impl LoggerConfig {
    /// 创建配置构建器
    pub fn builder() -> LoggerConfigBuilder {
        LoggerConfigBuilder::new()
    }

    /// 从应用设置构建日志配置
    ///
    /// 读取 `app` 配置域并入设置后的以下键：
    /// `log_level`、`log_json`、`log_dir`、`log_rotation`。
    pub fn from_settings(settings: &AppSettings) -> Self {
        let mut config = Self::default();

        if let Some(level) = settings.get("log_level").and_then(|v| v.as_str()) {
            config.level = level.to_string();
        }
        config.json_format = settings.flag("log_json");
        if let Some(dir) = settings.get("log_dir").and_then(|v| v.as_str()) {
            config.file_output = Some(PathBuf::from(dir));
        }
        if let Some(rotation) = settings.get("log_rotation").and_then(|v| v.as_str()) {
            config.rotation = RotationStrategy::parse(rotation);
        }

        config
    }
}

/// 日志配置构建器
#[derive(Debug, Default)]
pub struct LoggerConfigBuilder {
    config: LoggerConfig,
}

impl LoggerConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
        }
    }

    /// 设置日志级别
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    /// 启用 JSON 格式输出
    pub fn json_format(mut self, enable: bool) -> Self {
        self.config.json_format = enable;
        self
    }

    /// 设置控制台输出
    pub fn console_output(mut self, enable: bool) -> Self {
        self.config.console_output = enable;
        self
    }

    /// 设置文件输出目录
    pub fn file_output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.file_output = Some(dir.into());
        self
    }

    /// 设置日志文件前缀
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    /// 设置轮转策略
    pub fn rotation(mut self, strategy: RotationStrategy) -> Self {
        self.config.rotation = strategy;
        self
    }

    /// 显示目标模块
    pub fn show_target(mut self, enable: bool) -> Self {
        self.config.show_target = enable;
        self
    }

    /// 显示文件名和行号
    pub fn show_file_line(mut self, enable: bool) -> Self {
        self.config.show_file_line = enable;
        self
    }

    /// 设置过滤指令
    pub fn filter_directives(mut self, directives: impl Into<String>) -> Self {
        self.config.filter_directives = Some(directives.into());
        self
    }

    /// 启用 ANSI 颜色
    pub fn ansi_colors(mut self, enable: bool) -> Self {
        self.config.ansi_colors = enable;
        self
    }

    /// 构建配置
    pub fn build(self) -> LoggerConfig {
        self.config
    }
}

// ============================================================================
// 日志守卫
// ============================================================================

/// 日志系统守卫
///
/// 持有非阻塞写入器的 WorkerGuard，确保在程序退出前完成日志写入。
pub struct LogGuard {
    _console_guard: Option<WorkerGuard>,
    _file_guard: Option<WorkerGuard>,
}

impl LogGuard {
    fn empty() -> Self {
        Self {
            _console_guard: None,
            _file_guard: None,
        }
    }

    fn with_console_guard(mut self, guard: WorkerGuard) -> Self {
        self._console_guard = Some(guard);
        self
    }

    fn with_file_guard(mut self, guard: WorkerGuard) -> Self {
        self._file_guard = Some(guard);
        self
    }
}

// ============================================================================
// 日志系统
// ============================================================================

/// 全局日志初始化状态
static LOGGER_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// 日志系统
///
/// 提供日志系统的初始化和管理功能
pub struct Logger;

impl Logger {
    /// 初始化日志系统
    ///
    /// # Arguments
    ///
    /// * `config` - 日志配置
    ///
    /// # Returns
    ///
    /// 返回 `LogGuard`，必须保持活动状态直到程序退出
    ///
    /// # Errors
    ///
    /// 如果日志系统已初始化或配置无效，返回错误
    pub fn init(config: LoggerConfig) -> Result<LogGuard> {
        if LOGGER_INITIALIZED.get().is_some() {
            return Err(CoreError::InitFailed(
                "日志系统已初始化，不能重复初始化".to_string(),
            ));
        }

        let env_filter = Self::create_env_filter(&config);

        let guard = if config.json_format {
            Self::init_json_logger(config, env_filter)?
        } else {
            Self::init_pretty_logger(config, env_filter)?
        };

        let _ = LOGGER_INITIALIZED.set(true);

        Ok(guard)
    }

    /// 尝试初始化日志系统（不会失败）
    ///
    /// 如果日志系统已初始化，返回空守卫而不是错误。适用于测试场景。
    pub fn try_init(config: LoggerConfig) -> LogGuard {
        Self::init(config).unwrap_or_else(|_| LogGuard::empty())
    }

    /// 使用默认配置初始化日志系统
    pub fn init_default() -> Result<LogGuard> {
        Self::init(LoggerConfig::default())
    }

    /// 创建 EnvFilter，环境变量 RUST_LOG 优先于配置级别
    fn create_env_filter(config: &LoggerConfig) -> EnvFilter {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.level));

        if let Some(ref directives) = config.filter_directives {
            directives.split(',').fold(filter, |f, directive| {
                f.add_directive(
                    directive
                        .trim()
                        .parse()
                        .unwrap_or_else(|_| config.level.parse().unwrap_or(Level::INFO.into())),
                )
            })
        } else {
            filter
        }
    }

    /// 初始化 JSON 格式日志
    fn init_json_logger(config: LoggerConfig, env_filter: EnvFilter) -> Result<LogGuard> {
        let mut guard = LogGuard::empty();

        let console_layer = if config.console_output {
            let (non_blocking, console_guard) = tracing_appender::non_blocking(io::stdout());
            guard = guard.with_console_guard(console_guard);

            Some(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_target(config.show_target)
                    .with_file(config.show_file_line)
                    .with_line_number(config.show_file_line)
                    .with_ansi(false), // JSON 格式不使用 ANSI 颜色
            )
        } else {
            None
        };

        let file_layer = if let Some(ref log_dir) = config.file_output {
            let file_appender = RollingFileAppender::new(
                config.rotation.to_rotation(),
                log_dir,
                &format!("{}.log", config.file_prefix),
            );

            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = guard.with_file_guard(file_guard);

            Some(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_target(config.show_target)
                    .with_file(config.show_file_line)
                    .with_line_number(config.show_file_line)
                    .with_ansi(false),
            )
        } else {
            None
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| CoreError::InitFailed(format!("日志系统初始化失败: {}", e)))?;

        Ok(guard)
    }

    /// 初始化 Pretty 格式日志
    fn init_pretty_logger(config: LoggerConfig, env_filter: EnvFilter) -> Result<LogGuard> {
        let mut guard = LogGuard::empty();

        let console_layer = if config.console_output {
            let (non_blocking, console_guard) = tracing_appender::non_blocking(io::stdout());
            guard = guard.with_console_guard(console_guard);

            Some(
                fmt::layer()
                    .with_writer(non_blocking)
                    .with_target(config.show_target)
                    .with_file(config.show_file_line)
                    .with_line_number(config.show_file_line)
                    .with_ansi(config.ansi_colors),
            )
        } else {
            None
        };

        let file_layer = if let Some(ref log_dir) = config.file_output {
            let file_appender = RollingFileAppender::new(
                config.rotation.to_rotation(),
                log_dir,
                &format!("{}.log", config.file_prefix),
            );

            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = guard.with_file_guard(file_guard);

            Some(
                fmt::layer()
                    .with_writer(non_blocking)
                    .with_target(config.show_target)
                    .with_file(config.show_file_line)
                    .with_line_number(config.show_file_line)
                    .with_ansi(false), // 文件不使用 ANSI
            )
        } else {
            None
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| CoreError::InitFailed(format!("日志系统初始化失败: {}", e)))?;

        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rotation_strategy_default() {
        assert_eq!(RotationStrategy::default(), RotationStrategy::Daily);
    }

    #[test]
    fn test_rotation_strategy_parse() {
        assert_eq!(RotationStrategy::parse("daily"), RotationStrategy::Daily);
        assert_eq!(RotationStrategy::parse("DAILY"), RotationStrategy::Daily);
        assert_eq!(RotationStrategy::parse("hourly"), RotationStrategy::Hourly);
        assert_eq!(RotationStrategy::parse("hour"), RotationStrategy::Hourly);
        assert_eq!(RotationStrategy::parse("never"), RotationStrategy::Never);
        assert_eq!(RotationStrategy::parse("none"), RotationStrategy::Never);
        // 无效值回退到默认值
        assert_eq!(RotationStrategy::parse("invalid"), RotationStrategy::Daily);
    }

    #[test]
    fn test_rotation_strategy_display() {
        assert_eq!(format!("{}", RotationStrategy::Never), "never");
        assert_eq!(format!("{}", RotationStrategy::Hourly), "hourly");
        assert_eq!(format!("{}", RotationStrategy::Daily), "daily");
    }

    #[test]
    fn test_logger_config_default() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert!(config.console_output);
        assert!(config.file_output.is_none());
        assert_eq!(config.file_prefix, "fries-web");
        assert_eq!(config.rotation, RotationStrategy::Daily);
    }

    #[test]
    fn test_logger_config_builder() {
        let config = LoggerConfig::builder()
            .level("debug")
            .json_format(true)
            .console_output(false)
            .file_output("/tmp/logs")
            .file_prefix("test")
            .rotation(RotationStrategy::Hourly)
            .build();

        assert_eq!(config.level, "debug");
        assert!(config.json_format);
        assert!(!config.console_output);
        assert_eq!(config.file_output, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.file_prefix, "test");
        assert_eq!(config.rotation, RotationStrategy::Hourly);
    }

    #[test]
    fn test_logger_config_from_settings() {
        let mut settings = AppSettings::default();
        settings.assign("log_level".to_string(), json!("debug"));
        settings.assign("log_json".to_string(), json!(true));
        settings.assign("log_dir".to_string(), json!("./logs"));
        settings.assign("log_rotation".to_string(), json!("hourly"));

        let config = LoggerConfig::from_settings(&settings);
        assert_eq!(config.level, "debug");
        assert!(config.json_format);
        assert_eq!(config.file_output, Some(PathBuf::from("./logs")));
        assert_eq!(config.rotation, RotationStrategy::Hourly);
    }

    #[test]
    fn test_logger_config_from_empty_settings() {
        let settings = AppSettings::default();
        let config = LoggerConfig::from_settings(&settings);
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert!(config.file_output.is_none());
    }
}
