//! 工具模块
//!
//! 包含错误类型、日志系统和文件系统工具。

pub mod error;
pub mod fs;
pub mod logger;

pub use error::{CoreError, Result};
pub use logger::{LogGuard, Logger, LoggerConfig, LoggerConfigBuilder, RotationStrategy};
