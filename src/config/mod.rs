//! 配置系统模块
//!
//! 包含带命名空间、惰性加载、点号路径寻址的配置容器。

pub mod container;

pub use container::{ConfigContainer, ConfigSource, APP_DOMAIN};
