//! # Fries Web - 薯条启动套件内核
//!
//! 薯条启动套件内核是可插拔 Web 应用的引导层，提供以下核心功能：
//!
//! - **配置容器**: 带命名空间、惰性加载、点号路径寻址的分层配置解析
//! - **模块注册表**: 带依赖检查的插件注册与资源聚合
//! - **启动序列**: 固定顺序的配置加载、服务登记与模块注册
//! - **资源发布**: 将模块自带的资源/配置目录树镜像到应用目录
//! - **日志系统**: 结构化日志记录
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use fries_web::{boot, App, AppPaths, BootOptions, ModuleRegistry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::new(AppPaths::new("./"));
//!     let mut registry = ModuleRegistry::new();
//!
//!     let plan = boot(&app, &mut registry, BootOptions::new())?;
//!     for file in &plan.route_files {
//!         println!("装载路由文件: {}", file.display());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## 模块结构
//!
//! - `config` - 配置容器相关类型
//! - `module` - 模块契约与注册表
//! - `core` - 应用上下文、协作者接口与启动序列
//! - `utils` - 工具函数、错误类型和日志系统

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod core;
pub mod module;
pub mod utils;

// 重导出常用类型，方便使用
pub use config::{ConfigContainer, ConfigSource, APP_DOMAIN};

pub use module::{ModuleFactory, ModuleProvider, ModuleRecord, ModuleRegistry, ModuleState, ResourceManifest};

pub use crate::core::{
    boot, shared, App, AppPaths, AppSettings, BootOptions, BootPlan, DirectoryMirror, FsMirror,
    ServiceContainer, ServiceProvider, ServiceRegistry, Shared, TemplateRegistry, ViewRegistry,
};

pub use utils::logger::{LogGuard, Logger, LoggerConfig, LoggerConfigBuilder, RotationStrategy};
pub use utils::{CoreError, Result};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
