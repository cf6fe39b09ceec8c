//! 应用核心模块
//!
//! 包含应用上下文、外部协作者接口与启动序列。

pub mod app;
pub mod bootstrap;
pub mod services;

pub use app::{shared, App, AppPaths, AppSettings, Shared};
pub use bootstrap::{boot, BootOptions, BootPlan};
pub use services::{
    DirectoryMirror, FsMirror, ServiceContainer, ServiceProvider, ServiceRegistry,
    TemplateRegistry, ViewRegistry,
};
