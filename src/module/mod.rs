//! 模块管理系统
//!
//! 包含模块契约定义与带依赖检查的模块注册表：
//! - 模块提供者契约与资源清单
//! - 注册表：依赖检查、资源聚合、资源发布

pub mod provider;
pub mod registry;

// 重导出常用类型
pub use provider::{ModuleFactory, ModuleProvider, ModuleState, ResourceManifest};
pub use registry::{ModuleRecord, ModuleRegistry};
