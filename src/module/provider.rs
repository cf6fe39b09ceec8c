//! 模块契约定义
//!
//! 定义模块向注册表暴露的内容：唯一访问键、依赖列表、
//! 资源清单、文件系统根目录和注册钩子。模块由显式的
//! 工厂函数构造，不做运行时反射。

use crate::core::app::App;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// 资源清单
// ============================================================================

/// 模块资源清单
///
/// 六个字段均为可选，路径相对于模块根目录。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceManifest {
    /// 控制器目录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controllers: Option<String>,

    /// 配置目录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,

    /// 路由定义文件
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<String>,

    /// 中间件定义文件
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middlewares: Option<String>,

    /// 模板视图目录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,

    /// 静态资源目录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<String>,
}

impl ResourceManifest {
    /// 创建空清单
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明控制器目录
    pub fn with_controllers(mut self, dir: impl Into<String>) -> Self {
        self.controllers = Some(dir.into());
        self
    }

    /// 声明配置目录
    pub fn with_config(mut self, dir: impl Into<String>) -> Self {
        self.config = Some(dir.into());
        self
    }

    /// 声明路由定义文件
    pub fn with_routes(mut self, file: impl Into<String>) -> Self {
        self.routes = Some(file.into());
        self
    }

    /// 声明中间件定义文件
    pub fn with_middlewares(mut self, file: impl Into<String>) -> Self {
        self.middlewares = Some(file.into());
        self
    }

    /// 声明模板视图目录
    pub fn with_views(mut self, dir: impl Into<String>) -> Self {
        self.views = Some(dir.into());
        self
    }

    /// 声明静态资源目录
    pub fn with_assets(mut self, dir: impl Into<String>) -> Self {
        self.assets = Some(dir.into());
        self
    }
}

// ============================================================================
// 模块状态
// ============================================================================

/// 模块生命周期状态
///
/// 单向转移：`Unregistered -> Registered`，注册后在进程生命周期内
/// 保持终态，不存在反注册操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
    /// 未注册
    Unregistered,
    /// 已注册（终态）
    Registered,
}

impl ModuleState {
    /// 是否处于已注册终态
    pub fn is_registered(&self) -> bool {
        matches!(self, ModuleState::Registered)
    }
}

impl std::fmt::Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleState::Unregistered => write!(f, "unregistered"),
            ModuleState::Registered => write!(f, "registered"),
        }
    }
}

// ============================================================================
// 模块提供者
// ============================================================================

/// 模块提供者契约
///
/// 模块向注册表暴露的全部内容。`register` 钩子在注册流程末尾
/// 调用，可通过应用上下文做任意附加绑定。
pub trait ModuleProvider {
    /// 模块唯一访问键
    fn accessor(&self) -> &str;

    /// 依赖的模块访问键，按声明顺序
    fn required_modules(&self) -> Vec<String> {
        Vec::new()
    }

    /// 资源清单
    fn resources(&self) -> ResourceManifest {
        ResourceManifest::default()
    }

    /// 模块文件系统根目录
    fn root(&self) -> PathBuf;

    /// 注册钩子
    ///
    /// # Errors
    ///
    /// 钩子内部错误原样向上传播，已登记的资源保持登记状态
    fn register(&self, _app: &App) -> anyhow::Result<()> {
        Ok(())
    }
}

/// 模块工厂函数
///
/// 以应用上下文构造模块提供者实例，替代运行时反射构造。
pub type ModuleFactory = Box<dyn Fn(&App) -> Box<dyn ModuleProvider>>;
