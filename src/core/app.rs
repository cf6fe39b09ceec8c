//! 应用上下文
//!
//! 定义应用设置存储、路径约定与显式传递的应用上下文 [`App`]。
//! 内核是单线程同步模型，共享状态通过 `Rc<RefCell<..>>` 句柄
//! 显式传递，不做内部加锁。

use crate::config::ConfigContainer;
use crate::core::services::{
    DirectoryMirror, FsMirror, ServiceContainer, ServiceRegistry, TemplateRegistry, ViewRegistry,
};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// 单线程共享句柄别名
pub type Shared<T> = Rc<RefCell<T>>;

/// 创建共享句柄
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

// ============================================================================
// 应用设置
// ============================================================================

/// 应用设置存储
///
/// 保留配置域 `app` 的并入目标：扁平的键 -> 值映射。
#[derive(Debug, Default)]
pub struct AppSettings {
    entries: HashMap<String, Value>,
}

impl AppSettings {
    /// 写入（或覆盖）一项设置
    pub fn assign(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    /// 读取一项设置
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// 读取布尔开关设置，缺失或非布尔真值时为 false
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(Value::Bool(true)))
    }

    /// 设置项是否存在
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// 设置项数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有任何设置项
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// 路径约定
// ============================================================================

/// 应用目录约定
///
/// 以应用根目录为基准推导各子目录的位置。
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// 应用根目录
    pub base: PathBuf,
}

impl AppPaths {
    /// 以根目录创建路径约定
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// 应用代码目录 `<root>/app`
    pub fn app_path(&self) -> PathBuf {
        self.base.join("app")
    }

    /// 应用配置目录 `<root>/app/config`
    pub fn config_path(&self) -> PathBuf {
        self.app_path().join("config")
    }

    /// 公开资源根目录 `<root>/public`
    pub fn public_path(&self) -> PathBuf {
        self.base.join("public")
    }

    /// 已发布资源目录 `<root>/public/assets`
    pub fn public_assets_path(&self) -> PathBuf {
        self.public_path().join("assets")
    }
}

// ============================================================================
// 应用上下文
// ============================================================================

/// 应用上下文
///
/// 启动流程中显式传递的协作者集合：配置容器、应用设置、
/// 服务容器、视图注册表和目录镜像工具。模块注册钩子通过
/// 共享句柄对其进行附加绑定。
pub struct App {
    /// 目录约定
    pub paths: AppPaths,
    /// 应用设置存储
    pub settings: Shared<AppSettings>,
    /// 配置容器
    pub config: Shared<ConfigContainer>,
    /// 服务容器协作者
    pub services: Shared<dyn ServiceContainer>,
    /// 模板视图注册表协作者
    pub views: Shared<dyn ViewRegistry>,
    /// 目录镜像工具协作者
    pub mirror: Rc<dyn DirectoryMirror>,
}

impl App {
    /// 以默认协作者创建应用上下文
    ///
    /// 配置容器的主目录为 `<root>/app/config`。
    pub fn new(paths: AppPaths) -> Self {
        let settings = shared(AppSettings::default());
        let config = shared(ConfigContainer::new(
            paths.config_path(),
            Rc::clone(&settings),
        ));

        Self {
            paths,
            settings,
            config,
            services: shared(ServiceRegistry::new()),
            views: shared(TemplateRegistry::new()),
            mirror: Rc::new(FsMirror),
        }
    }

    /// 以调用方提供的协作者创建应用上下文
    ///
    /// 测试或宿主框架可保留具体类型的句柄副本再传入。
    pub fn with_collaborators(
        paths: AppPaths,
        services: Shared<dyn ServiceContainer>,
        views: Shared<dyn ViewRegistry>,
        mirror: Rc<dyn DirectoryMirror>,
    ) -> Self {
        let settings = shared(AppSettings::default());
        let config = shared(ConfigContainer::new(
            paths.config_path(),
            Rc::clone(&settings),
        ));

        Self {
            paths,
            settings,
            config,
            services,
            views,
            mirror,
        }
    }

    /// 读取布尔开关设置
    pub fn flag(&self, key: &str) -> bool {
        self.settings.borrow().flag(key)
    }
}
