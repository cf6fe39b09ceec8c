//! 模块注册表
//!
//! 负责模块的依赖检查注册、资源聚合与发布：
//!
//! - 按声明顺序检查依赖，缺失即整体中止（无部分注册）
//! - 聚合各模块声明的配置目录、路由与中间件文件、视图与资源目录
//! - 路由/中间件队列按注册顺序去重
//! - 将模块自带的资源/配置目录树发布（镜像）到应用目录

use crate::core::app::App;
use crate::module::provider::{ModuleFactory, ModuleProvider, ModuleState, ResourceManifest};
use crate::utils::{CoreError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 已注册模块的记录
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    /// 模块访问键
    pub accessor: String,
    /// 模块根目录
    pub root: PathBuf,
    /// 资源清单
    pub manifest: ResourceManifest,
    /// 生命周期状态
    pub state: ModuleState,
    /// 注册时间
    pub registered_at: DateTime<Utc>,
}

/// 模块注册表
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    /// 访问键 -> 模块记录
    modules: HashMap<String, ModuleRecord>,
    /// 路由定义文件队列，按注册顺序去重
    routes: Vec<PathBuf>,
    /// 中间件定义文件队列，按注册顺序去重
    middlewares: Vec<PathBuf>,
    /// 访问键 -> 待发布的资源目录
    assets: HashMap<String, PathBuf>,
    /// 访问键 -> 待发布的配置目录
    configs: HashMap<String, PathBuf>,
}

impl ModuleRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 模块是否已注册
    pub fn is_registered(&self, accessor: &str) -> bool {
        self.modules.contains_key(accessor)
    }

    /// 读取模块记录
    pub fn get_module(&self, accessor: &str) -> Option<ModuleRecord> {
        self.modules.get(accessor).cloned()
    }

    /// 已注册模块的访问键，按字典序
    pub fn accessors(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.modules.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// 已注册模块数量
    pub fn count(&self) -> usize {
        self.modules.len()
    }

    /// 按列表顺序构造并注册全部模块
    ///
    /// 先以应用上下文实例化所有提供者，再按同一顺序逐个注册。
    /// 顺序即依赖顺序，由调用方负责；首个错误整体中止。
    ///
    /// # Errors
    ///
    /// 任一模块注册失败时返回该错误，后续模块不再注册。
    pub fn register_all(&mut self, app: &App, factories: &[ModuleFactory]) -> Result<()> {
        let providers: Vec<Box<dyn ModuleProvider>> =
            factories.iter().map(|factory| factory(app)).collect();

        info!(count = providers.len(), "开始注册模块");
        for provider in &providers {
            self.register(app, provider.as_ref())?;
        }
        info!(count = self.modules.len(), "模块注册全部完成");

        Ok(())
    }

    /// 注册单个模块
    ///
    /// 流程：依赖检查 -> 按清单逐项登记资源 -> 记录为已注册 ->
    /// 调用模块自身的注册钩子。依赖检查失败时整体中止，
    /// 不产生任何部分登记。
    ///
    /// # Errors
    ///
    /// 访问键重复时返回 `ModuleAlreadyRegistered`；存在未注册的
    /// 依赖时返回 `MissingDependency`；控制器目录扫描失败时返回
    /// IO 错误；注册钩子错误原样向上传播。
    pub fn register(&mut self, app: &App, module: &dyn ModuleProvider) -> Result<()> {
        let accessor = module.accessor().to_string();

        if self.modules.contains_key(&accessor) {
            return Err(CoreError::ModuleAlreadyRegistered(accessor));
        }

        for requirement in module.required_modules() {
            if !self.is_registered(&requirement) {
                return Err(CoreError::MissingDependency {
                    module: accessor,
                    requires: requirement,
                });
            }
        }

        let root = module.root();
        let manifest = module.resources();
        debug!(accessor = %accessor, root = %root.display(), "依赖检查通过，登记模块资源");

        if let Some(dir) = &manifest.controllers {
            if app.flag("controller_as_service") {
                app.services
                    .borrow_mut()
                    .register_controller_directory(&root.join(dir), &accessor)?;
            }
        }

        if let Some(dir) = &manifest.config {
            let config_dir = root.join(dir);
            app.config
                .borrow_mut()
                .add_directory(&config_dir, &accessor);
            self.configs.insert(accessor.clone(), config_dir);
        }

        if let Some(file) = &manifest.routes {
            self.push_route_file(root.join(file));
        }

        if let Some(file) = &manifest.middlewares {
            self.push_middleware_file(root.join(file));
        }

        if let Some(dir) = &manifest.views {
            app.views.borrow_mut().add_path(&root.join(dir), &accessor);
        }

        if let Some(dir) = &manifest.assets {
            self.assets.insert(accessor.clone(), root.join(dir));
        }

        self.modules.insert(
            accessor.clone(),
            ModuleRecord {
                accessor: accessor.clone(),
                root,
                manifest,
                state: ModuleState::Registered,
                registered_at: Utc::now(),
            },
        );

        // 模块自身的注册钩子最后执行，其错误不回滚已登记的资源
        module.register(app).map_err(CoreError::from)?;
        info!(accessor = %accessor, "模块注册完成");

        Ok(())
    }

    /// 追加路由定义文件，重复路径忽略
    pub fn push_route_file(&mut self, path: PathBuf) {
        if !self.routes.contains(&path) {
            self.routes.push(path);
        }
    }

    /// 追加中间件定义文件，重复路径忽略
    pub fn push_middleware_file(&mut self, path: PathBuf) {
        if !self.middlewares.contains(&path) {
            self.middlewares.push(path);
        }
    }

    /// 路由定义文件队列，按注册顺序
    pub fn route_files(&self) -> &[PathBuf] {
        &self.routes
    }

    /// 中间件定义文件队列，按注册顺序
    pub fn middleware_files(&self) -> &[PathBuf] {
        &self.middlewares
    }

    /// 模块记录的待发布资源目录
    pub fn asset_dir(&self, accessor: &str) -> Option<&Path> {
        self.assets.get(accessor).map(PathBuf::as_path)
    }

    /// 模块记录的待发布配置目录
    pub fn config_dir(&self, accessor: &str) -> Option<&Path> {
        self.configs.get(accessor).map(PathBuf::as_path)
    }

    /// 发布模块静态资源
    ///
    /// 将记录的资源目录树镜像到 `<public>/assets/<accessor>`。
    ///
    /// # Errors
    ///
    /// 访问键无资源目录记录时返回 `PublishSourceNotFound`；
    /// 复制失败时返回 IO 错误。
    pub fn publish_asset(&self, app: &App, accessor: &str) -> Result<()> {
        let source = self
            .assets
            .get(accessor)
            .ok_or_else(|| CoreError::PublishSourceNotFound {
                accessor: accessor.to_string(),
                kind: "资源",
            })?;
        let dest = app.paths.public_assets_path().join(accessor);

        info!(accessor, dest = %dest.display(), "发布模块资源");
        app.mirror.mirror(source, &dest)
    }

    /// 发布模块配置
    ///
    /// 将记录的配置目录树镜像到 `<app>/config/<accessor>`，
    /// 形成应用侧覆盖副本。
    ///
    /// # Errors
    ///
    /// 访问键无配置目录记录时返回 `PublishSourceNotFound`；
    /// 复制失败时返回 IO 错误。
    pub fn publish_config(&self, app: &App, accessor: &str) -> Result<()> {
        let source = self
            .configs
            .get(accessor)
            .ok_or_else(|| CoreError::PublishSourceNotFound {
                accessor: accessor.to_string(),
                kind: "配置",
            })?;
        let dest = app.paths.config_path().join(accessor);

        info!(accessor, dest = %dest.display(), "发布模块配置");
        app.mirror.mirror(source, &dest)
    }
}
