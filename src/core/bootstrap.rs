//! 启动序列
//!
//! 固定的启动顺序：加载 `app` 配置域（并入应用设置）->
//! 按列表顺序登记服务提供者 -> 注册模块 -> 产出装载计划。
//! 装载计划中模块贡献的文件总是排在应用自身文件之前，
//! 使应用代码可以覆盖模块默认行为。

use crate::core::app::App;
use crate::core::services::ServiceProvider;
use crate::module::{ModuleFactory, ModuleRegistry};
use crate::utils::{CoreError, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// 启动选项
#[derive(Default)]
pub struct BootOptions {
    /// 服务提供者，按列表顺序登记
    pub providers: Vec<Box<dyn ServiceProvider>>,
    /// 模块工厂，顺序即依赖顺序
    pub modules: Vec<ModuleFactory>,
    /// 应用自身的控制器目录
    pub controllers_dir: Option<PathBuf>,
    /// 应用自身的中间件定义文件
    pub middlewares_file: Option<PathBuf>,
    /// 应用自身的路由定义文件
    pub routes_file: Option<PathBuf>,
}

impl BootOptions {
    /// 创建空的启动选项
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个服务提供者
    pub fn provider(mut self, provider: Box<dyn ServiceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// 追加一个模块工厂
    pub fn module(mut self, factory: ModuleFactory) -> Self {
        self.modules.push(factory);
        self
    }

    /// 设置应用自身的控制器目录
    pub fn controllers_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.controllers_dir = Some(dir.into());
        self
    }

    /// 设置应用自身的中间件定义文件
    pub fn middlewares_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.middlewares_file = Some(file.into());
        self
    }

    /// 设置应用自身的路由定义文件
    pub fn routes_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.routes_file = Some(file.into());
        self
    }
}

/// 启动产出：宿主框架需要按序装载的文件清单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootPlan {
    /// 中间件定义文件，模块贡献在前，应用文件在后
    pub middleware_files: Vec<PathBuf>,
    /// 路由定义文件，模块贡献在前，应用文件在后
    pub route_files: Vec<PathBuf>,
}

/// 执行启动序列
///
/// # Errors
///
/// `app` 配置域缺失或格式非法、服务提供者登记失败、
/// 任一模块注册失败时返回对应错误，启动整体中止。
pub fn boot(app: &App, registry: &mut ModuleRegistry, options: BootOptions) -> Result<BootPlan> {
    info!(base = %app.paths.base.display(), "启动序列开始");

    // 1. 应用设置配置并入设置存储
    app.config.borrow_mut().load_file("app", "")?;

    // 2. 按列表顺序登记服务提供者
    for provider in &options.providers {
        let enabled = provider.should_register(&app.settings.borrow());
        if !enabled {
            debug!(service = provider.name(), "服务提供者按环境开关跳过");
            continue;
        }
        app.services
            .borrow_mut()
            .register(provider.name(), provider.options())?;
        provider.register(app).map_err(CoreError::from)?;
        debug!(service = provider.name(), "服务提供者登记完成");
    }

    // 3. 应用自身的控制器目录
    if let Some(dir) = &options.controllers_dir {
        if app.flag("controller_as_service") {
            app.services
                .borrow_mut()
                .register_controller_directory(dir, "app")?;
        }
    }

    // 4. 模块注册由 enable_module 开关控制
    if app.flag("enable_module") {
        registry.register_all(app, &options.modules)?;
    } else {
        debug!("模块系统未启用，跳过模块注册");
    }

    // 5. 装载计划：模块文件在前，应用文件在后
    let mut middleware_files = registry.middleware_files().to_vec();
    if let Some(file) = options.middlewares_file {
        if !middleware_files.contains(&file) {
            middleware_files.push(file);
        }
    }

    let mut route_files = registry.route_files().to_vec();
    if let Some(file) = options.routes_file {
        if !route_files.contains(&file) {
            route_files.push(file);
        }
    }

    info!(
        middlewares = middleware_files.len(),
        routes = route_files.len(),
        "启动序列完成"
    );

    Ok(BootPlan {
        middleware_files,
        route_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::AppPaths;
    use std::fs;
    use tempfile::TempDir;

    fn scaffold_app_config(base: &std::path::Path, content: &str) {
        let config_dir = base.join("app/config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("app.yaml"), content).unwrap();
    }

    #[test]
    fn test_boot_requires_app_config() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::new(AppPaths::new(temp_dir.path()));
        let mut registry = ModuleRegistry::new();

        let result = boot(&app, &mut registry, BootOptions::new());
        assert!(matches!(result, Err(CoreError::ConfigFileNotFound(_))));
    }

    #[test]
    fn test_boot_merges_app_settings() {
        let temp_dir = TempDir::new().unwrap();
        scaffold_app_config(temp_dir.path(), "debug: true\nenable_module: false");

        let app = App::new(AppPaths::new(temp_dir.path()));
        let mut registry = ModuleRegistry::new();
        boot(&app, &mut registry, BootOptions::new()).unwrap();

        assert!(app.flag("debug"));
        assert!(!app.flag("enable_module"));
    }

    #[test]
    fn test_boot_skips_modules_when_disabled() {
        let temp_dir = TempDir::new().unwrap();
        scaffold_app_config(temp_dir.path(), "enable_module: false");

        let app = App::new(AppPaths::new(temp_dir.path()));
        let mut registry = ModuleRegistry::new();

        // 若模块系统启用，这个工厂会被调用并失败
        let options =
            BootOptions::new().module(Box::new(|_app| -> Box<dyn crate::module::ModuleProvider> {
                panic!("模块未启用时不应实例化");
            }));

        boot(&app, &mut registry, options).unwrap();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_boot_appends_app_files_after_module_files() {
        let temp_dir = TempDir::new().unwrap();
        scaffold_app_config(temp_dir.path(), "enable_module: false");

        let app = App::new(AppPaths::new(temp_dir.path()));
        let mut registry = ModuleRegistry::new();
        registry.push_route_file(temp_dir.path().join("module-routes.yaml"));

        let options = BootOptions::new()
            .routes_file(temp_dir.path().join("app/routes.yaml"))
            .middlewares_file(temp_dir.path().join("app/middlewares.yaml"));

        let plan = boot(&app, &mut registry, options).unwrap();
        assert_eq!(
            plan.route_files,
            vec![
                temp_dir.path().join("module-routes.yaml"),
                temp_dir.path().join("app/routes.yaml"),
            ]
        );
        assert_eq!(
            plan.middleware_files,
            vec![temp_dir.path().join("app/middlewares.yaml")]
        );
    }
}
