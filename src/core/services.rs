//! 外部协作者接口
//!
//! 启动内核只规定协作者被告知什么，不实现其内部行为。
//! 本模块定义服务容器、模板视图注册表和目录镜像工具的接口，
//! 并提供进程内的默认实现，供测试与简单宿主使用。

use crate::core::app::{App, AppSettings};
use crate::utils::{fs as fs_util, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

// ============================================================================
// 服务容器
// ============================================================================

/// 服务容器接口
///
/// 宿主框架提供实现；模块注册流程通过它登记控制器目录与服务。
pub trait ServiceContainer {
    /// 扫描控制器目录，将发现的单元按命名空间登记
    ///
    /// # Returns
    ///
    /// 返回发现并登记的单元数量
    ///
    /// # Errors
    ///
    /// 目录不存在或扫描失败时返回 IO 错误
    fn register_controller_directory(&mut self, dir: &Path, namespace: &str) -> Result<usize>;

    /// 泛化的服务登记
    ///
    /// # Errors
    ///
    /// 实现方可因名称冲突或选项非法而失败
    fn register(&mut self, name: &str, options: Value) -> Result<()>;
}

/// 服务提供者
///
/// 启动序列按列表顺序登记；`should_register` 支持按环境开关
/// 跳过（例如仅开发环境的调试服务）。
pub trait ServiceProvider {
    /// 服务名称
    fn name(&self) -> &str;

    /// 登记选项
    fn options(&self) -> Value {
        Value::Null
    }

    /// 是否应在当前应用设置下登记
    fn should_register(&self, _settings: &AppSettings) -> bool {
        true
    }

    /// 登记钩子，可对应用上下文做任意附加绑定
    ///
    /// # Errors
    ///
    /// 钩子内部错误原样向上传播
    fn register(&self, _app: &App) -> anyhow::Result<()> {
        Ok(())
    }
}

/// 进程内服务容器默认实现
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Value>,
    controller_units: Vec<String>,
}

impl ServiceRegistry {
    /// 创建空的服务容器
    pub fn new() -> Self {
        Self::default()
    }

    /// 服务是否已登记
    pub fn has_service(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// 已登记的控制器单元名称，按登记顺序
    pub fn controller_units(&self) -> &[String] {
        &self.controller_units
    }
}

impl ServiceContainer for ServiceRegistry {
    fn register_controller_directory(&mut self, dir: &Path, namespace: &str) -> Result<usize> {
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("控制器目录不存在: {}", dir.display()),
            )
            .into());
        }

        let mut count = 0;
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(dir)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let unit = format!("{}::{}", namespace, relative.display());
            self.controller_units.push(unit);
            count += 1;
        }

        debug!(namespace, dir = %dir.display(), count, "控制器目录已登记");
        Ok(count)
    }

    fn register(&mut self, name: &str, options: Value) -> Result<()> {
        self.services.insert(name.to_string(), options);
        Ok(())
    }
}

// ============================================================================
// 模板视图注册表
// ============================================================================

/// 模板视图注册表接口
pub trait ViewRegistry {
    /// 按命名空间登记一个模板目录
    fn add_path(&mut self, dir: &Path, namespace: &str);
}

/// 进程内视图注册表默认实现
///
/// 同一命名空间可登记多个目录，按登记顺序查找。
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    namespaced: HashMap<String, Vec<PathBuf>>,
}

impl TemplateRegistry {
    /// 创建空的视图注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 某命名空间下登记的目录
    pub fn paths(&self, namespace: &str) -> Option<&[PathBuf]> {
        self.namespaced.get(namespace).map(|v| v.as_slice())
    }
}

impl ViewRegistry for TemplateRegistry {
    fn add_path(&mut self, dir: &Path, namespace: &str) {
        debug!(namespace, dir = %dir.display(), "模板目录已登记");
        self.namespaced
            .entry(namespace.to_string())
            .or_default()
            .push(dir.to_path_buf());
    }
}

// ============================================================================
// 目录镜像工具
// ============================================================================

/// 目录镜像工具接口
pub trait DirectoryMirror {
    /// 将源目录树递归复制到目标目录
    ///
    /// # Errors
    ///
    /// 复制失败时返回 IO 错误
    fn mirror(&self, source: &Path, dest: &Path) -> Result<()>;
}

/// 基于本地文件系统的目录镜像实现
#[derive(Debug, Default)]
pub struct FsMirror;

impl DirectoryMirror for FsMirror {
    fn mirror(&self, source: &Path, dest: &Path) -> Result<()> {
        fs_util::mirror(source, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::CoreError;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_register_controller_directory_scans_units() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("controllers");
        fs::create_dir_all(dir.join("admin")).unwrap();
        fs::write(dir.join("post.rs"), "").unwrap();
        fs::write(dir.join("admin/user.rs"), "").unwrap();

        let mut registry = ServiceRegistry::new();
        let count = registry
            .register_controller_directory(&dir, "blog")
            .unwrap();

        assert_eq!(count, 2);
        assert!(registry
            .controller_units()
            .iter()
            .any(|u| u == "blog::post.rs"));
        assert!(registry
            .controller_units()
            .iter()
            .any(|u| u.starts_with("blog::admin")));
    }

    #[test]
    fn test_register_controller_directory_missing_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = ServiceRegistry::new();
        let result =
            registry.register_controller_directory(&temp_dir.path().join("nope"), "blog");
        assert!(matches!(result, Err(CoreError::Io(_))));
    }

    #[test]
    fn test_service_register() {
        let mut registry = ServiceRegistry::new();
        registry.register("mailer", json!({"driver": "smtp"})).unwrap();
        assert!(registry.has_service("mailer"));
        assert!(!registry.has_service("queue"));
    }

    #[test]
    fn test_template_registry_appends_per_namespace() {
        let mut views = TemplateRegistry::new();
        views.add_path(Path::new("/a/views"), "blog");
        views.add_path(Path::new("/b/views"), "blog");

        let paths = views.paths("blog").unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], PathBuf::from("/a/views"));
        assert!(views.paths("shop").is_none());
    }

    #[test]
    fn test_fs_mirror_delegates() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), "x").unwrap();

        let dst = temp_dir.path().join("dst");
        FsMirror.mirror(&src, &dst).unwrap();
        assert!(dst.join("a.txt").is_file());
    }
}
