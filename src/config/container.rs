//! 配置容器
//!
//! 实现带命名空间、惰性加载、点号路径寻址的配置存储。
//!
//! 配置按"域"组织：点号路径的第一段是域名，对应一个配置文件。
//! 域在首次访问时从搜索路径链解析并加载，此后进程生命周期内缓存，
//! 不会隐式重载。保留域 `app` 是特例：其内容逐项并入应用设置存储，
//! 不进入容器缓存。
//!
//! # 示例
//!
//! ```rust,no_run
//! use fries_web::config::{ConfigContainer, ConfigSource};
//! use fries_web::core::app::{shared, AppSettings};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = shared(AppSettings::default());
//!     let mut config = ConfigContainer::new("./app/config", settings);
//!
//!     config.load(ConfigSource::Name("database".to_string()), "")?;
//!     let host: String = config.get_as("database.host")?;
//!     println!("数据库主机: {}", host);
//!     Ok(())
//! }
//! ```

use crate::core::app::{AppSettings, Shared};
use crate::utils::{CoreError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 保留的应用设置域名
pub const APP_DOMAIN: &str = "app";

/// 命名空间分隔符（`"blog::config"` 形式）
const NAMESPACE_SEPARATOR: &str = "::";

/// 配置文件候选扩展名，按探测优先级排列
const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

// ============================================================================
// 配置源
// ============================================================================

/// 配置加载源
///
/// 逻辑名称走文件解析链；内联值直接存入缓存。
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// 逻辑名称（可带 `ns::` 命名空间前缀）
    Name(String),
    /// 已结构化的内联值
    Inline(Value),
}

impl From<&str> for ConfigSource {
    fn from(name: &str) -> Self {
        ConfigSource::Name(name.to_string())
    }
}

impl From<String> for ConfigSource {
    fn from(name: String) -> Self {
        ConfigSource::Name(name)
    }
}

impl From<Value> for ConfigSource {
    fn from(value: Value) -> Self {
        ConfigSource::Inline(value)
    }
}

// ============================================================================
// 配置容器
// ============================================================================

/// 带命名空间与惰性加载的配置容器
pub struct ConfigContainer {
    /// 主配置目录
    base_path: PathBuf,
    /// 已加载的配置域缓存
    domains: HashMap<String, Value>,
    /// 无名附加搜索目录，按插入顺序匹配
    search_paths: Vec<PathBuf>,
    /// 命名空间 -> 目录
    namespaced_paths: HashMap<String, PathBuf>,
    /// 应用设置存储，保留域 `app` 的并入目标
    settings: Shared<AppSettings>,
}

impl ConfigContainer {
    /// 创建配置容器
    ///
    /// # Arguments
    ///
    /// * `base_path` - 主配置目录
    /// * `settings` - 共享的应用设置存储
    pub fn new(base_path: impl Into<PathBuf>, settings: Shared<AppSettings>) -> Self {
        Self {
            base_path: base_path.into(),
            domains: HashMap::new(),
            search_paths: Vec::new(),
            namespaced_paths: HashMap::new(),
            settings,
        }
    }

    /// 主配置目录
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// 指定键是否已有缓存的配置域
    pub fn exists(&self, key: &str) -> bool {
        self.domains.contains_key(key)
    }

    /// 加载配置
    ///
    /// 幂等：`key` 已有缓存域时立即返回，不产生任何副作用。
    /// 逻辑名称先走文件解析；无匹配文件且 `key` 非空时，
    /// 名称字符串本身作为字面值存入 `key`（这是唯一认可的
    /// 解析-回退策略）。内联值直接存入，此分支要求 `key` 非空。
    ///
    /// # Errors
    ///
    /// 名称无法解析且未提供键、或内联值未提供键时返回
    /// `InvalidConfigKey`；文件解析失败时返回对应的解析错误。
    pub fn load(&mut self, source: impl Into<ConfigSource>, key: &str) -> Result<()> {
        if !key.is_empty() && self.domains.contains_key(key) {
            return Ok(());
        }

        match source.into() {
            ConfigSource::Name(name) => {
                // 显式存在性检查后分支，而不是错误驱动的回退
                if self.try_resolve_path(&name).is_some() {
                    self.load_file(&name, key)
                } else if key.is_empty() {
                    Err(CoreError::InvalidConfigKey(format!(
                        "无法解析配置名 '{}' 且未提供配置键",
                        name
                    )))
                } else {
                    debug!(key, literal = %name, "配置名未解析到文件，按字面值存入");
                    self.domains.insert(key.to_string(), Value::String(name));
                    Ok(())
                }
            }
            ConfigSource::Inline(value) => {
                if key.is_empty() {
                    return Err(CoreError::InvalidConfigKey(
                        "按内联值加载时必须提供配置键".to_string(),
                    ));
                }
                self.domains.insert(key.to_string(), value);
                Ok(())
            }
        }
    }

    /// 从文件加载配置
    ///
    /// `spec` 为 `"name"` 或 `"namespace::name"`；`key` 为空时默认
    /// 使用文件名主干。解析出的键等于保留域 `app` 时，文件内容
    /// 必须是映射，并逐项并入应用设置存储，不进入容器缓存。
    /// 其余键仅在尚未缓存时读取文件，底层文件读取每键至多一次。
    ///
    /// # Errors
    ///
    /// 文件无法解析时返回 `ConfigFileNotFound`；`app` 域内容不是
    /// 映射时返回 `InvalidConfigValue`。
    pub fn load_file(&mut self, spec: &str, key: &str) -> Result<()> {
        let (_, filename) = split_namespace(spec);
        let key = if key.is_empty() {
            default_domain_key(filename)
        } else {
            key.to_string()
        };

        if key == APP_DOMAIN {
            let path = self.resolve_path(spec)?;
            let value = read_config_file(&path)?;
            let Value::Object(entries) = value else {
                return Err(CoreError::InvalidConfigValue {
                    key: APP_DOMAIN.to_string(),
                    reason: "应用设置配置必须是键值映射".to_string(),
                });
            };

            let mut settings = self.settings.borrow_mut();
            for (name, entry) in entries {
                settings.assign(name, entry);
            }
            debug!(spec, "应用设置配置已并入设置存储");
            return Ok(());
        }

        if !self.domains.contains_key(&key) {
            let path = self.resolve_path(spec)?;
            let value = read_config_file(&path)?;
            debug!(key, path = %path.display(), "配置域已加载");
            self.domains.insert(key, value);
        }

        Ok(())
    }

    /// 解析配置名到文件路径
    ///
    /// 解析顺序：
    /// 1. 无命名空间：主配置目录；
    /// 2. 无命名空间：无名搜索目录，按插入顺序首个命中者胜出；
    /// 3. 有命名空间：`主配置目录/命名空间/`（应用侧覆盖优先于模块自带副本）；
    /// 4. 有命名空间：该命名空间注册的目录。
    ///
    /// # Errors
    ///
    /// 均未命中时返回 `ConfigFileNotFound`。
    pub fn resolve_path(&self, spec: &str) -> Result<PathBuf> {
        self.try_resolve_path(spec)
            .ok_or_else(|| CoreError::ConfigFileNotFound(spec.to_string()))
    }

    /// 解析配置名，未命中时返回 None
    fn try_resolve_path(&self, spec: &str) -> Option<PathBuf> {
        let (namespace, filename) = split_namespace(spec);

        match namespace {
            None => {
                if let Some(path) = probe_file(&self.base_path, filename) {
                    return Some(path);
                }
                if let Some(path) = self
                    .search_paths
                    .iter()
                    .find_map(|dir| probe_file(dir, filename))
                {
                    return Some(path);
                }
                // 同名命名空间兜底：模块以访问键注册配置目录后，
                // 其同名配置域可按裸名寻址（等价于 name::name）
                let stem = default_domain_key(filename);
                if self.namespaced_paths.contains_key(&stem) {
                    return self.try_resolve_path(&format!(
                        "{}{}{}",
                        stem, NAMESPACE_SEPARATOR, filename
                    ));
                }
                None
            }
            Some(ns) => {
                if let Some(path) = probe_file(&self.base_path.join(ns), filename) {
                    return Some(path);
                }
                self.namespaced_paths
                    .get(ns)
                    .and_then(|dir| probe_file(dir, filename))
            }
        }
    }

    /// 读取配置值
    ///
    /// 完整键（含点号）的缓存命中优先；否则按点号拆分，首段为域名，
    /// 未缓存时触发一次惰性加载，再沿剩余段逐层下钻。
    ///
    /// # Errors
    ///
    /// 域文件无法解析时返回 `ConfigFileNotFound`；中间段缺失或不可
    /// 下钻时返回 `MissingSubconfig`；保留域 `app` 已并入应用设置，
    /// 通过本方法读取返回 `InvalidConfigKey`。
    pub fn get(&mut self, key: &str) -> Result<Value> {
        // 完整键命中缓存时不做点号解释
        if let Some(value) = self.domains.get(key) {
            return Ok(value.clone());
        }

        let mut segments = key.split('.');
        let domain = segments.next().unwrap_or_default();

        if !self.domains.contains_key(domain) {
            if domain == APP_DOMAIN {
                return Err(CoreError::InvalidConfigKey(format!(
                    "保留域 '{}' 已并入应用设置，无法通过配置容器读取",
                    APP_DOMAIN
                )));
            }
            if self.try_resolve_path(domain).is_none() {
                return Err(CoreError::ConfigFileNotFound(domain.to_string()));
            }
            self.load_file(domain, "")?;
        }

        let Some(mut current) = self.domains.get(domain) else {
            return Err(CoreError::ConfigFileNotFound(domain.to_string()));
        };

        let mut parent = domain;
        for segment in segments {
            match current {
                Value::Object(map) if map.contains_key(segment) => {
                    current = &map[segment];
                    parent = segment;
                }
                _ => {
                    return Err(CoreError::MissingSubconfig {
                        parent: parent.to_string(),
                        child: segment.to_string(),
                    })
                }
            }
        }

        Ok(current.clone())
    }

    /// 读取配置值并反序列化为具体类型
    ///
    /// # Errors
    ///
    /// 路径解析错误同 [`get`](Self::get)；值无法反序列化为目标
    /// 类型时返回 JSON 错误。
    pub fn get_as<T: serde::de::DeserializeOwned>(&mut self, key: &str) -> Result<T> {
        let value = self.get(key)?;
        Ok(serde_json::from_value(value)?)
    }

    /// 写入配置值
    ///
    /// 单段键整体替换对应域。多段键先确保根域存在（尝试加载，
    /// 失败则初始化为空映射），再沿路径自动创建缺失的中间映射，
    /// 最后在末段赋值。非映射的中间节点会被替换为空映射。
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        let segments: Vec<&str> = key.split('.').collect();

        if segments.len() == 1 {
            self.domains.insert(key.to_string(), value);
            return;
        }

        let root = segments[0];
        if !self.domains.contains_key(root) {
            // 根域不存在时尝试加载，加载失败或并入设置后仍缺失
            // 则初始化为空映射
            let _ = self.load(ConfigSource::Name(root.to_string()), "");
            self.domains
                .entry(root.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        let Some((last, intermediates)) = segments[1..].split_last() else {
            return;
        };
        let Some(mut current) = self.domains.get_mut(root) else {
            return;
        };

        for segment in intermediates {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            match current.as_object_mut() {
                Some(map) => {
                    current = map
                        .entry(segment.to_string())
                        .or_insert_with(|| Value::Object(Map::new()));
                }
                None => return,
            }
        }

        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        if let Some(map) = current.as_object_mut() {
            map.insert(last.to_string(), value);
        }
    }

    /// 移除顶层配置域
    ///
    /// 仅支持移除名为 `key` 的顶层域；点号路径不做嵌套删除
    /// （已知限制，保持原样）。
    pub fn unset(&mut self, key: &str) {
        self.domains.remove(key);
    }

    /// 注册搜索目录
    ///
    /// `namespace` 为空时目录追加到无名搜索列表；非空时绑定
    /// （或覆盖）该命名空间的目录。
    pub fn add_directory(&mut self, path: impl Into<PathBuf>, namespace: &str) {
        let path = path.into();
        if namespace.is_empty() {
            debug!(path = %path.display(), "注册无名配置搜索目录");
            self.search_paths.push(path);
        } else {
            debug!(namespace, path = %path.display(), "注册命名空间配置目录");
            self.namespaced_paths.insert(namespace.to_string(), path);
        }
    }
}

// ============================================================================
// 内部工具
// ============================================================================

/// 拆分 `ns::name` 形式的命名空间前缀
fn split_namespace(spec: &str) -> (Option<&str>, &str) {
    match spec.split_once(NAMESPACE_SEPARATOR) {
        Some((ns, name)) => (Some(ns), name),
        None => (None, spec),
    }
}

/// 文件名是否带有可识别的配置扩展名
fn has_config_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CONFIG_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// 默认配置键：文件名主干
fn default_domain_key(filename: &str) -> String {
    if has_config_extension(filename) {
        Path::new(filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(filename)
            .to_string()
    } else {
        filename.to_string()
    }
}

/// 在目录中探测配置文件
///
/// 文件名已带扩展名时直接检查存在性；否则按候选扩展名逐个探测。
fn probe_file(dir: &Path, filename: &str) -> Option<PathBuf> {
    if has_config_extension(filename) {
        let candidate = dir.join(filename);
        return candidate.is_file().then_some(candidate);
    }

    CONFIG_EXTENSIONS.iter().find_map(|ext| {
        let candidate = dir.join(format!("{}.{}", filename, ext));
        candidate.is_file().then_some(candidate)
    })
}

/// 读取并解析配置文件，JSON 按扩展名区分，其余按 YAML 解析
fn read_config_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let extension = path.extension().and_then(|ext| ext.to_str());

    if extension == Some("json") {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}

// ============================================================================
// 单元测试
// ============================================================================
