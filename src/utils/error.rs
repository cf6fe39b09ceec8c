//! 薯条启动套件错误类型定义
//!
//! 本模块定义了启动内核中使用的所有错误类型。

use thiserror::Error;

/// 启动内核核心错误类型
#[derive(Error, Debug)]
pub enum CoreError {
    // ==================== 配置系统错误 ====================

    /// 配置文件未找到
    #[error("配置文件未找到: '{0}'")]
    ConfigFileNotFound(String),

    /// 配置键无效
    #[error("配置键无效: {0}")]
    InvalidConfigKey(String),

    /// 配置值无效
    #[error("配置值无效: '{key}' - {reason}")]
    InvalidConfigValue {
        /// 出错的配置键
        key: String,
        /// 失败原因
        reason: String,
    },

    /// 子配置缺失
    #[error("配置 '{parent}' 中不存在子配置 '{child}'")]
    MissingSubconfig {
        /// 被访问的父节点键
        parent: String,
        /// 缺失的子节点键
        child: String,
    },

    // ==================== 模块管理错误 ====================

    /// 模块已注册
    #[error("模块已注册: '{0}'")]
    ModuleAlreadyRegistered(String),

    /// 依赖模块未注册
    #[error("模块 '{module}' 依赖的模块 '{requires}' 尚未注册")]
    MissingDependency {
        /// 正在注册的模块
        module: String,
        /// 缺失的依赖模块
        requires: String,
    },

    /// 发布资源时未找到模块的目录记录
    #[error("未找到模块 '{accessor}' 的{kind}目录记录")]
    PublishSourceNotFound {
        /// 模块访问键
        accessor: String,
        /// 目录种类（资源 / 配置）
        kind: &'static str,
    },

    // ==================== IO 和序列化错误 ====================

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML 序列化/反序列化错误
    #[error("YAML 错误: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ==================== 通用错误 ====================

    /// 初始化失败
    #[error("初始化失败: {0}")]
    InitFailed(String),

    /// 其他错误（模块注册钩子、服务提供者等外部代码）
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// 内核操作结果类型别名
pub type Result<T> = std::result::Result<T, CoreError>;
