//! 错误类型定义

use thiserror::Error;

/// 配置文件错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },

    #[error("日志初始化失败: {message}")]
    LoggingInitFailed { message: String },
}

/// 服务声明/注册阶段的配置错误
///
/// 这些错误在应用启动阶段出现，属于致命错误，不可恢复。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("无效的作用域 {scope}, 必须是 'application' 或 'request'")]
    InvalidScope { scope: String },

    #[error("无法推断服务 {type_name} 的作用域: 未显式指定且类型没有作用域标记")]
    ScopeNotInferable { type_name: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {interface} (名称: {name:?})")]
    ComponentNotRegistered { interface: String, name: String },

    #[error("延迟属性未绑定到属性名: {attribute}")]
    AttributeNotBound { attribute: String },

    #[error("构造 {type_name} 缺少必需参数: {argument}")]
    MissingConstructorArgument {
        type_name: String,
        argument: &'static str,
    },

    #[error("类型不匹配: {interface} 注册的实例不是 {expected}")]
    TypeMismatch { interface: String, expected: String },

    #[error("注册表 {registry} 已释放")]
    RegistryReleased { registry: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DependencyError {
    /// 创建未注册错误
    pub fn not_registered(interface: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ComponentNotRegistered {
            interface: interface.into(),
            name: name.into(),
        }
    }

    /// 创建缺少构造参数错误
    pub fn missing_argument(type_name: impl Into<String>, argument: &'static str) -> Self {
        Self::MissingConstructorArgument {
            type_name: type_name.into(),
            argument,
        }
    }

    /// 是否为未注册错误
    pub const fn is_not_registered(&self) -> bool {
        matches!(self, Self::ComponentNotRegistered { .. })
    }
}

/// 依赖注入层统一错误类型
#[derive(Error, Debug)]
pub enum DiError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("服务配置错误: {source}")]
    ConfigurationError {
        #[from]
        source: ConfigurationError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type DiResult<T> = Result<T, DiError>;
