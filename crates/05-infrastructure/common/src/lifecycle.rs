//! 服务生命周期作用域

use crate::errors::ConfigurationError;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// 旧版的应用作用域别名
pub const LEGACY_GLOBAL_SCOPE: &str = "global";

/// 服务作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceScope {
    /// 应用作用域 - 每个进程级注册表内只创建一个实例
    Application,
    /// 请求作用域 - 每个请求上下文内最多创建一个实例
    Request,
}

impl ServiceScope {
    /// 作用域名称
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Request => "request",
        }
    }

    /// 解析作用域名称，同时报告是否使用了旧版别名
    pub fn parse(value: &str) -> Result<ParsedScope, ConfigurationError> {
        match value {
            "application" => Ok(ParsedScope::new(Self::Application)),
            "request" => Ok(ParsedScope::new(Self::Request)),
            LEGACY_GLOBAL_SCOPE => {
                warn!("作用域 'global' 已弃用, 请改用 'application'");
                Ok(ParsedScope {
                    scope: Self::Application,
                    deprecated_alias: Some(LEGACY_GLOBAL_SCOPE),
                })
            }
            other => Err(ConfigurationError::InvalidScope {
                scope: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceScope {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map(|parsed| parsed.scope)
    }
}

/// 作用域解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedScope {
    /// 规范化后的作用域
    pub scope: ServiceScope,
    /// 使用的旧版别名（如果有）
    pub deprecated_alias: Option<&'static str>,
}

impl ParsedScope {
    const fn new(scope: ServiceScope) -> Self {
        Self {
            scope,
            deprecated_alias: None,
        }
    }

    /// 是否使用了已弃用的别名
    pub const fn is_deprecated(&self) -> bool {
        self.deprecated_alias.is_some()
    }
}
