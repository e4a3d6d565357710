//! 配置
//!
//! 从 TOML 文件或字符串加载依赖注入层配置，支持环境变量覆盖

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, Map};
use di_common::{ConfigError, ConfigResult};
use di_impl::DEFAULT_REGISTRY_NAME;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// 支持的日志级别
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 依赖注入层配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiSettings {
    /// 日志配置
    pub logging: LoggingSettings,
    /// 注册表配置
    pub registry: RegistrySettings,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别
    pub level: String,
    /// 是否使用 JSON 格式
    pub json_format: bool,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否初始化日志系统
    pub enabled: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            show_target: true,
            show_thread_ids: false,
            enabled: false,
        }
    }
}

impl LoggingSettings {
    /// 开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            show_thread_ids: true,
            enabled: true,
            ..Self::default()
        }
    }

    /// 生产环境日志配置
    pub fn production() -> Self {
        Self {
            json_format: true,
            show_target: false,
            enabled: true,
            ..Self::default()
        }
    }
}

/// 注册表配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// 注册表名称
    pub name: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_REGISTRY_NAME.to_string(),
        }
    }
}

impl DiSettings {
    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Self::load(Config::builder().add_source(File::from_str(content, FileFormat::Toml)))
    }

    /// 从 TOML 文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        info!("加载配置文件: {}", path.display());
        Self::load(Config::builder().add_source(File::from(path).format(FileFormat::Toml)))
    }

    /// 应用环境变量覆盖
    ///
    /// 变量名形如 `<PREFIX>_LOGGING__LEVEL`、`<PREFIX>_LOGGING__JSON_FORMAT`
    /// 和 `<PREFIX>_REGISTRY__NAME`，双下划线分隔嵌套字段。
    pub fn apply_env_overrides(&mut self, prefix: &str) -> ConfigResult<()> {
        self.layer(env_source(prefix))
    }

    /// 从给定变量表应用覆盖，变量命名规则同 [`Self::apply_env_overrides`]
    pub fn apply_overrides(&mut self, prefix: &str, vars: Map<String, String>) -> ConfigResult<()> {
        self.layer(env_source(prefix).source(Some(vars)))
    }

    fn layer(&mut self, environment: Environment) -> ConfigResult<()> {
        let current = Config::try_from(&*self).map_err(parse_error)?;
        *self = Self::load(Config::builder().add_source(current).add_source(environment))?;
        debug!(
            "环境变量覆盖后: 日志级别 {}, 注册表 {}",
            self.logging.level, self.registry.name
        );
        Ok(())
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> ConfigResult<Self> {
        let settings: Self = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(parse_error)?;
        settings.validate()?;
        Ok(settings)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "未知的日志级别 {}, 必须是 {} 之一",
                    self.logging.level,
                    LOG_LEVELS.join("/")
                ),
            });
        }

        if self.registry.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "注册表名称不能为空".to_string(),
            });
        }

        Ok(())
    }
}

fn env_source(prefix: &str) -> Environment {
    Environment::with_prefix(prefix)
        .prefix_separator("_")
        .separator("__")
}

fn parse_error(e: config::ConfigError) -> ConfigError {
    ConfigError::ParseError {
        source: Box::new(e),
    }
}
