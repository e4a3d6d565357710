//! 应用构建器

use crate::logging::init_logging;
use crate::settings::{DiSettings, LoggingSettings};
use di_common::DiResult;
use di_impl::{Application, Configurator, RegistrationOutcome, ServiceCatalog};
use std::path::Path;
use tracing::{debug, info, warn};

/// 应用构建器
///
/// 使用建造者模式组合配置、日志和服务目录，最终生成 [`Application`]
#[derive(Debug, Default)]
pub struct ApplicationBuilder {
    /// 配置
    settings: DiSettings,
    /// 环境变量前缀
    env_prefix: Option<String>,
    /// 服务目录列表
    catalogs: Vec<ServiceCatalog>,
}

impl ApplicationBuilder {
    /// 创建新的应用构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定配置
    #[must_use]
    pub fn with_settings(mut self, settings: DiSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 从 TOML 配置文件加载配置
    pub fn with_settings_file<P: AsRef<Path>>(mut self, path: P) -> DiResult<Self> {
        self.settings = DiSettings::from_file(path)?;
        Ok(self)
    }

    /// 启用环境变量覆盖
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.env_prefix = Some(prefix);
        self
    }

    /// 配置日志并启用日志初始化
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingSettings) -> Self {
        self.settings.logging = LoggingSettings {
            enabled: true,
            ..logging
        };
        self
    }

    /// 添加服务目录
    #[must_use]
    pub fn add_catalog(mut self, catalog: ServiceCatalog) -> Self {
        debug!("添加服务目录，共 {} 个声明", catalog.len());
        self.catalogs.push(catalog);
        self
    }

    /// 当前配置
    pub const fn settings(&self) -> &DiSettings {
        &self.settings
    }

    /// 构建应用
    pub fn build(self) -> DiResult<Application> {
        let mut settings = self.settings;
        if let Some(prefix) = &self.env_prefix {
            settings.apply_env_overrides(prefix)?;
        } else {
            settings.validate()?;
        }

        // 只有在明确启用时才初始化日志，避免测试中重复初始化
        if settings.logging.enabled {
            init_logging(&settings.logging)?;
        }

        info!("开始构建应用: 注册表 {}", settings.registry.name);

        let mut configurator = Configurator::with_registry_name(settings.registry.name.clone());
        for catalog in &self.catalogs {
            let outcomes = configurator.scan_services(catalog)?;
            let duplicates = outcomes
                .iter()
                .filter(|outcome| **outcome == RegistrationOutcome::Duplicate)
                .count();
            if duplicates > 0 {
                warn!("服务目录中有 {} 个重复声明被忽略", duplicates);
            }
        }

        let app = configurator.make_app();
        info!("应用构建完成");
        Ok(app)
    }
}
