//! # 依赖注入组合层
//!
//! 负责把配置、日志和服务目录组合成一个可运行的 [`Application`](di_impl::Application)。
//!
//! ## 主要功能
//!
//! - **配置**: 从 TOML 加载 [`DiSettings`]，支持环境变量覆盖和验证
//! - **日志**: 基于 `tracing-subscriber` 初始化全局日志
//! - **应用构建器**: 使用构建者模式注册服务目录并生成应用
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_composition::ApplicationBuilder;
//! use di_impl::ServiceCatalog;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = ApplicationBuilder::new()
//!         .with_settings_file("di.toml")?
//!         .with_env_prefix("APP")
//!         .add_catalog(ServiceCatalog::new())
//!         .build()?;
//!
//!     let request = app.request_context();
//!     println!("请求: {}", request.id());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod logging;
pub mod settings;

pub use builder::ApplicationBuilder;
pub use logging::init_logging;
pub use settings::{DiSettings, LoggingSettings, RegistrySettings, LOG_LEVELS};
