//! 日志初始化

use crate::settings::LoggingSettings;
use di_common::{ConfigError, ConfigResult};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 按配置初始化全局日志订阅者
///
/// `RUST_LOG` 存在时优先于配置中的级别。全局订阅者只能设置一次，
/// 重复初始化返回 [`ConfigError::LoggingInitFailed`]。
pub fn init_logging(settings: &LoggingSettings) -> ConfigResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| ConfigError::LoggingInitFailed {
            message: e.to_string(),
        })?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.show_target)
        .with_thread_ids(settings.show_thread_ids);

    if settings.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| ConfigError::LoggingInitFailed {
        message: e.to_string(),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}
