//! # 示例应用程序
//!
//! 演示应用作用域服务、请求作用域服务以及延迟依赖解析

use anyhow::Context;
use clap::Parser;
use di_abstractions::Autowired;
use di_common::{DependencyResult, InterfaceKey, ServiceScope};
use di_composition::{ApplicationBuilder, DiSettings, LoggingSettings};
use di_impl::{
    get_service_registry, service, Application, BaseService, RequestScopedBaseService, Service,
    ServiceArgs, ServiceCatalog,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "作用域服务注册表示例应用")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "config/di.toml")]
    config: String,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 模拟的请求数量
    #[arg(long, default_value_t = 2)]
    requests: u32,
}

/// 应用作用域的请求计数器
struct RequestCounter {
    base: BaseService,
    served: AtomicU64,
}

impl RequestCounter {
    fn next(&self) -> u64 {
        self.served.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Service for RequestCounter {
    fn scope_marker() -> Option<ServiceScope> {
        Some(ServiceScope::Application)
    }

    fn create(args: &ServiceArgs) -> DependencyResult<Self> {
        Ok(Self {
            base: BaseService::new(args)?,
            served: AtomicU64::new(0),
        })
    }
}

/// 请求作用域的问候服务
struct Greeter {
    base: RequestScopedBaseService,
    counter: Autowired<RequestCounter>,
}

impl Greeter {
    fn greet(&self, name: &str) -> DependencyResult<String> {
        let counter = self.counter.get(&self.base)?;
        Ok(format!(
            "你好, {name}! ([{}] 请求 {}, 第 {} 次服务)",
            counter.base.registry()?.name(),
            self.base.request().id(),
            counter.next()
        ))
    }
}

impl Service for Greeter {
    fn scope_marker() -> Option<ServiceScope> {
        Some(ServiceScope::Request)
    }

    fn create(args: &ServiceArgs) -> DependencyResult<Self> {
        Ok(Self {
            base: RequestScopedBaseService::new(args)?,
            counter: Autowired::by_type().bind("counter"),
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let app = build_application(&args)?;
    info!("启动示例应用");

    for name in get_service_registry(app.registry()).attribute_names() {
        info!("应用作用域服务: {}", name);
    }

    for index in 0..args.requests {
        handle_request(&app, &format!("user-{index}"))?;
    }

    for warning in app.registry().warnings() {
        warn!("注册警告 [{}]: {}", warning.recorded_at, warning.kind);
    }

    info!("应用已关闭");
    Ok(())
}

/// 构建应用
fn build_application(args: &Args) -> anyhow::Result<Application> {
    let mut settings = if Path::new(&args.config).exists() {
        DiSettings::from_file(&args.config)
            .with_context(|| format!("加载配置文件失败: {}", args.config))?
    } else {
        DiSettings::default()
    };
    settings.logging = LoggingSettings {
        level: args.log_level.clone(),
        ..LoggingSettings::development()
    };

    let catalog = ServiceCatalog::new()
        .with(service::<RequestCounter>())
        .with(service::<Greeter>());

    ApplicationBuilder::new()
        .with_settings(settings)
        .with_env_prefix("DI")
        .add_catalog(catalog)
        .build()
        .context("构建应用失败")
}

/// 处理一次请求
fn handle_request(app: &Application, name: &str) -> anyhow::Result<()> {
    let request = app.request_context();
    let greeter: Arc<Greeter> = request.find_service(&InterfaceKey::of::<Greeter>(), "")?;

    info!("{}", greeter.greet(name)?);
    let again: Arc<Greeter> = request.find_service(&InterfaceKey::of::<Greeter>(), "")?;
    info!("{}", again.greet(name)?);
    Ok(())
}
