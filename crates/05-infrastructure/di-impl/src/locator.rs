//! 请求服务定位器索引
//!
//! 保存 (接口键, 上下文键, 名称) 到实例或每请求工厂的注册

use crate::request::Request;
use di_common::{DependencyResult, InterfaceKey, ServiceInstance};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 每请求工厂，每个请求首次查找时调用
pub type RequestFactory = Arc<dyn Fn(&Request) -> DependencyResult<ServiceInstance> + Send + Sync>;

/// 服务提供方式
#[derive(Clone)]
pub enum ServiceProvider {
    /// 固定实例
    Instance(ServiceInstance),
    /// 每请求工厂
    Factory(RequestFactory),
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance"),
            Self::Factory(_) => f.write_str("Factory(<function>)"),
        }
    }
}

/// 定位器注册信息
#[derive(Debug, Clone)]
pub struct LocatorRegistration {
    /// 接口键
    pub interface: InterfaceKey,
    /// 上下文键，`Any` 表示适用于任意上下文
    pub context: InterfaceKey,
    /// 显示名称
    pub name: String,
    /// 提供方式
    pub provider: ServiceProvider,
}

impl LocatorRegistration {
    fn matches(&self, interface: &InterfaceKey, context: Option<&InterfaceKey>, name: &str) -> bool {
        if self.name != name || !interface.matches(&self.interface) {
            return false;
        }

        match context {
            None => true,
            Some(context) => self.context.is_any() || context.resolve() == self.context.resolve(),
        }
    }
}

/// 请求服务定位器索引
#[derive(Default)]
pub struct ServiceLocator {
    registrations: RwLock<Vec<LocatorRegistration>>,
}

impl ServiceLocator {
    /// 创建空的定位器
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册固定实例
    pub fn register_service(
        &self,
        instance: ServiceInstance,
        interface: InterfaceKey,
        context: InterfaceKey,
        name: impl Into<String>,
    ) {
        self.push(interface, context, name.into(), ServiceProvider::Instance(instance));
    }

    /// 注册每请求工厂
    pub fn register_service_factory(
        &self,
        factory: RequestFactory,
        interface: InterfaceKey,
        context: InterfaceKey,
        name: impl Into<String>,
    ) {
        self.push(interface, context, name.into(), ServiceProvider::Factory(factory));
    }

    fn push(&self, interface: InterfaceKey, context: InterfaceKey, name: String, provider: ServiceProvider) {
        debug!(
            "注册定位器服务: {} (上下文: {}, 名称: {:?}, 提供方式: {:?})",
            interface, context, name, provider
        );
        self.registrations.write().push(LocatorRegistration {
            interface,
            context,
            name,
            provider,
        });
    }

    /// 查找匹配的注册，后注册者优先，返回注册序号和提供方式
    ///
    /// `context` 为 `None` 时不按上下文过滤。
    pub fn lookup(
        &self,
        interface: &InterfaceKey,
        context: Option<&InterfaceKey>,
        name: &str,
    ) -> Option<(usize, ServiceProvider)> {
        self.registrations
            .read()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, reg)| reg.matches(interface, context, name))
            .map(|(index, reg)| (index, reg.provider.clone()))
    }

    /// 已注册数量
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ServiceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceLocator")
            .field("registrations", &self.len())
            .finish()
    }
}
