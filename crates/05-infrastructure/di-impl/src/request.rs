//! 请求对象
//!
//! 请求作用域服务在每个请求内最多创建一次，请求上下文结束时释放

use crate::locator::ServiceProvider;
use crate::registry::Registry;
use dashmap::DashMap;
use di_abstractions::ServiceLookup;
use di_common::{downcast_instance, DependencyError, DependencyResult, InterfaceKey, ServiceInstance};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

struct RequestInner {
    id: Uuid,
    registry: Arc<Registry>,
    context: Option<InterfaceKey>,
    /// 按定位器注册序号缓存的请求作用域实例
    instances: DashMap<usize, ServiceInstance>,
}

/// 请求
///
/// 克隆得到的是同一个请求的句柄。
#[derive(Clone)]
pub struct Request {
    inner: Arc<RequestInner>,
}

impl Request {
    pub(crate) fn new(registry: Arc<Registry>, context: Option<InterfaceKey>) -> Self {
        Self {
            inner: Arc::new(RequestInner {
                id: Uuid::new_v4(),
                registry,
                context,
                instances: DashMap::new(),
            }),
        }
    }

    /// 请求ID
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// 进程级注册表
    pub fn registry(&self) -> &Arc<Registry> {
        &self.inner.registry
    }

    /// 请求上下文键
    pub fn context(&self) -> Option<&InterfaceKey> {
        self.inner.context.as_ref()
    }

    /// 按请求上下文查找服务
    pub fn find_service<T>(&self, interface: &InterfaceKey, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.find_service_in(interface, self.context(), name)
    }

    /// 按指定上下文查找服务，`None` 表示不按上下文过滤
    pub fn find_service_in<T>(
        &self,
        interface: &InterfaceKey,
        context: Option<&InterfaceKey>,
        name: &str,
    ) -> DependencyResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let instance = self.find_service_instance(interface, context, name)?;
        downcast_instance::<T>(instance, interface)
    }

    /// 当前缓存的请求作用域实例数量
    pub fn cached_instances(&self) -> usize {
        self.inner.instances.len()
    }

    fn finish(&self) {
        debug!(
            "请求 {} 结束，释放 {} 个请求作用域实例",
            self.inner.id,
            self.inner.instances.len()
        );
        self.inner.instances.clear();
    }
}

impl ServiceLookup for Request {
    fn find_service_instance(
        &self,
        interface: &InterfaceKey,
        context: Option<&InterfaceKey>,
        name: &str,
    ) -> DependencyResult<ServiceInstance> {
        let (index, provider) = self
            .inner
            .registry
            .locator()
            .lookup(interface, context, name)
            .ok_or_else(|| DependencyError::not_registered(interface.to_string(), name))?;

        match provider {
            ServiceProvider::Instance(instance) => Ok(instance),
            ServiceProvider::Factory(factory) => {
                if let Some(cached) = self.inner.instances.get(&index) {
                    return Ok(cached.value().clone());
                }

                debug!("请求 {} 创建服务: {} (名称: {:?})", self.inner.id, interface, name);
                let instance = factory(self)?;
                Ok(self
                    .inner
                    .instances
                    .entry(index)
                    .or_insert(instance)
                    .value()
                    .clone())
            }
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("id", &self.inner.id)
            .field("context", &self.inner.context)
            .field("cached_instances", &self.inner.instances.len())
            .finish()
    }
}

/// 请求上下文守卫
///
/// 析构时释放请求缓存的实例，同时打断请求作用域服务与请求之间的引用环。
#[derive(Debug)]
pub struct RequestContext {
    request: Request,
}

impl RequestContext {
    pub(crate) fn new(request: Request) -> Self {
        Self { request }
    }

    /// 当前请求
    pub const fn request(&self) -> &Request {
        &self.request
    }
}

impl Deref for RequestContext {
    type Target = Request;

    fn deref(&self) -> &Self::Target {
        &self.request
    }
}

impl Drop for RequestContext {
    fn drop(&mut self) {
        self.request.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Counter;

    fn registry_with_counter_factory(calls: Arc<AtomicUsize>) -> Arc<Registry> {
        let registry = Arc::new(Registry::default());
        registry.locator().register_service_factory(
            Arc::new(move |_request: &Request| -> DependencyResult<ServiceInstance> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(Counter))
            }),
            InterfaceKey::of::<Counter>(),
            InterfaceKey::Any,
            "",
        );
        registry
    }

    #[test]
    fn test_factory_runs_once_per_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = registry_with_counter_factory(calls.clone());
        let key = InterfaceKey::of::<Counter>();

        let first = RequestContext::new(Request::new(registry.clone(), None));
        let a = first.find_service::<Counter>(&key, "").unwrap();
        let b = first.find_service::<Counter>(&key, "").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second = RequestContext::new(Request::new(registry, None));
        let c = second.find_service::<Counter>(&key, "").unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_context_drop_releases_instances() {
        let registry = registry_with_counter_factory(Arc::new(AtomicUsize::new(0)));
        let context = RequestContext::new(Request::new(registry, None));
        let request = context.request().clone();

        context
            .find_service::<Counter>(&InterfaceKey::of::<Counter>(), "")
            .unwrap();
        assert_eq!(request.cached_instances(), 1);

        drop(context);
        assert_eq!(request.cached_instances(), 0);
    }

    #[test]
    fn test_unknown_service_is_not_registered() {
        let context = RequestContext::new(Request::new(Arc::new(Registry::default()), None));
        let error = context
            .find_service::<Counter>(&InterfaceKey::of::<Counter>(), "")
            .unwrap_err();
        assert!(error.is_not_registered());
    }
}
