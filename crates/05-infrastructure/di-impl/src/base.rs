//! 服务基础类型
//!
//! 提供服务构造参数以及应用/请求作用域服务的基础实现

use crate::registry::{Registry, RegistryHandle};
use crate::request::Request;
use di_abstractions::{InjectionTarget, ServiceLookup, UtilityLookup};
use di_common::{DependencyError, DependencyResult, InterfaceKey};
use std::sync::Arc;

/// 服务构造参数
///
/// 应用作用域工厂收到 `registry`，请求作用域工厂收到 `request`。
#[derive(Debug, Clone, Default)]
pub struct ServiceArgs {
    registry: Option<Arc<Registry>>,
    request: Option<Request>,
}

impl ServiceArgs {
    /// 应用作用域构造参数
    pub fn for_registry(registry: Arc<Registry>) -> Self {
        Self {
            registry: Some(registry),
            request: None,
        }
    }

    /// 请求作用域构造参数
    pub fn for_request(request: Request) -> Self {
        Self {
            registry: None,
            request: Some(request),
        }
    }

    /// 注册表参数
    pub const fn registry(&self) -> Option<&Arc<Registry>> {
        self.registry.as_ref()
    }

    /// 请求参数
    pub const fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }
}

/// 应用作用域服务基础
///
/// 实例本身由注册表持有，这里只保留注册表的弱引用。
#[derive(Debug, Clone)]
pub struct BaseService {
    registry: RegistryHandle,
}

impl BaseService {
    /// 从构造参数创建，缺少 `registry` 时失败
    pub fn new(args: &ServiceArgs) -> DependencyResult<Self> {
        let registry = args
            .registry()
            .ok_or_else(|| DependencyError::missing_argument("BaseService", "registry"))?;
        Ok(Self {
            registry: RegistryHandle::new(registry),
        })
    }

    /// 进程级注册表，注册表已释放时失败
    pub fn registry(&self) -> DependencyResult<Arc<Registry>> {
        self.registry.upgrade()
    }
}

impl InjectionTarget for BaseService {
    fn service_lookup(&self) -> Option<&dyn ServiceLookup> {
        None
    }

    fn utility_lookup(&self) -> &dyn UtilityLookup {
        &self.registry
    }
}

/// 请求作用域服务基础
///
/// `registry` 和 `context` 从请求中派生。
#[derive(Debug, Clone)]
pub struct RequestScopedBaseService {
    request: Request,
    registry: Arc<Registry>,
    context: Option<InterfaceKey>,
}

impl RequestScopedBaseService {
    /// 从构造参数创建，缺少 `request` 时失败
    pub fn new(args: &ServiceArgs) -> DependencyResult<Self> {
        let request = args.request().cloned().ok_or_else(|| {
            DependencyError::missing_argument("RequestScopedBaseService", "request")
        })?;

        Ok(Self {
            registry: request.registry().clone(),
            context: request.context().cloned(),
            request,
        })
    }

    /// 当前请求
    pub const fn request(&self) -> &Request {
        &self.request
    }

    /// 进程级注册表
    pub const fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// 请求上下文键
    pub const fn context(&self) -> Option<&InterfaceKey> {
        self.context.as_ref()
    }
}

impl InjectionTarget for RequestScopedBaseService {
    fn service_lookup(&self) -> Option<&dyn ServiceLookup> {
        Some(&self.request)
    }

    fn utility_lookup(&self) -> &dyn UtilityLookup {
        self.registry.as_ref()
    }
}
