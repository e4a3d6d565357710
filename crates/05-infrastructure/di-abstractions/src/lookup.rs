//! 服务查找抽象接口
//!
//! 依赖句柄通过这些 trait 访问进程级工具表和请求级服务定位器

use di_common::{DependencyError, DependencyResult, InterfaceKey, ServiceInstance};

/// 工具表查找 trait
///
/// 由进程级注册表实现，按规范接口键和名称查找应用作用域实例
pub trait UtilityLookup: Send + Sync {
    /// 查询工具实例，不存在时返回 `None`
    fn query_utility_instance(&self, interface: &InterfaceKey, name: &str)
        -> Option<ServiceInstance>;

    /// 获取工具实例，不存在时返回未注册错误
    fn get_utility_instance(
        &self,
        interface: &InterfaceKey,
        name: &str,
    ) -> DependencyResult<ServiceInstance> {
        self.query_utility_instance(interface, name)
            .ok_or_else(|| DependencyError::not_registered(interface.to_string(), name))
    }
}

/// 请求级服务查找 trait
///
/// 由请求对象实现；`context` 为 `None` 时不按上下文过滤
pub trait ServiceLookup: Send + Sync {
    /// 查找服务实例
    fn find_service_instance(
        &self,
        interface: &InterfaceKey,
        context: Option<&InterfaceKey>,
        name: &str,
    ) -> DependencyResult<ServiceInstance>;
}

/// 注入目标 trait
///
/// 持有依赖句柄的消费者实现此 trait，决定依赖从哪里解析
pub trait InjectionTarget {
    /// 请求绑定的消费者返回请求级服务查找
    fn service_lookup(&self) -> Option<&dyn ServiceLookup>;

    /// 进程级工具表
    fn utility_lookup(&self) -> &dyn UtilityLookup;
}
