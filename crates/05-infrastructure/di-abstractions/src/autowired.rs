//! 依赖句柄
//!
//! 在消费者上声明对服务的依赖，首次访问时解析并缓存到该消费者实例

use crate::lookup::InjectionTarget;
use crate::reify::Reify;
use di_common::{downcast_instance, DependencyError, DependencyResult, InterfaceKey};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 依赖句柄
///
/// 请求绑定的消费者通过请求的服务定位器解析（不按上下文过滤），
/// 其余消费者直接查询进程级工具表。找不到注册时错误原样返回给调用者。
pub struct Autowired<T> {
    interface: InterfaceKey,
    name: String,
    slot: Reify<Arc<T>>,
}

/// 声明依赖句柄
pub fn autowired<T>(interface: InterfaceKey, name: impl Into<String>) -> Autowired<T>
where
    T: Send + Sync + 'static,
{
    Autowired {
        interface,
        name: name.into(),
        slot: Reify::new(),
    }
}

impl<T> Autowired<T>
where
    T: Send + Sync + 'static,
{
    /// 以 `T` 自身作为接口键声明依赖
    pub fn by_type() -> Self {
        autowired(InterfaceKey::of::<T>(), "")
    }

    /// 以通配接口键和名称声明依赖
    pub fn by_name(name: impl Into<String>) -> Self {
        autowired(InterfaceKey::Any, name)
    }

    /// 绑定属性名
    #[must_use]
    pub fn bind(mut self, attribute: &'static str) -> Self {
        self.slot = self.slot.bind(attribute);
        self
    }

    /// 声明的接口键
    pub const fn interface(&self) -> &InterfaceKey {
        &self.interface
    }

    /// 声明的显示名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 是否已解析
    pub fn is_resolved(&self) -> bool {
        self.slot.is_resolved()
    }

    /// 通过第一个绑定的属性名读取依赖
    pub fn get(&self, target: &dyn InjectionTarget) -> DependencyResult<Arc<T>> {
        let attribute = self.slot.names().first().copied().ok_or_else(|| {
            DependencyError::AttributeNotBound {
                attribute: format!("Autowired<{}>", std::any::type_name::<T>()),
            }
        })?;
        self.get_as(attribute, target)
    }

    /// 通过指定属性名（别名）读取依赖
    pub fn get_as(
        &self,
        attribute: &str,
        target: &dyn InjectionTarget,
    ) -> DependencyResult<Arc<T>> {
        self.slot
            .get_or_try_init(attribute, || self.resolve(attribute, target))
    }

    fn resolve(&self, attribute: &str, target: &dyn InjectionTarget) -> DependencyResult<Arc<T>> {
        debug!(
            "解析依赖 {}: {} (名称: {:?})",
            attribute, self.interface, self.name
        );

        let instance = match target.service_lookup() {
            Some(locator) => locator.find_service_instance(&self.interface, None, &self.name)?,
            None => target
                .utility_lookup()
                .get_utility_instance(self.interface.resolve(), &self.name)?,
        };

        downcast_instance::<T>(instance, &self.interface)
    }
}

impl<T> fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autowired")
            .field("interface", &self.interface)
            .field("name", &self.name)
            .field("slot", &self.slot)
            .finish()
    }
}
