//! 进程级组件注册表
//!
//! 持有工具表、请求服务定位器索引、服务注册表以及注册过程中的诊断信息

use crate::locator::ServiceLocator;
use crate::service_registry::ServiceRegistry;
use chrono::{DateTime, Utc};
use di_abstractions::UtilityLookup;
use di_common::{downcast_instance, DependencyError, DependencyResult, InterfaceKey, ServiceInstance};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};
use uuid::Uuid;

/// 默认注册表名称
pub const DEFAULT_REGISTRY_NAME: &str = "default";

/// 工具注册信息
#[derive(Clone)]
struct UtilityRegistration {
    /// 规范接口键
    interface: InterfaceKey,
    /// 显示名称
    name: String,
    /// 实例
    instance: ServiceInstance,
}

/// 注册诊断类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryWarningKind {
    /// 同一 (接口键, 名称) 的重复注册，首次注册生效
    DuplicateRegistration { interface: String, name: String },
    /// 使用了已弃用的作用域别名
    DeprecatedScope { alias: String, interface: String },
}

impl fmt::Display for RegistryWarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRegistration { interface, name } => {
                write!(f, "服务重复注册: {interface} (名称: {name:?})，已忽略")
            }
            Self::DeprecatedScope { alias, interface } => {
                write!(f, "服务 {interface} 使用了已弃用的作用域 '{alias}'，按 'application' 处理")
            }
        }
    }
}

/// 注册诊断
#[derive(Debug, Clone)]
pub struct RegistryWarning {
    /// 诊断类型
    pub kind: RegistryWarningKind,
    /// 记录时间
    pub recorded_at: DateTime<Utc>,
}

/// 进程级组件注册表
pub struct Registry {
    id: Uuid,
    name: String,
    utilities: RwLock<Vec<UtilityRegistration>>,
    locator: ServiceLocator,
    services: OnceCell<ServiceRegistry>,
    warnings: RwLock<Vec<RegistryWarning>>,
}

impl Registry {
    /// 创建新的注册表
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            utilities: RwLock::new(Vec::new()),
            locator: ServiceLocator::new(),
            services: OnceCell::new(),
            warnings: RwLock::new(Vec::new()),
        }
    }

    /// 注册表ID
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// 注册表名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 请求服务定位器索引
    pub const fn locator(&self) -> &ServiceLocator {
        &self.locator
    }

    /// 注册工具，同一规范键和名称的已有注册会被替换
    pub fn register_utility(&self, instance: ServiceInstance, interface: &InterfaceKey, name: &str) {
        let interface = interface.resolve().clone();
        debug!("注册工具: {} (名称: {:?})", interface, name);

        let mut utilities = self.utilities.write();
        utilities.retain(|reg| !(reg.interface == interface && reg.name == name));
        utilities.push(UtilityRegistration {
            interface,
            name: name.to_string(),
            instance,
        });
    }

    /// 工具表中是否已有该规范键和名称的注册（精确匹配，不做通配）
    pub fn has_utility(&self, interface: &InterfaceKey, name: &str) -> bool {
        let interface = interface.resolve();
        self.utilities
            .read()
            .iter()
            .any(|reg| &reg.interface == interface && reg.name == name)
    }

    /// 查询工具，`Any` 键匹配任意接口，后注册者优先
    pub fn query_utility(&self, interface: &InterfaceKey, name: &str) -> Option<ServiceInstance> {
        self.utilities
            .read()
            .iter()
            .rev()
            .find(|reg| reg.name == name && interface.matches(&reg.interface))
            .map(|reg| reg.instance.clone())
    }

    /// 获取具体类型的工具
    pub fn get_utility<T>(&self, interface: &InterfaceKey, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let instance = self.get_utility_instance(interface, name)?;
        downcast_instance::<T>(instance, interface)
    }

    /// 已注册工具数量
    pub fn utility_count(&self) -> usize {
        self.utilities.read().len()
    }

    /// 记录诊断并输出警告日志
    pub(crate) fn record_warning(&self, kind: RegistryWarningKind) {
        warn!("[{}] {}", self.name, kind);
        self.warnings.write().push(RegistryWarning {
            kind,
            recorded_at: Utc::now(),
        });
    }

    /// 已记录的诊断
    pub fn warnings(&self) -> Vec<RegistryWarning> {
        self.warnings.read().clone()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_NAME)
    }
}

impl UtilityLookup for Registry {
    fn query_utility_instance(
        &self,
        interface: &InterfaceKey,
        name: &str,
    ) -> Option<ServiceInstance> {
        self.query_utility(interface, name)
    }
}

/// 注册表弱引用
///
/// 应用作用域实例被注册表持有，因此只能弱引用注册表。
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    name: String,
    inner: Weak<Registry>,
}

impl RegistryHandle {
    /// 创建指向 `registry` 的弱引用
    pub fn new(registry: &Arc<Registry>) -> Self {
        Self {
            name: registry.name.clone(),
            inner: Arc::downgrade(registry),
        }
    }

    /// 获取注册表，注册表已释放时失败
    pub fn upgrade(&self) -> DependencyResult<Arc<Registry>> {
        self.inner
            .upgrade()
            .ok_or_else(|| DependencyError::RegistryReleased {
                registry: self.name.clone(),
            })
    }
}

impl UtilityLookup for RegistryHandle {
    fn query_utility_instance(
        &self,
        interface: &InterfaceKey,
        name: &str,
    ) -> Option<ServiceInstance> {
        self.inner.upgrade()?.query_utility(interface, name)
    }

    fn get_utility_instance(
        &self,
        interface: &InterfaceKey,
        name: &str,
    ) -> DependencyResult<ServiceInstance> {
        self.upgrade()?.get_utility_instance(interface, name)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("utilities", &self.utility_count())
            .field("locator", &self.locator)
            .finish()
    }
}

/// 获取注册表上的服务注册表，首次调用时创建
pub fn get_service_registry(registry: &Registry) -> &ServiceRegistry {
    registry.services.get_or_init(ServiceRegistry::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct ServiceTwo;

    #[test]
    fn test_get_service_registry_is_idempotent() {
        let registry = Registry::default();
        let first = get_service_registry(&registry) as *const ServiceRegistry;
        let second = get_service_registry(&registry) as *const ServiceRegistry;
        assert_eq!(first, second);
    }

    #[test]
    fn test_utilities_are_stored_under_resolved_key() {
        let registry = Registry::default();
        let canonical = InterfaceKey::of::<ServiceTwo>();
        let alias = InterfaceKey::alias("ServiceTwoProxy", canonical.clone());

        registry.register_utility(Arc::new(ServiceTwo), &alias, "");

        assert!(registry.has_utility(&canonical, ""));
        assert!(registry.has_utility(&alias, ""));
        assert!(!registry.has_utility(&canonical, "other"));
        assert!(registry.get_utility::<ServiceTwo>(&canonical, "").is_ok());
    }

    #[test]
    fn test_any_key_matches_by_name() {
        let registry = Registry::default();
        registry.register_utility(Arc::new(ServiceTwo), &InterfaceKey::of::<ServiceTwo>(), "two");

        assert!(registry.query_utility(&InterfaceKey::Any, "two").is_some());
        assert!(registry.query_utility(&InterfaceKey::Any, "three").is_none());
        assert!(!registry.has_utility(&InterfaceKey::Any, "two"));
    }

    #[test]
    fn test_missing_utility_is_not_registered_error() {
        let registry = Registry::default();
        let error = registry
            .get_utility::<ServiceTwo>(&InterfaceKey::of::<ServiceTwo>(), "")
            .unwrap_err();
        assert!(error.is_not_registered());
    }

    #[test]
    fn test_handle_reports_released_registry() {
        let registry = Arc::new(Registry::new("short-lived"));
        registry.register_utility(Arc::new(ServiceTwo), &InterfaceKey::of::<ServiceTwo>(), "");
        let handle = RegistryHandle::new(&registry);

        assert!(handle
            .get_utility_instance(&InterfaceKey::of::<ServiceTwo>(), "")
            .is_ok());

        drop(registry);
        assert!(handle
            .query_utility_instance(&InterfaceKey::of::<ServiceTwo>(), "")
            .is_none());
        assert!(matches!(
            handle.upgrade(),
            Err(DependencyError::RegistryReleased { ref registry }) if registry == "short-lived"
        ));
    }

    #[test]
    fn test_record_warning() {
        let registry = Registry::new("warnings");
        registry.record_warning(RegistryWarningKind::DuplicateRegistration {
            interface: "ServiceTwo".to_string(),
            name: String::new(),
        });

        let warnings = registry.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].kind.to_string().contains("ServiceTwo"));
    }
}
