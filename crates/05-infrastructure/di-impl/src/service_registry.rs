//! 服务注册表
//!
//! 记录所有应用作用域服务，并按推导出的属性名建立索引，供内省和调试使用

use di_common::{InterfaceKey, NamingConventions, ServiceInstance};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Default)]
struct ServiceTable {
    services: Vec<(ServiceInstance, InterfaceKey)>,
    attributes: HashMap<String, ServiceInstance>,
}

/// 服务注册表
///
/// 只追加。属性名冲突时后注册的服务覆盖属性索引，不报错；列表中两者都保留。
#[derive(Default)]
pub struct ServiceRegistry {
    table: RwLock<ServiceTable>,
}

impl ServiceRegistry {
    /// 创建空的服务注册表
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register_service(&self, instance: ServiceInstance, interface: InterfaceKey) {
        let attribute = NamingConventions::attribute_name(&interface);
        let mut table = self.table.write();
        table.attributes.insert(attribute, instance.clone());
        table.services.push((instance, interface));
    }

    /// 所有已注册的 (实例, 接口键)，按注册顺序
    pub fn services(&self) -> Vec<(ServiceInstance, InterfaceKey)> {
        self.table.read().services.clone()
    }

    /// 已注册服务数量
    pub fn len(&self) -> usize {
        self.table.read().services.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按属性名获取服务实例
    pub fn attribute(&self, name: &str) -> Option<ServiceInstance> {
        self.table.read().attributes.get(name).cloned()
    }

    /// 按属性名获取具体类型的服务
    pub fn get<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.attribute(name)
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// 所有属性名（已排序）
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.read().attributes.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.len())
            .field("attributes", &self.attribute_names())
            .finish()
    }
}
