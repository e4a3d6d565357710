//! 服务实例类型

use crate::errors::{DependencyError, DependencyResult};
use crate::metadata::InterfaceKey;
use std::any::Any;
use std::sync::Arc;

/// 类型擦除后的服务实例
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// 将服务实例转换为具体类型
pub fn downcast_instance<T>(
    instance: ServiceInstance,
    interface: &InterfaceKey,
) -> DependencyResult<Arc<T>>
where
    T: Send + Sync + 'static,
{
    instance
        .downcast::<T>()
        .map_err(|_| DependencyError::TypeMismatch {
            interface: interface.to_string(),
            expected: std::any::type_name::<T>().to_string(),
        })
}
