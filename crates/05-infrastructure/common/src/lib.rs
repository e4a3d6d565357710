//! # DI Common
//!
//! 作用域依赖注入层的公共类型。
//!
//! ## 核心类型
//!
//! - [`InterfaceKey`] - 服务接口键（支持通配与别名）
//! - [`ServiceScope`] - 服务作用域（应用/请求）
//! - [`NamingConventions`] - 服务注册表属性命名约定
//! - [`ServiceInstance`] - 类型擦除后的服务实例
//! - [`DependencyError`] / [`ConfigurationError`] - 错误类型

pub mod component;
pub mod conventions;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use component::*;
pub use conventions::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
