//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务查找接缝和延迟解析的依赖句柄。
//!
//! ## 核心接口
//!
//! - [`UtilityLookup`] - 进程级工具表查找
//! - [`ServiceLookup`] - 请求级服务查找
//! - [`InjectionTarget`] - 依赖句柄的消费者
//! - [`Reify`] - 延迟记忆单元
//! - [`Autowired`] - 依赖句柄

pub mod autowired;
pub mod lookup;
pub mod reify;

pub use autowired::*;
pub use lookup::*;
pub use reify::*;
