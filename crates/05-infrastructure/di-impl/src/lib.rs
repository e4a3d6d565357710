//! # 依赖注入具体实现
//!
//! 提供进程级注册表、请求服务定位器、作用域注册调度以及服务声明。
//!
//! ## 基本使用
//!
//! ```rust
//! use di_abstractions::Autowired;
//! use di_common::{DependencyResult, ServiceScope};
//! use di_impl::{
//!     service, BaseService, Configurator, RequestScopedBaseService, Service, ServiceArgs,
//!     ServiceCatalog,
//! };
//! use std::sync::Arc;
//!
//! struct Clock {
//!     base: BaseService,
//! }
//!
//! impl Service for Clock {
//!     fn scope_marker() -> Option<ServiceScope> {
//!         Some(ServiceScope::Application)
//!     }
//!
//!     fn create(args: &ServiceArgs) -> DependencyResult<Self> {
//!         Ok(Self { base: BaseService::new(args)? })
//!     }
//! }
//!
//! struct Greeter {
//!     base: RequestScopedBaseService,
//!     clock: Autowired<Clock>,
//! }
//!
//! impl Greeter {
//!     fn clock(&self) -> DependencyResult<Arc<Clock>> {
//!         self.clock.get(&self.base)
//!     }
//! }
//!
//! impl Service for Greeter {
//!     fn create(args: &ServiceArgs) -> DependencyResult<Self> {
//!         Ok(Self {
//!             base: RequestScopedBaseService::new(args)?,
//!             clock: Autowired::by_type().bind("clock"),
//!         })
//!     }
//! }
//!
//! let catalog = ServiceCatalog::new()
//!     .with(service::<Clock>())
//!     .with(service::<Greeter>().with_scope(ServiceScope::Request));
//!
//! let mut config = Configurator::new();
//! config.scan_services(&catalog).unwrap();
//! let app = config.make_app();
//!
//! let request = app.request_context();
//! let greeter: Arc<Greeter> = request
//!     .find_service(&di_common::InterfaceKey::of::<Greeter>(), "")
//!     .unwrap();
//! assert!(Arc::ptr_eq(&greeter.clock().unwrap(), &greeter.clock().unwrap()));
//! ```

pub mod application;
pub mod base;
pub mod configurator;
pub mod declaration;
pub mod locator;
pub mod registry;
pub mod request;
pub mod service_registry;

pub use application::Application;
pub use base::{BaseService, RequestScopedBaseService, ServiceArgs};
pub use configurator::{Configurator, RegistrationOptions, RegistrationOutcome, ServiceFactory};
pub use declaration::{service, Service, ServiceCatalog, ServiceDeclaration};
pub use locator::{LocatorRegistration, RequestFactory, ServiceLocator, ServiceProvider};
pub use registry::{
    get_service_registry, Registry, RegistryHandle, RegistryWarning, RegistryWarningKind,
    DEFAULT_REGISTRY_NAME,
};
pub use request::{Request, RequestContext};
pub use service_registry::ServiceRegistry;
