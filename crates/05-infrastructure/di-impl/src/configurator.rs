//! 注册调度器
//!
//! 按作用域把服务工厂注册为应用单例或每请求工厂

use crate::application::Application;
use crate::base::ServiceArgs;
use crate::declaration::ServiceCatalog;
use crate::registry::{get_service_registry, Registry, RegistryWarningKind, DEFAULT_REGISTRY_NAME};
use crate::request::Request;
use di_common::{
    ConfigurationResult, DependencyError, DependencyResult, DiResult, InterfaceKey, ServiceInstance, ServiceScope,
};
use std::sync::Arc;
use tracing::{debug, info};

/// 类型擦除后的服务工厂
pub type ServiceFactory =
    Arc<dyn Fn(&ServiceArgs) -> DependencyResult<ServiceInstance> + Send + Sync>;

/// 注册选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOptions {
    /// 作用域
    pub scope: ServiceScope,
    /// 接口键，默认通配
    pub interface: InterfaceKey,
    /// 显示名称
    pub name: String,
    /// 上下文键，默认通配
    pub context: InterfaceKey,
    /// 声明时使用的旧版作用域别名
    pub deprecated_alias: Option<&'static str>,
}

impl RegistrationOptions {
    /// 以指定作用域创建选项
    pub fn new(scope: ServiceScope) -> Self {
        Self {
            scope,
            interface: InterfaceKey::Any,
            name: String::new(),
            context: InterfaceKey::Any,
            deprecated_alias: None,
        }
    }

    /// 以作用域名称创建选项，兼容旧版别名
    pub fn with_scope_name(scope: &str) -> ConfigurationResult<Self> {
        let parsed = ServiceScope::parse(scope)?;
        let mut options = Self::new(parsed.scope);
        options.deprecated_alias = parsed.deprecated_alias;
        Ok(options)
    }

    /// 设置接口键
    #[must_use]
    pub fn interface(mut self, interface: InterfaceKey) -> Self {
        self.interface = interface;
        self
    }

    /// 设置显示名称
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置上下文键
    #[must_use]
    pub fn context(mut self, context: InterfaceKey) -> Self {
        self.context = context;
        self
    }
}

/// 注册结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// 应用作用域实例已创建并注册
    Registered,
    /// 请求作用域工厂已安装，实例在请求中创建
    Deferred,
    /// 重复注册，已忽略
    Duplicate,
}

/// 配置器
///
/// 启动阶段通过 `&mut self` 串行完成所有注册，随后生成 [`Application`]。
#[derive(Debug)]
pub struct Configurator {
    registry: Arc<Registry>,
}

impl Configurator {
    /// 使用默认名称的注册表创建配置器
    pub fn new() -> Self {
        Self::with_registry_name(DEFAULT_REGISTRY_NAME)
    }

    /// 使用指定名称的注册表创建配置器
    pub fn with_registry_name(name: impl Into<String>) -> Self {
        let registry = Arc::new(Registry::new(name));
        get_service_registry(&registry);
        Self { registry }
    }

    /// 进程级注册表
    pub const fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// 注册依赖注入服务
    pub fn register_di_service<S, F>(
        &mut self,
        factory: F,
        options: RegistrationOptions,
    ) -> DependencyResult<RegistrationOutcome>
    where
        S: Send + Sync + 'static,
        F: Fn(&ServiceArgs) -> DependencyResult<S> + Send + Sync + 'static,
    {
        let factory: ServiceFactory =
            Arc::new(move |args: &ServiceArgs| -> DependencyResult<ServiceInstance> {
                Ok(Arc::new(factory(args)?))
            });
        self.register_di_service_factory(factory, options)
    }

    /// 注册类型擦除后的服务工厂
    pub fn register_di_service_factory(
        &mut self,
        factory: ServiceFactory,
        options: RegistrationOptions,
    ) -> DependencyResult<RegistrationOutcome> {
        if let Some(alias) = options.deprecated_alias {
            self.registry
                .record_warning(RegistryWarningKind::DeprecatedScope {
                    alias: alias.to_string(),
                    interface: options.interface.to_string(),
                });
        }

        match options.scope {
            ServiceScope::Application => self.register_application_service(&factory, options),
            ServiceScope::Request => Ok(self.register_request_service(factory, options)),
        }
    }

    fn register_application_service(
        &mut self,
        factory: &ServiceFactory,
        options: RegistrationOptions,
    ) -> DependencyResult<RegistrationOutcome> {
        let resolved = options.interface.resolve().clone();

        if self.registry.has_utility(&resolved, &options.name) {
            self.registry
                .record_warning(RegistryWarningKind::DuplicateRegistration {
                    interface: resolved.to_string(),
                    name: options.name,
                });
            return Ok(RegistrationOutcome::Duplicate);
        }

        let instance = factory(&ServiceArgs::for_registry(self.registry.clone()))?;

        get_service_registry(&self.registry)
            .register_service(instance.clone(), options.interface.clone());
        self.registry
            .register_utility(instance.clone(), &resolved, &options.name);
        self.registry.locator().register_service(
            instance,
            options.interface.clone(),
            options.context,
            options.name.clone(),
        );

        info!(
            "[{}] 注册应用作用域服务: {} (名称: {:?})",
            self.registry.name(),
            options.interface,
            options.name
        );
        Ok(RegistrationOutcome::Registered)
    }

    fn register_request_service(
        &mut self,
        factory: ServiceFactory,
        options: RegistrationOptions,
    ) -> RegistrationOutcome {
        info!(
            "[{}] 注册请求作用域服务: {} (名称: {:?})",
            self.registry.name(),
            options.interface,
            options.name
        );

        self.registry.locator().register_service_factory(
            Arc::new(move |request: &Request| factory(&ServiceArgs::for_request(request.clone()))),
            options.interface,
            options.context,
            options.name,
        );
        RegistrationOutcome::Deferred
    }

    /// 直接注册固定实例到请求服务定位器
    pub fn register_service<S>(
        &mut self,
        instance: Arc<S>,
        interface: InterfaceKey,
        context: InterfaceKey,
        name: impl Into<String>,
    ) where
        S: Send + Sync + 'static,
    {
        self.registry
            .locator()
            .register_service(instance, interface, context, name);
    }

    /// 直接注册每请求工厂到请求服务定位器
    pub fn register_service_factory<S, F>(
        &mut self,
        factory: F,
        interface: InterfaceKey,
        context: InterfaceKey,
        name: impl Into<String>,
    ) where
        S: Send + Sync + 'static,
        F: Fn(&Request) -> DependencyResult<S> + Send + Sync + 'static,
    {
        self.registry.locator().register_service_factory(
            Arc::new(move |request: &Request| -> DependencyResult<ServiceInstance> {
                Ok(Arc::new(factory(request)?))
            }),
            interface,
            context,
            name,
        );
    }

    /// 按顺序注册服务目录中的所有声明
    ///
    /// 任何声明无法确定作用域或构造失败都会中止注册，构造错误包装为
    /// [`DependencyError::ComponentCreationFailed`]。
    pub fn scan_services(&mut self, catalog: &ServiceCatalog) -> DiResult<Vec<RegistrationOutcome>> {
        debug!(
            "[{}] 扫描服务目录，共 {} 个声明",
            self.registry.name(),
            catalog.len()
        );

        let mut outcomes = Vec::with_capacity(catalog.len());
        for declaration in catalog.iter() {
            let options = declaration.registration_options()?;
            let outcome = self
                .register_di_service_factory(declaration.factory().clone(), options)
                .map_err(|source| DependencyError::ComponentCreationFailed {
                    type_name: declaration.type_info().name.clone(),
                    source: Box::new(source),
                })?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// 完成配置，生成应用
    pub fn make_app(self) -> Application {
        info!(
            "[{}] 配置完成: {} 个工具, {} 个定位器注册",
            self.registry.name(),
            self.registry.utility_count(),
            self.registry.locator().len()
        );
        Application::new(self.registry)
    }
}

impl Default for Configurator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Settings {
        value: u32,
    }

    #[test]
    fn test_application_scope_constructs_immediately() {
        let mut config = Configurator::new();
        let outcome = config
            .register_di_service(
                |_args: &ServiceArgs| Ok(Settings { value: 3 }),
                RegistrationOptions::new(ServiceScope::Application)
                    .interface(InterfaceKey::of::<Settings>()),
            )
            .unwrap();

        assert_eq!(outcome, RegistrationOutcome::Registered);
        let registry = config.registry();
        let settings = registry
            .get_utility::<Settings>(&InterfaceKey::of::<Settings>(), "")
            .unwrap();
        assert_eq!(settings.value, 3);
        assert_eq!(get_service_registry(registry).len(), 1);
        assert_eq!(registry.locator().len(), 1);
    }

    #[test]
    fn test_duplicate_registration_is_warned_and_skipped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut config = Configurator::new();

        for _ in 0..2 {
            let calls = calls.clone();
            config
                .register_di_service(
                    move |_args: &ServiceArgs| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(Settings { value: 1 })
                    },
                    RegistrationOptions::new(ServiceScope::Application)
                        .interface(InterfaceKey::of::<Settings>())
                        .name("settings"),
                )
                .unwrap();
        }

        let registry = config.registry();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(get_service_registry(registry).len(), 1);
        assert_eq!(registry.utility_count(), 1);

        let warnings = registry.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0].kind,
            RegistryWarningKind::DuplicateRegistration { ref name, .. } if name == "settings"
        ));
    }

    #[test]
    fn test_request_scope_defers_construction() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut config = Configurator::new();

        let outcome = config
            .register_di_service(
                move |_args: &ServiceArgs| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Settings { value: 9 })
                },
                RegistrationOptions::new(ServiceScope::Request)
                    .interface(InterfaceKey::of::<Settings>()),
            )
            .unwrap();

        assert_eq!(outcome, RegistrationOutcome::Deferred);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(config.registry().utility_count(), 0);
    }

    #[test]
    fn test_deprecated_scope_alias_is_recorded() {
        let mut config = Configurator::new();
        let options = RegistrationOptions::with_scope_name("global")
            .unwrap()
            .interface(InterfaceKey::of::<Settings>());
        assert_eq!(options.scope, ServiceScope::Application);

        let outcome = config
            .register_di_service(|_args: &ServiceArgs| Ok(Settings { value: 0 }), options)
            .unwrap();

        assert_eq!(outcome, RegistrationOutcome::Registered);
        assert!(matches!(
            config.registry().warnings()[0].kind,
            RegistryWarningKind::DeprecatedScope { .. }
        ));
    }

    #[test]
    fn test_construction_error_propagates() {
        let mut config = Configurator::new();
        let result = config.register_di_service(
            |args: &ServiceArgs| crate::base::RequestScopedBaseService::new(args),
            RegistrationOptions::new(ServiceScope::Application),
        );

        assert!(result.is_err());
        assert_eq!(config.registry().utility_count(), 0);
    }
}
