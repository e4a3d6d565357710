//! 服务声明
//!
//! 服务在启动阶段被声明并收集到显式的服务目录中，由 [`Configurator::scan_services`]
//! 统一注册。
//!
//! [`Configurator::scan_services`]: crate::Configurator::scan_services

use crate::base::ServiceArgs;
use crate::configurator::{RegistrationOptions, ServiceFactory};
use di_common::{
    ConfigurationError, ConfigurationResult, DependencyResult, InterfaceKey, ServiceInstance,
    ServiceScope, TypeInfo,
};
use std::fmt;
use std::sync::Arc;

/// 可注入服务 trait
pub trait Service: Send + Sync + Sized + 'static {
    /// 作用域标记，声明时未显式指定作用域才会使用
    fn scope_marker() -> Option<ServiceScope> {
        None
    }

    /// 从构造参数创建服务
    fn create(args: &ServiceArgs) -> DependencyResult<Self>;
}

/// 服务声明
#[derive(Clone)]
pub struct ServiceDeclaration {
    type_info: TypeInfo,
    factory: ServiceFactory,
    scope: Option<ServiceScope>,
    scope_marker: Option<ServiceScope>,
    deprecated_alias: Option<&'static str>,
    interface: Option<InterfaceKey>,
    name: String,
    context: InterfaceKey,
}

/// 声明服务
///
/// 未指定接口键时以 `T` 自身作为键；未指定作用域时使用 `T` 的作用域标记。
pub fn service<T: Service>() -> ServiceDeclaration {
    ServiceDeclaration {
        type_info: TypeInfo::of::<T>(),
        factory: Arc::new(|args: &ServiceArgs| -> DependencyResult<ServiceInstance> {
            Ok(Arc::new(T::create(args)?))
        }),
        scope: None,
        scope_marker: T::scope_marker(),
        deprecated_alias: None,
        interface: None,
        name: String::new(),
        context: InterfaceKey::Any,
    }
}

impl ServiceDeclaration {
    /// 设置接口键
    #[must_use]
    pub fn with_interface(mut self, interface: InterfaceKey) -> Self {
        self.interface = Some(interface);
        self
    }

    /// 设置显示名称
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置上下文键
    #[must_use]
    pub fn with_context(mut self, context: InterfaceKey) -> Self {
        self.context = context;
        self
    }

    /// 显式设置作用域
    #[must_use]
    pub fn with_scope(mut self, scope: ServiceScope) -> Self {
        self.scope = Some(scope);
        self.deprecated_alias = None;
        self
    }

    /// 按名称设置作用域，无效名称立即失败
    pub fn with_scope_name(mut self, scope: &str) -> ConfigurationResult<Self> {
        let parsed = ServiceScope::parse(scope)?;
        self.scope = Some(parsed.scope);
        self.deprecated_alias = parsed.deprecated_alias;
        Ok(self)
    }

    /// 声明的服务类型
    pub const fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 服务工厂
    pub const fn factory(&self) -> &ServiceFactory {
        &self.factory
    }

    /// 注册使用的接口键
    pub fn interface(&self) -> InterfaceKey {
        self.interface
            .clone()
            .unwrap_or_else(|| InterfaceKey::Class(self.type_info.clone()))
    }

    /// 显示名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 确定生效的作用域
    ///
    /// 显式作用域优先，其次是类型的作用域标记，都没有时返回配置错误。
    pub fn effective_scope(&self) -> ConfigurationResult<ServiceScope> {
        self.scope
            .or(self.scope_marker)
            .ok_or_else(|| ConfigurationError::ScopeNotInferable {
                type_name: self.type_info.name.clone(),
            })
    }

    /// 转换为注册选项
    pub fn registration_options(&self) -> ConfigurationResult<RegistrationOptions> {
        let mut options = RegistrationOptions::new(self.effective_scope()?)
            .interface(self.interface())
            .name(self.name.clone())
            .context(self.context.clone());
        options.deprecated_alias = self.deprecated_alias;
        Ok(options)
    }
}

impl fmt::Debug for ServiceDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDeclaration")
            .field("type", &self.type_info.name)
            .field("scope", &self.scope)
            .field("scope_marker", &self.scope_marker)
            .field("interface", &self.interface)
            .field("name", &self.name)
            .field("context", &self.context)
            .finish()
    }
}

/// 服务目录
///
/// 有序的服务声明列表，按加入顺序注册。
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    declarations: Vec<ServiceDeclaration>,
}

impl ServiceCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加声明
    #[must_use]
    pub fn with(mut self, declaration: ServiceDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// 添加声明
    pub fn push(&mut self, declaration: ServiceDeclaration) {
        self.declarations.push(declaration);
    }

    /// 合并另一个目录
    pub fn merge(&mut self, other: Self) {
        self.declarations.extend(other.declarations);
    }

    /// 遍历声明
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDeclaration> {
        self.declarations.iter()
    }

    /// 声明数量
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl FromIterator<ServiceDeclaration> for ServiceCatalog {
    fn from_iter<I: IntoIterator<Item = ServiceDeclaration>>(iter: I) -> Self {
        Self {
            declarations: iter.into_iter().collect(),
        }
    }
}
