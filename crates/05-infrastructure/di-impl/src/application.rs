//! 应用
//!
//! 配置完成后的应用，负责打开请求上下文

use crate::registry::Registry;
use crate::request::{Request, RequestContext};
use di_common::InterfaceKey;
use std::sync::Arc;
use tracing::debug;

/// 应用
#[derive(Debug, Clone)]
pub struct Application {
    registry: Arc<Registry>,
}

impl Application {
    pub(crate) fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// 进程级注册表
    pub const fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// 打开没有上下文的请求
    pub fn request_context(&self) -> RequestContext {
        self.open(None)
    }

    /// 打开带上下文键的请求
    pub fn request_context_for(&self, context: InterfaceKey) -> RequestContext {
        self.open(Some(context))
    }

    fn open(&self, context: Option<InterfaceKey>) -> RequestContext {
        let request = Request::new(self.registry.clone(), context);
        debug!("[{}] 打开请求 {}", self.registry.name(), request.id());
        RequestContext::new(request)
    }
}
