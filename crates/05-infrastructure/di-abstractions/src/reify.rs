//! 延迟记忆单元
//!
//! 首次读取时计算一次，结果对所有绑定的属性名（别名）共享

use di_common::DependencyError;
use parking_lot::RwLock;
use std::fmt;

/// 延迟记忆单元
///
/// 作为字段存放在拥有者内部，因此缓存按实例隔离。未绑定任何属性名时读取会失败。
///
/// 同一拥有者被多个线程同时首次读取时不做保护：初始化在不持锁的情况下执行，
/// 可能被调用多次，以最后写入的值为准。
pub struct Reify<T> {
    names: Vec<&'static str>,
    value: RwLock<Option<T>>,
}

impl<T: Clone> Reify<T> {
    /// 创建未绑定的单元
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            value: RwLock::new(None),
        }
    }

    /// 绑定属性名，可多次调用以添加别名
    #[must_use]
    pub fn bind(mut self, name: &'static str) -> Self {
        if !self.names.contains(&name) {
            self.names.push(name);
        }
        self
    }

    /// 已绑定的属性名
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    /// 是否已绑定到 `attribute`
    pub fn is_bound_to(&self, attribute: &str) -> bool {
        self.names.iter().any(|name| *name == attribute)
    }

    /// 是否已计算
    pub fn is_resolved(&self) -> bool {
        self.value.read().is_some()
    }

    /// 通过属性名读取值，首次读取时调用 `init`
    pub fn get_or_try_init<E, F>(&self, attribute: &str, init: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<DependencyError>,
    {
        if !self.is_bound_to(attribute) {
            return Err(DependencyError::AttributeNotBound {
                attribute: attribute.to_string(),
            }
            .into());
        }

        if let Some(value) = self.value.read().as_ref() {
            return Ok(value.clone());
        }

        let value = init()?;
        *self.value.write() = Some(value.clone());
        Ok(value)
    }
}

impl<T: Clone> Default for Reify<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Reify<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reify")
            .field("names", &self.names)
            .field("resolved", &self.value.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::Arc;

    #[test]
    fn test_aliases_share_one_computation() {
        let cell = Reify::new().bind("first").bind("second");
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok::<_, DependencyError>(Arc::new(String::from("value")))
        };

        let via_first = cell.get_or_try_init("first", compute).unwrap();
        let via_second = cell.get_or_try_init("second", compute).unwrap();
        let again = cell.get_or_try_init("first", compute).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&via_first, &via_second));
        assert!(Arc::ptr_eq(&via_first, &again));
        assert_eq!(cell.names(), ["first", "second"]);
    }

    #[test]
    fn test_unbound_read_fails() {
        let cell: Reify<u32> = Reify::new();
        let result: Result<u32, DependencyError> = cell.get_or_try_init("value", || Ok(1));

        assert!(matches!(
            result,
            Err(DependencyError::AttributeNotBound { ref attribute }) if attribute == "value"
        ));
        assert!(!cell.is_resolved());
    }

    #[test]
    fn test_unknown_alias_fails() {
        let cell = Reify::new().bind("value");
        let result: Result<u32, DependencyError> = cell.get_or_try_init("other", || Ok(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_init_is_not_cached() {
        let cell = Reify::new().bind("value");
        let failed: Result<u32, DependencyError> = cell.get_or_try_init("value", || {
            Err(DependencyError::not_registered("ServiceTwo", ""))
        });
        assert!(failed.is_err());
        assert!(!cell.is_resolved());

        let value: Result<u32, DependencyError> = cell.get_or_try_init("value", || Ok(7));
        assert_eq!(value.unwrap(), 7);
    }

    #[test]
    fn test_duplicate_bind_is_ignored() {
        let cell: Reify<u32> = Reify::new().bind("value").bind("value");
        assert_eq!(cell.names(), ["value"]);
    }
}
