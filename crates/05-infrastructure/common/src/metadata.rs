//! 元数据定义
//!
//! 提供类型信息和服务接口键

use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称（不含模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    ///
    /// 支持 `dyn Trait` 这类非定长类型，名称会去掉 `dyn`、附加约束和泛型参数。
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: short_type_name(full_name).to_string(),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

fn short_type_name(full_name: &str) -> &str {
    let name = full_name.strip_prefix("dyn ").unwrap_or(full_name);
    let name = name.split(" + ").next().unwrap_or(name);
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name)
}

/// 服务接口键
///
/// 用于标识服务注册的契约。`Any` 为通配键，`Alias` 是指向规范键的代理。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum InterfaceKey {
    /// 通配键，查找时匹配任意注册
    #[default]
    Any,
    /// 以具体类型本身作为键
    Class(TypeInfo),
    /// 声明的接口契约（通常是 `dyn Trait`）
    Interface(TypeInfo),
    /// 别名，解析时指向目标键
    Alias {
        /// 别名名称
        name: String,
        /// 目标键
        target: Box<InterfaceKey>,
    },
}

impl InterfaceKey {
    /// 以具体类型作为接口键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Class(TypeInfo::of::<T>())
    }

    /// 以接口契约作为接口键
    pub fn interface<I: ?Sized + 'static>() -> Self {
        Self::Interface(TypeInfo::of::<I>())
    }

    /// 创建指向 `target` 的别名键
    pub fn alias(name: impl Into<String>, target: Self) -> Self {
        Self::Alias {
            name: name.into(),
            target: Box::new(target),
        }
    }

    /// 解析为规范键，沿别名链一直走到非别名键
    pub fn resolve(&self) -> &Self {
        let mut key = self;
        while let Self::Alias { target, .. } = key {
            key = target;
        }
        key
    }

    /// 键的显示名称
    pub fn name(&self) -> &str {
        match self {
            Self::Any => "Interface",
            Self::Class(info) | Self::Interface(info) => info.short_name(),
            Self::Alias { name, .. } => name,
        }
    }

    /// 是否为通配键
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// 解析后是否为接口契约键
    pub fn is_interface(&self) -> bool {
        matches!(self.resolve(), Self::Interface(_))
    }

    /// 作为查找键时是否匹配已注册的键
    pub fn matches(&self, registered: &Self) -> bool {
        self.is_any() || self.resolve() == registered.resolve()
    }
}

impl fmt::Display for InterfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
