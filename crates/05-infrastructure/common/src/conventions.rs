//! 命名约定
//!
//! 将服务接口名称转换为服务注册表中的属性名称

use crate::metadata::InterfaceKey;

/// 命名约定规范
#[derive(Debug)]
pub struct NamingConventions;

impl NamingConventions {
    /// 将驼峰命名转换为小写下划线形式
    ///
    /// 在"小写字母或数字后跟大写字母"以及"大写字母后跟小写字母"（非开头）处断词，
    /// 例如 `FooBarService` -> `foo_bar_service`，`HTTPServer` -> `http_server`。
    pub fn to_underscores(name: &str) -> String {
        let chars: Vec<char> = name.chars().collect();
        let mut result = String::with_capacity(name.len() + 4);

        for (index, &ch) in chars.iter().enumerate() {
            if index > 0 && ch.is_ascii_uppercase() {
                let prev = chars[index - 1];
                let after_lower_or_digit = prev.is_ascii_lowercase() || prev.is_ascii_digit();
                let before_lower = chars
                    .get(index + 1)
                    .is_some_and(char::is_ascii_lowercase);

                if after_lower_or_digit || before_lower {
                    result.push('_');
                }
            }
            result.extend(ch.to_lowercase());
        }

        result
    }

    /// 是否为接口风格的名称（`I` 后跟大写字母）
    pub fn is_interface_name(name: &str) -> bool {
        let mut chars = name.chars();
        chars.next() == Some('I') && chars.next().is_some_and(|ch| ch.is_ascii_uppercase())
    }

    /// 推导服务注册表中的属性名称
    ///
    /// 接口风格的名称只有在键解析为接口契约时才去掉前导 `I`。
    pub fn attribute_name(key: &InterfaceKey) -> String {
        let name = key.name();
        let name = if Self::is_interface_name(name) && key.is_interface() {
            &name[1..]
        } else {
            name
        };
        Self::to_underscores(name)
    }
}
