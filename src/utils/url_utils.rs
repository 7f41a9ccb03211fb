// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;

/// 规范化后的抓取地址
///
/// 只能通过 [`normalize_domain`] 构造，保证带有 http/https 前缀
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetUrl(String);

impl TargetUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TargetUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

const DOUBLE_SCHEMES: [&str; 2] = ["https://https://", "http://https://"];

fn has_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// 将原始域名规范化为抓取地址
///
/// - 去除首尾空白，空字符串返回 `None`
/// - 折叠误输入的双重协议前缀（`https://https://`、`http://https://`）
/// - 已带 http/https 前缀的地址原样返回
/// - 其余补全 `https://`
///
/// 对已规范化的地址再次调用结果不变。
pub fn normalize_domain(domain: &str) -> Option<TargetUrl> {
    let mut url = domain.trim().to_string();
    if url.is_empty() {
        return None;
    }

    loop {
        let lower = url.to_ascii_lowercase();
        match DOUBLE_SCHEMES.iter().find(|p| lower.starts_with(*p)) {
            Some(prefix) => url = format!("https://{}", &url[prefix.len()..]),
            None => break,
        }
    }

    if has_scheme(&url) {
        Some(TargetUrl(url))
    } else {
        Some(TargetUrl(format!("https://{}", url)))
    }
}
