// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeSet;
use std::fmt;

/// 分类判定结果
///
/// 每个输入域名在运行结束时恰好对应一个判定结果。
/// `Display` 输出即写回表格的字符串。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// 域名为空，未派发抓取
    EmptyDomain,
    /// 没有关键词命中
    No,
    /// 命中的关键词（小写、去重、字典序）
    Yes(Vec<String>),
    /// 抓取或分类失败
    Error(String),
}

impl Verdict {
    /// 由命中的关键词构建判定
    ///
    /// 关键词统一转为小写后去重排序；集合为空时返回 `No`
    pub fn from_matches<I, S>(matches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matched: BTreeSet<String> = matches
            .into_iter()
            .map(|kw| kw.as_ref().to_lowercase())
            .collect();

        if matched.is_empty() {
            Verdict::No
        } else {
            Verdict::Yes(matched.into_iter().collect())
        }
    }

    /// 由错误描述构建判定
    pub fn error(reason: impl fmt::Display) -> Self {
        Verdict::Error(reason.to_string())
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Verdict::Yes(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Verdict::Error(_))
    }

    /// 用于指标和汇总的标签
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::EmptyDomain => "empty",
            Verdict::No => "no",
            Verdict::Yes(_) => "yes",
            Verdict::Error(_) => "error",
        }
    }

    /// 命中的关键词，非 `Yes` 时为空
    pub fn matched(&self) -> &[String] {
        match self {
            Verdict::Yes(matched) => matched,
            _ => &[],
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::EmptyDomain => f.write_str("Empty Domain"),
            Verdict::No => f.write_str("NO"),
            Verdict::Yes(matched) => write!(f, "YES: {}", matched.join(", ")),
            Verdict::Error(reason) => write!(f, "Error: {}", reason),
        }
    }
}
