// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use regex::{RegexSet, RegexSetBuilder};
use std::sync::Arc;

/// 内置关键词列表
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "bpo",
    "business process outsourcing",
    "customer",
    "CX",
    "support",
    "CSAT",
    "Chief Customer",
    "Head of Customer",
    "VP of Customer",
    "Director of Support",
    "Chief Customer Officer",
    "VP of Support & Service Operations",
    "Chief Customer Officer (CCO)",
    "Chief Experience Officer (CXO)",
    "Vice President (VP) of Customer Support",
    "VP of Customer Service",
    "VP of Customer Experience",
    "Head of Customer Support",
    "Head of Customer Service",
    "Head of Customer Experience",
    "Director of Customer Support",
    "Director of Customer Service",
    "Director of Customer Experience",
    "Director of Support Operations",
    "Director of Customer Care",
    "Head of Support Operations",
    "VP of Customer Care",
    "Director of Client Services",
    "Director of Support Strategy",
    "Director of Procurement",
    "Head of Procurement",
    "Vice President (VP) of Procurement",
    "Chief Procurement Officer (CPO)",
    "Senior Procurement Manager",
    "Director of Sourcing",
    "Head of Strategic Sourcing",
    "VP of Strategic Sourcing",
    "Director of Purchasing",
    "Head of Global Sourcing",
    "VP of Purchasing",
    "Director of Vendor Management",
    "Head of Vendor Management",
    "VP of Vendor Management",
    "Chief Vendor Management Officer",
    "Director of Supplier Management",
    "Head of Supplier Relationship Management",
    "VP of Supplier Management",
    "Senior Vendor Relationship Manager",
    "Director of Partner Management",
    "CFO (Chief Financial Officer)",
    "VP of Financial Planning & Analysis (FP&A)",
    "VP of Corporate Finance",
    "Head of Finance",
    "Head of FP&A",
    "Head of Corporate Finance",
    "Director of Finance",
    "Director of Financial Planning & Analysis",
    "Director of Corporate Finance",
    "Controller / Financial Controller",
];

/// 关键词集合
///
/// 启动时构建，运行期间只读。克隆只复制引用计数。
///
/// 每个关键词编译为整词匹配模式：前后字符不能是单词字符，
/// 多词短语之间允许任意空白。
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Arc<[String]>,
    patterns: Arc<RegexSet>,
}

impl KeywordSet {
    /// 构建关键词集合
    ///
    /// 关键词统一转为小写并去除首尾空白，空关键词被忽略，
    /// 重复项只保留首次出现的位置。
    pub fn new<I, S>(keywords: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword
                .as_ref()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }

        let patterns = RegexSetBuilder::new(normalized.iter().map(|kw| Self::whole_word_pattern(kw)))
            .case_insensitive(true)
            .size_limit(64 * (1 << 20))
            .build()?;

        Ok(Self {
            keywords: normalized.into(),
            patterns: Arc::new(patterns),
        })
    }

    /// 使用内置列表构建
    pub fn default_set() -> Result<Self, regex::Error> {
        Self::new(DEFAULT_KEYWORDS)
    }

    fn whole_word_pattern(keyword: &str) -> String {
        let phrase = keyword
            .split(' ')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        format!(r"(?:^|\W){}(?:\W|$)", phrase)
    }

    /// 返回文本中命中的关键词，按集合顺序
    pub fn find_matches<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.patterns
            .matches(text)
            .into_iter()
            .map(|idx| self.keywords[idx].as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}
