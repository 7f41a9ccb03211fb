// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{KeywordSet, Verdict};
use scraper::{ElementRef, Html};

/// 不参与正文提取的元素
const EXCLUDED_ELEMENTS: &[&str] = &["script", "style", "noscript", "nav", "header", "footer"];

/// 关键词分类器
///
/// 剔除脚本、样式、导航、页眉页脚等非正文元素后提取文本，
/// 再以整词方式匹配关键词集合。对任何输入都返回判定，
/// 畸形标记按解析器能恢复出的文本处理（可能为空）。
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: KeywordSet,
}

impl KeywordClassifier {
    pub fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    /// 对页面标记分类
    ///
    /// # 参数
    ///
    /// * `markup` - 页面HTML
    ///
    /// # 返回值
    ///
    /// 命中关键词时返回 `Yes`（小写、去重、排序），否则返回 `No`
    pub fn classify(&self, markup: &str) -> Verdict {
        let text = extract_text(markup);
        Verdict::from_matches(self.keywords.find_matches(&text))
    }
}

/// 提取可见文本
///
/// 元素边界折叠为单个空格，结果转为小写
pub fn extract_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut fragments: Vec<&str> = Vec::new();
    collect_text(document.root_element(), &mut fragments);

    fragments
        .iter()
        .flat_map(|fragment| fragment.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if !EXCLUDED_ELEMENTS.contains(&name) {
                collect_text(child_element, out);
            }
        }
    }
}

#[cfg(test)]
#[path = "keyword_classifier_test.rs"]
mod tests;
