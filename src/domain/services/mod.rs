// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 关键词分类（keyword_classifier）：从页面标记中提取正文并匹配关键词
pub mod keyword_classifier;

pub use keyword_classifier::KeywordClassifier;
