// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 任务（job）：单个域名的抓取+分类执行单元
/// - 关键词集合（keyword_set）：运行期间只读的关键词列表
/// - 判定结果（verdict）：每个域名唯一的分类结果
pub mod job;
pub mod keyword_set;
pub mod verdict;

pub use job::Job;
pub use keyword_set::KeywordSet;
pub use verdict::Verdict;
