// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::url_utils::TargetUrl;

/// 抓取任务
///
/// 一个域名的抓取+分类执行单元，`index` 为其在输入列表中的位置，
/// 分发器按该位置写回结果槽。
#[derive(Debug, Clone)]
pub struct Job {
    /// 输入位置
    pub index: usize,
    /// 原始域名
    pub domain: String,
    /// 规范化后的目标地址
    pub target: TargetUrl,
}

impl Job {
    pub fn new(index: usize, domain: impl Into<String>, target: TargetUrl) -> Self {
        Self {
            index,
            domain: domain.into(),
            target,
        }
    }
}
