// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 负责与外部系统的交互：
/// - 指标（metrics）：Prometheus 导出
/// - 表格（sheets）：域名来源与结果写回，支持 Google Sheets 和 CSV 文件
pub mod metrics;
pub mod sheets;
