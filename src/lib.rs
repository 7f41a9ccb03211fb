// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用模块
///
/// 编排读取、分发、写回的完整运行流程
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含判定结果、关键词集合和关键词分类服务
pub mod domain;

/// 引擎模块
///
/// 实现快速(HTTP)与深度(浏览器渲染)两种抓取引擎
pub mod engines;

/// 基础设施模块
///
/// 提供外部服务集成，如表格存储和指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 命令行参数与运行结果报告
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 实现有界并发的任务分发
pub mod workers;
