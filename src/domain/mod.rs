// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：判定结果、关键词集合和任务
/// - 服务（services）：关键词分类
///
/// 领域层不依赖任何网络或存储实现。
pub mod models;
pub mod services;
