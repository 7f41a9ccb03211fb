// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 编排一次完整运行：读取域名、分发任务、写回结果
pub mod usecases;
