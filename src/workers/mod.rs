// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供有界并发的任务分发，负责任务隔离和结果按序收集
pub mod dispatcher;

pub use dispatcher::{DispatchError, JobDispatcher};
