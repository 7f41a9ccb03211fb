// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::utils::url_utils::TargetUrl;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 抓取策略
///
/// 由调用方指定，整个运行期间只使用一种
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// 纯HTTP抓取，不执行脚本
    Fast,
    /// 无头浏览器渲染，执行脚本
    Deep,
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStrategy::Fast => f.write_str("fast"),
            FetchStrategy::Deep => f.write_str("deep"),
        }
    }
}

/// 连接失败的底层类别
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCategory {
    /// 非2xx响应
    HttpStatus(u16),
    /// 建立连接失败（DNS、TCP、TLS）
    Connect,
    /// 重定向错误
    Redirect,
    /// 读取响应体失败
    Body,
    /// 响应解码失败
    Decode,
    /// 请求发送失败
    Request,
    /// 浏览器导航失败，附带浏览器给出的错误文本
    Navigation(String),
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCategory::HttpStatus(code) => write!(f, "HTTP {}", code),
            FailureCategory::Connect => f.write_str("connect"),
            FailureCategory::Redirect => f.write_str("redirect"),
            FailureCategory::Body => f.write_str("body"),
            FailureCategory::Decode => f.write_str("decode"),
            FailureCategory::Request => f.write_str("request"),
            FailureCategory::Navigation(text) => write!(f, "navigation: {}", text),
        }
    }
}

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 网络/传输错误
    #[error("Connection failed ({0})")]
    ConnectionFailed(FailureCategory),
    /// HTTP请求超时
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// 浏览器页面加载超时
    #[error("page load timed out")]
    PageLoadTimeout,
    /// 浏览器启动或通信失败
    #[error("Browser error: {0}")]
    Browser(String),
    /// 其他错误
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// 将 reqwest 错误归类
    ///
    /// `timeout` 为客户端配置的超时，仅用于错误描述
    pub fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            return FetchError::Timeout(timeout);
        }
        if let Some(status) = e.status() {
            return FetchError::ConnectionFailed(FailureCategory::HttpStatus(status.as_u16()));
        }
        let category = if e.is_connect() {
            FailureCategory::Connect
        } else if e.is_redirect() {
            FailureCategory::Redirect
        } else if e.is_body() {
            FailureCategory::Body
        } else if e.is_decode() {
            FailureCategory::Decode
        } else if e.is_request() {
            FailureCategory::Request
        } else {
            return FetchError::Other(e.to_string());
        };
        FetchError::ConnectionFailed(category)
    }

    /// 错误种类标签，用于指标
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::ConnectionFailed(_) => "connection",
            FetchError::Timeout(_) | FetchError::PageLoadTimeout => "timeout",
            FetchError::Browser(_) | FetchError::Other(_) => "generic",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::PageLoadTimeout)
    }
}

/// 抓取到的页面
///
/// 交给分类器后即被丢弃
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 最终地址（可能因重定向而变化）
    pub url: String,
    /// 页面标记，长度受上限约束
    pub markup: String,
    /// 使用的抓取策略
    pub strategy: FetchStrategy,
    /// HTTP状态码，浏览器渲染时为空
    pub status_code: Option<u16>,
    /// 是否因长度上限被截断
    pub truncated: bool,
    /// 耗时（毫秒）
    pub response_time_ms: u64,
}

/// 内容抓取特质
///
/// 快速抓取和深度渲染两种实现可以互换
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// 抓取目标地址
    async fn fetch(&self, target: &TargetUrl) -> Result<FetchedPage, FetchError>;

    /// 实现的抓取策略
    fn strategy(&self) -> FetchStrategy;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
