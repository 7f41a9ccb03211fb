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

use crate::config::settings::ScraperSettings;
use crate::engines::traits::{ContentFetcher, FailureCategory, FetchError, FetchStrategy, FetchedPage};
use crate::utils::text_encoding::decode_body;
use crate::utils::url_utils::TargetUrl;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::debug;

/// 快速抓取配置
#[derive(Debug, Clone)]
pub struct ReqwestEngineConfig {
    /// 整个请求（含读取响应体）的超时
    pub timeout: Duration,
    /// 响应体字节上限
    pub max_bytes: usize,
    /// User-Agent
    pub user_agent: String,
}

impl From<&ScraperSettings> for ReqwestEngineConfig {
    fn from(settings: &ScraperSettings) -> Self {
        Self {
            timeout: settings.fetch_timeout(),
            max_bytes: settings.max_bytes,
            user_agent: settings.user_agent.clone(),
        }
    }
}

/// 快速抓取引擎
///
/// 基于reqwest实现的HTTP抓取，只读取响应体的前 `max_bytes` 字节，
/// 长页面靠后出现的关键词可能因此漏判。
pub struct ReqwestEngine {
    config: ReqwestEngineConfig,
}

impl ReqwestEngine {
    pub fn new(config: ReqwestEngineConfig) -> Self {
        Self { config }
    }

    fn map_err(&self, e: reqwest::Error) -> FetchError {
        FetchError::from_reqwest(e, self.config.timeout)
    }
}

#[async_trait]
impl ContentFetcher for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `target` - 规范化后的目标地址
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 截断后的页面标记
    /// * `Err(FetchError)` - 非2xx响应、网络错误或超时
    async fn fetch(&self, target: &TargetUrl) -> Result<FetchedPage, FetchError> {
        // Each request gets a fresh client so connections and cookies die with the job
        let client = reqwest::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .timeout(self.config.timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| FetchError::Other(format!("Failed to build HTTP client: {}", e)))?;

        let start = Instant::now();
        let mut response = client
            .get(target.as_str())
            .send()
            .await
            .map_err(|e| self.map_err(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ConnectionFailed(FailureCategory::HttpStatus(
                status.as_u16(),
            )));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body: Vec<u8> = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_err(e))? {
            let remaining = self.config.max_bytes.saturating_sub(body.len());
            if chunk.len() > remaining {
                body.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        if truncated {
            debug!(url = %final_url, max_bytes = self.config.max_bytes, "Response body truncated");
        }

        Ok(FetchedPage {
            url: final_url,
            markup: decode_body(&body, content_type.as_deref()),
            strategy: FetchStrategy::Fast,
            status_code: Some(status.as_u16()),
            truncated,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn strategy(&self) -> FetchStrategy {
        FetchStrategy::Fast
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
