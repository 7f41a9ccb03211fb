// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScraperSettings;
use crate::engines::browser_session::{BrowserLauncher, BrowserSession};
use crate::engines::traits::{ContentFetcher, FailureCategory, FetchError, FetchStrategy, FetchedPage};
use crate::utils::text_encoding::truncate_at_char_boundary;
use crate::utils::url_utils::TargetUrl;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetScriptExecutionDisabledParams;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::Page;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);
const CONTENT_TIMEOUT: Duration = Duration::from_secs(30);

/// 深度抓取配置
#[derive(Debug, Clone)]
pub struct BrowserEngineConfig {
    /// 导航超时，超时后报告 "page load timed out"
    pub navigation_timeout: Duration,
    /// DOM 解析完成后的等待时间，留给延迟加载的内容
    pub settle_delay: Duration,
    /// User-Agent
    pub user_agent: String,
    /// 页面标记字节上限
    pub max_bytes: usize,
}

impl From<&ScraperSettings> for BrowserEngineConfig {
    fn from(settings: &ScraperSettings) -> Self {
        Self {
            navigation_timeout: settings.render_timeout(),
            settle_delay: settings.settle_delay(),
            user_agent: settings.user_agent.clone(),
            max_bytes: settings.max_bytes,
        }
    }
}

/// 浏览器渲染引擎
///
/// 基于chromiumoxide实现。每次抓取启动独立的浏览器会话，
/// 无论成功、失败还是超时，会话都会被拆除。
pub struct BrowserEngine {
    launcher: BrowserLauncher,
    config: BrowserEngineConfig,
}

impl BrowserEngine {
    pub fn new(launcher: BrowserLauncher, config: BrowserEngineConfig) -> Self {
        Self { launcher, config }
    }

    pub fn from_settings(settings: &ScraperSettings) -> Self {
        Self::new(
            BrowserLauncher::from_settings(settings),
            BrowserEngineConfig::from(settings),
        )
    }

    async fn render(
        &self,
        session: &BrowserSession,
        target: &TargetUrl,
    ) -> Result<(String, String), FetchError> {
        let page = session.new_page().await?;

        page.set_user_agent(self.config.user_agent.as_str())
            .await
            .map_err(|e| FetchError::Browser(format!("Failed to set user agent: {}", e)))?;
        page.execute(SetScriptExecutionDisabledParams::new(false))
            .await
            .map_err(|e| FetchError::Browser(format!("Failed to enable JavaScript: {}", e)))?;

        tokio::time::timeout(self.config.navigation_timeout, navigate(&page, target))
            .await
            .map_err(|_| FetchError::PageLoadTimeout)??;

        tokio::time::sleep(self.config.settle_delay).await;

        let content = capture_content(page.content(), CONTENT_TIMEOUT).await?;

        let url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| target.to_string());

        Ok((url, content))
    }
}

/// 在期限内读取页面标记
///
/// 超时与导航超时区分开，报告为浏览器错误
async fn capture_content<F, E>(content: F, limit: Duration) -> Result<String, FetchError>
where
    F: Future<Output = Result<String, E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(limit, content).await {
        Ok(Ok(markup)) => Ok(markup),
        Ok(Err(e)) => Err(FetchError::Browser(format!(
            "Failed to read page content: {}",
            e
        ))),
        Err(_) => Err(FetchError::Browser(format!(
            "Page content capture timed out after {}s",
            limit.as_secs()
        ))),
    }
}

/// 导航到目标地址并等待 DOM 解析完成
async fn navigate(page: &Page, target: &TargetUrl) -> Result<(), FetchError> {
    let response = page
        .execute(NavigateParams::new(target.as_str()))
        .await
        .map_err(|e| FetchError::Browser(format!("Navigation failed: {}", e)))?;

    if let Some(error_text) = response.result.error_text.clone() {
        return Err(FetchError::ConnectionFailed(FailureCategory::Navigation(
            error_text,
        )));
    }

    loop {
        // The execution context may still be switching documents right after commit
        match page.evaluate("document.readyState").await {
            Ok(result) => {
                if let Ok(state) = result.into_value::<String>() {
                    if state != "loading" {
                        return Ok(());
                    }
                }
            }
            Err(e) => debug!("readyState not available yet: {}", e),
        }
        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }
}

#[async_trait]
impl ContentFetcher for BrowserEngine {
    /// 执行浏览器渲染抓取
    ///
    /// # 参数
    ///
    /// * `target` - 规范化后的目标地址
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 渲染后的页面标记
    /// * `Err(FetchError)` - 启动失败、导航失败或超时
    async fn fetch(&self, target: &TargetUrl) -> Result<FetchedPage, FetchError> {
        let start = Instant::now();
        let session = self.launcher.open().await?;

        let result = self.render(&session, target).await;
        session.close().await;

        let (url, mut markup) = result?;
        let truncated = truncate_at_char_boundary(&mut markup, self.config.max_bytes);

        Ok(FetchedPage {
            url,
            markup,
            strategy: FetchStrategy::Deep,
            status_code: None,
            truncated,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn strategy(&self) -> FetchStrategy {
        FetchStrategy::Deep
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

#[cfg(test)]
#[path = "browser_engine_test.rs"]
mod tests;
