// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 浏览器会话
//!
//! 每个深度抓取任务独占一个浏览器进程。会话在 `close()` 或 `Drop` 时
//! 无条件拆除：关闭浏览器、等待进程退出、停止事件处理并删除临时配置目录。
//! 全局信号量限制同时存在的浏览器进程数量，许可在拆除完成后才释放。

use crate::config::settings::ScraperSettings;
use crate::engines::traits::FetchError;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::{Browser, BrowserConfig, Handler, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

fn browser_err(e: impl std::fmt::Display) -> FetchError {
    FetchError::Browser(e.to_string())
}

/// 浏览器启动器
///
/// 持有启动参数和进程数量信号量，可在任务间共享
pub struct BrowserLauncher {
    executable: Option<PathBuf>,
    remote_url: Option<String>,
    request_timeout: Duration,
    permits: Arc<Semaphore>,
}

impl BrowserLauncher {
    /// 创建启动器
    ///
    /// # 参数
    ///
    /// * `executable` - Chrome 可执行文件路径，为空时自动探测
    /// * `remote_url` - 远程 Chrome 调试地址，设置后不再启动本地进程
    /// * `request_timeout` - CDP 请求超时
    /// * `max_browsers` - 同时存在的浏览器会话上限
    pub fn new(
        executable: Option<PathBuf>,
        remote_url: Option<String>,
        request_timeout: Duration,
        max_browsers: usize,
    ) -> Self {
        Self {
            executable,
            remote_url,
            request_timeout,
            permits: Arc::new(Semaphore::new(max_browsers.max(1))),
        }
    }

    pub fn from_settings(settings: &ScraperSettings) -> Self {
        let remote_url = settings
            .remote_debugging_url
            .clone()
            .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());
        Self::new(
            settings.browser_executable.as_ref().map(PathBuf::from),
            remote_url,
            settings.render_timeout(),
            settings.browser_limit(),
        )
    }

    /// 当前可用的会话许可数
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// 打开一个新会话
    ///
    /// 在许可可用前等待。会话内创建独立的浏览器上下文。
    pub async fn open(&self) -> Result<BrowserSession, FetchError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| FetchError::Browser("browser pool closed".to_string()))?;

        let (browser, handler, profile_dir, remote) = match &self.remote_url {
            Some(url) => {
                info!("Connecting to remote Chrome instance at: {}", url);
                let (browser, handler) = Browser::connect(url.as_str())
                    .await
                    .map_err(|e| browser_err(format!("Failed to connect to remote Chrome: {}", e)))?;
                (browser, handler, None, true)
            }
            None => {
                // A private profile dir per process, concurrent launches otherwise share one
                let profile_dir = tempfile::Builder::new()
                    .prefix("keyword-scout-chrome-")
                    .tempdir()
                    .map_err(|e| browser_err(format!("Failed to create profile dir: {}", e)))?;

                let mut builder = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(self.request_timeout)
                    .user_data_dir(profile_dir.path())
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage");
                if let Some(path) = &self.executable {
                    builder = builder.chrome_executable(path);
                }
                let config = builder.build().map_err(browser_err)?;

                let (browser, handler) = Browser::launch(config)
                    .await
                    .map_err(|e| browser_err(format!("Failed to launch headless Chrome: {}", e)))?;
                (browser, handler, Some(profile_dir), false)
            }
        };

        let mut session = BrowserSession {
            resources: Some(SessionResources {
                browser,
                handler_task: spawn_handler(handler),
                context_id: None,
                remote,
                profile_dir,
                permit,
            }),
        };
        session.create_context().await?;
        Ok(session)
    }
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("Browser handler event error: {}", e);
            }
        }
    })
}

/// 会话持有的资源，拆除时一并释放
struct SessionResources {
    browser: Browser,
    handler_task: JoinHandle<()>,
    context_id: Option<BrowserContextId>,
    remote: bool,
    profile_dir: Option<TempDir>,
    permit: OwnedSemaphorePermit,
}

impl SessionResources {
    async fn shutdown(mut self) {
        let closed = tokio::time::timeout(CLOSE_TIMEOUT, async {
            if self.remote {
                // Shared remote Chrome: only dispose of our own context
                if let Some(id) = self.context_id.take() {
                    if let Err(e) = self.browser.execute(DisposeBrowserContextParams::new(id)).await {
                        warn!("Failed to dispose browser context: {}", e);
                    }
                }
            } else {
                if let Err(e) = self.browser.close().await {
                    warn!("Failed to close browser: {}", e);
                }
                if let Err(e) = self.browser.wait().await {
                    warn!("Failed to wait for browser exit: {}", e);
                }
            }
        })
        .await;

        if closed.is_err() {
            warn!("Browser did not shut down within {:?}, killing it", CLOSE_TIMEOUT);
        }

        // Dropping a launched Browser kills a still-running child process
        drop(self.browser);
        self.handler_task.abort();
        drop(self.profile_dir);
        drop(self.permit);
    }
}

/// 浏览器会话
///
/// 正常路径调用 [`BrowserSession::close`]；任务出错、超时被取消或 panic 时
/// 由 `Drop` 在后台完成同样的拆除。
pub struct BrowserSession {
    resources: Option<SessionResources>,
}

impl BrowserSession {
    async fn create_context(&mut self) -> Result<(), FetchError> {
        let resources = self
            .resources
            .as_mut()
            .ok_or_else(|| browser_err("session already closed"))?;
        let id = resources
            .browser
            .create_browser_context(CreateBrowserContextParams::default())
            .await
            .map_err(|e| browser_err(format!("Failed to create browser context: {}", e)))?;
        resources.context_id = Some(id);
        Ok(())
    }

    /// 在会话的独立上下文中打开空白页面
    pub async fn new_page(&self) -> Result<Page, FetchError> {
        let resources = self
            .resources
            .as_ref()
            .ok_or_else(|| browser_err("session already closed"))?;

        let mut params = CreateTargetParams::new("about:blank");
        params.browser_context_id = resources.context_id.clone();

        resources
            .browser
            .new_page(params)
            .await
            .map_err(|e| browser_err(format!("Failed to open page: {}", e)))
    }

    /// 拆除会话并等待完成
    pub async fn close(mut self) {
        if let Some(resources) = self.resources.take() {
            resources.shutdown().await;
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let Some(resources) = self.resources.take() else {
            return;
        };

        warn!("Browser session dropped without close, tearing down in background");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(resources.shutdown());
            }
            Err(_) => {
                resources.handler_task.abort();
                drop(resources.browser);
            }
        }
    }
}
