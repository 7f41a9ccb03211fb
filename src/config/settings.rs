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

use crate::engines::traits::FetchStrategy;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use validator::{Validate, ValidationError};

/// 默认浏览器 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 应用程序配置设置
///
/// 包含表格、抓取、关键词、日志和指标等所有配置项
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    /// 表格配置
    #[validate(nested)]
    pub sheet: SheetSettings,
    /// 抓取配置
    #[validate(nested)]
    pub scraper: ScraperSettings,
    /// 关键词列表，未设置时使用内置列表
    #[validate(
        length(min = 1, message = "keyword list cannot be empty"),
        custom(function = "validate_keywords")
    )]
    pub keywords: Option<Vec<String>>,
    /// 日志配置
    pub logging: LoggingSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 关键词列表至少要有一个非空白项
fn validate_keywords(keywords: &[String]) -> Result<(), ValidationError> {
    if keywords.iter().all(|kw| kw.trim().is_empty()) {
        return Err(ValidationError::new("blank_keywords")
            .with_message("keyword list contains only blank entries".into()));
    }
    Ok(())
}

/// 表格后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SheetBackend {
    /// Google Sheets REST API
    Google,
    /// 本地 CSV 文件
    Csv,
}

/// 表格配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SheetSettings {
    /// 后端类型
    pub backend: SheetBackend,
    /// 电子表格ID (Google)
    pub spreadsheet_id: Option<String>,
    /// 工作表序号，从0开始
    pub worksheet_index: usize,
    /// 已授权的 OAuth 访问令牌 (Google)
    pub access_token: Option<String>,
    /// Sheets API 基础地址
    #[validate(url)]
    pub api_base_url: String,
    /// CSV 文件路径
    pub csv_path: Option<String>,
    /// 域名所在列
    #[validate(length(min = 1))]
    pub domain_column: String,
    /// 结果写入列
    #[validate(length(min = 1))]
    pub result_column: String,
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScraperSettings {
    /// 抓取策略
    pub strategy: FetchStrategy,
    /// 并发任务数
    #[validate(range(min = 1, max = 64))]
    pub concurrency: usize,
    /// HTTP 请求超时（秒）
    #[validate(range(min = 1, max = 600))]
    pub fetch_timeout_secs: u64,
    /// 响应体字节上限
    #[validate(range(min = 1))]
    pub max_bytes: usize,
    /// 浏览器导航超时（秒）
    #[validate(range(min = 1, max = 600))]
    pub render_timeout_secs: u64,
    /// 页面加载后的等待时间（毫秒）
    #[validate(range(max = 60000))]
    pub settle_delay_ms: u64,
    /// User-Agent
    #[validate(length(min = 1))]
    pub user_agent: String,
    /// 浏览器可执行文件路径
    pub browser_executable: Option<String>,
    /// 远程 Chrome 调试地址
    pub remote_debugging_url: Option<String>,
    /// 同时运行的浏览器进程上限，默认与并发数一致
    pub max_browsers: Option<usize>,
}

impl ScraperSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// 浏览器进程上限，至少为1
    pub fn browser_limit(&self) -> usize {
        self.max_browsers.unwrap_or(self.concurrency).max(1)
    }
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 默认过滤规则，RUST_LOG 优先
    pub level: String,
    /// 输出格式
    pub format: LogFormat,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从默认值、配置文件和环境变量加载配置
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// 加载配置，可额外指定一个配置文件
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let mut builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCOUT")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("keywords")
                .try_parsing(true),
        );

        Self::from_builder(builder)
    }

    /// 内置默认值
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Sheet defaults
            .set_default("sheet.backend", "csv")?
            .set_default("sheet.worksheet_index", 0)?
            .set_default("sheet.api_base_url", "https://sheets.googleapis.com/v4")?
            .set_default("sheet.csv_path", "domains.csv")?
            .set_default("sheet.domain_column", "A")?
            .set_default("sheet.result_column", "B")?
            // Scraper defaults
            .set_default("scraper.strategy", "fast")?
            .set_default("scraper.concurrency", 5)?
            .set_default("scraper.fetch_timeout_secs", 15)?
            .set_default("scraper.max_bytes", 300_000)?
            .set_default("scraper.render_timeout_secs", 60)?
            .set_default("scraper.settle_delay_ms", 2500)?
            .set_default("scraper.user_agent", DEFAULT_USER_AGENT)?
            // Logging defaults
            .set_default("logging.level", "info,keyword_scout=debug")?
            .set_default("logging.format", "pretty")?
            // Metrics defaults
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }

    /// 构建并校验配置
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid configuration: {}", e)))?;
        Ok(settings)
    }
}
