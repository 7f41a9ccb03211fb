// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{LogFormat, SheetBackend, Settings};
use crate::engines::traits::FetchStrategy;
use clap::Parser;
use std::path::PathBuf;

/// 命令行参数
///
/// 所有参数都是可选的，设置后覆盖配置文件和环境变量中的值
#[derive(Parser, Debug, Default)]
#[command(name = "keyword-scout")]
#[command(version)]
#[command(
    about = "Scan company websites for customer-experience keywords and write verdicts back to a sheet",
    long_about = None
)]
pub struct Cli {
    /// Extra configuration file layered over config/default
    #[arg(short, long, env = "SCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fetch strategy: plain HTTP or headless browser
    #[arg(short, long, value_enum)]
    pub strategy: Option<FetchStrategy>,

    /// Maximum number of domains processed at once
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Where domains are read from and results written to
    #[arg(long, value_enum)]
    pub backend: Option<SheetBackend>,

    /// Google spreadsheet ID
    #[arg(long)]
    pub spreadsheet_id: Option<String>,

    /// Zero-based worksheet index
    #[arg(long)]
    pub worksheet: Option<usize>,

    /// CSV file to use instead of a Google sheet
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Comma-separated keyword list replacing the configured one
    #[arg(long, value_delimiter = ',')]
    pub keywords: Option<Vec<String>>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// 把命令行覆盖项写入配置
    ///
    /// 只给出 `--csv` 时隐含使用 CSV 后端，只给出 `--spreadsheet-id` 时隐含使用 Google 后端
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(strategy) = self.strategy {
            settings.scraper.strategy = strategy;
        }
        if let Some(concurrency) = self.concurrency {
            settings.scraper.concurrency = concurrency;
        }
        if let Some(id) = &self.spreadsheet_id {
            settings.sheet.spreadsheet_id = Some(id.clone());
        }
        if let Some(worksheet) = self.worksheet {
            settings.sheet.worksheet_index = worksheet;
        }
        if let Some(path) = &self.csv {
            settings.sheet.csv_path = Some(path.to_string_lossy().into_owned());
        }
        if let Some(keywords) = &self.keywords {
            settings.keywords = Some(keywords.clone());
        }
        if self.json_logs {
            settings.logging.format = LogFormat::Json;
        }

        settings.sheet.backend = match (self.backend, &self.csv, &self.spreadsheet_id) {
            (Some(backend), _, _) => backend,
            (None, Some(_), None) => SheetBackend::Csv,
            (None, None, Some(_)) => SheetBackend::Google,
            _ => settings.sheet.backend,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn defaults() -> Settings {
        Settings::from_builder(Settings::defaults().unwrap()).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_keep_settings() {
        let mut settings = defaults();
        Cli::try_parse_from(["keyword-scout"])
            .unwrap()
            .apply(&mut settings);

        assert_eq!(settings.scraper.strategy, FetchStrategy::Fast);
        assert_eq!(settings.scraper.concurrency, 5);
        assert_eq!(settings.sheet.backend, SheetBackend::Csv);
    }

    #[test]
    fn test_flags_override_settings() {
        let mut settings = defaults();
        Cli::try_parse_from([
            "keyword-scout",
            "--strategy",
            "deep",
            "-j",
            "3",
            "--spreadsheet-id",
            "abc123",
            "--worksheet",
            "2",
            "--keywords",
            "cx,customer success",
            "--json-logs",
        ])
        .unwrap()
        .apply(&mut settings);

        assert_eq!(settings.scraper.strategy, FetchStrategy::Deep);
        assert_eq!(settings.scraper.concurrency, 3);
        assert_eq!(settings.sheet.backend, SheetBackend::Google);
        assert_eq!(settings.sheet.spreadsheet_id.as_deref(), Some("abc123"));
        assert_eq!(settings.sheet.worksheet_index, 2);
        assert_eq!(
            settings.keywords,
            Some(vec!["cx".to_string(), "customer success".to_string()])
        );
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_csv_flag_implies_csv_backend() {
        let mut settings = defaults();
        settings.sheet.backend = SheetBackend::Google;

        Cli::try_parse_from(["keyword-scout", "--csv", "leads.csv"])
            .unwrap()
            .apply(&mut settings);

        assert_eq!(settings.sheet.backend, SheetBackend::Csv);
        assert_eq!(settings.sheet.csv_path.as_deref(), Some("leads.csv"));
    }

    #[test]
    fn test_blank_keywords_fail_revalidation() {
        use validator::Validate;

        let mut settings = defaults();
        Cli::try_parse_from(["keyword-scout", "--keywords", ","])
            .unwrap()
            .apply(&mut settings);

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(Cli::try_parse_from(["keyword-scout", "--strategy", "turbo"]).is_err());
    }
}
