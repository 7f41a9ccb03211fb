// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置分层测试
///
/// 覆盖 配置文件 → 环境变量 的覆盖顺序

#[cfg(test)]
mod tests {
    use keyword_scout::config::settings::{SheetBackend, Settings};
    use keyword_scout::engines::traits::FetchStrategy;
    use std::io::Write;

    #[test]
    fn test_environment_overrides_files() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[scraper]
strategy = "deep"
concurrency = 3

[sheet]
backend = "google"
spreadsheet_id = "from-file"
"#
        )
        .unwrap();

        std::env::set_var("SCOUT__SCRAPER__CONCURRENCY", "7");
        std::env::set_var("SCOUT__KEYWORDS", "cx,csat,head of support");
        let result = Settings::load(Some(file.path()));
        std::env::remove_var("SCOUT__SCRAPER__CONCURRENCY");
        std::env::remove_var("SCOUT__KEYWORDS");

        let settings = result.unwrap();
        assert_eq!(settings.scraper.strategy, FetchStrategy::Deep);
        assert_eq!(settings.scraper.concurrency, 7);
        assert_eq!(settings.sheet.backend, SheetBackend::Google);
        assert_eq!(settings.sheet.spreadsheet_id.as_deref(), Some("from-file"));
        assert_eq!(
            settings.keywords,
            Some(vec![
                "cx".to_string(),
                "csat".to_string(),
                "head of support".to_string()
            ])
        );
    }

    #[test]
    fn test_out_of_range_file_value_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[scraper]\nconcurrency = 500\n").unwrap();

        let builder = Settings::defaults()
            .unwrap()
            .add_source(config::File::from(file.path()));
        let err = Settings::from_builder(builder).unwrap_err();

        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let builder = Settings::defaults()
            .unwrap()
            .set_override("scraper.strategy", "turbo")
            .unwrap();

        assert!(Settings::from_builder(builder).is_err());
    }
}
