// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod browser_engine;
pub mod browser_session;
pub mod reqwest_engine;
pub mod traits;

use crate::config::settings::ScraperSettings;
use browser_engine::BrowserEngine;
use reqwest_engine::{ReqwestEngine, ReqwestEngineConfig};
use std::sync::Arc;
use traits::{ContentFetcher, FetchStrategy};

/// 按策略构建抓取引擎
///
/// 策略由调用方决定，整个运行只使用返回的这一个引擎
pub fn build_fetcher(strategy: FetchStrategy, settings: &ScraperSettings) -> Arc<dyn ContentFetcher> {
    match strategy {
        FetchStrategy::Fast => Arc::new(ReqwestEngine::new(ReqwestEngineConfig::from(settings))),
        FetchStrategy::Deep => Arc::new(BrowserEngine::from_settings(settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Settings;

    #[test]
    fn test_build_fetcher_matches_strategy() {
        let settings = Settings::from_builder(Settings::defaults().unwrap()).unwrap();

        let fast = build_fetcher(FetchStrategy::Fast, &settings.scraper);
        assert_eq!(fast.strategy(), FetchStrategy::Fast);
        assert_eq!(fast.name(), "reqwest");

        let deep = build_fetcher(FetchStrategy::Deep, &settings.scraper);
        assert_eq!(deep.strategy(), FetchStrategy::Deep);
        assert_eq!(deep.name(), "chromium");
    }
}
