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

use anyhow::Context;
use clap::Parser;
use keyword_scout::application::usecases::scan_sheet::ScanSheetUseCase;
use keyword_scout::config::settings::Settings;
use keyword_scout::domain::models::KeywordSet;
use keyword_scout::domain::services::KeywordClassifier;
use keyword_scout::engines::build_fetcher;
use keyword_scout::infrastructure::metrics::init_metrics;
use keyword_scout::infrastructure::sheets::build_sheet_store;
use keyword_scout::presentation::cli::Cli;
use keyword_scout::presentation::report::RunSummary;
use keyword_scout::utils::telemetry;
use keyword_scout::workers::JobDispatcher;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// 主函数
///
/// 应用程序入口点，完成一次读取、抓取分类、写回的运行
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut settings);
    settings
        .validate()
        .context("Invalid configuration after command line overrides")?;

    // 2. Initialize logging and metrics
    telemetry::init_telemetry(&settings.logging);
    init_metrics(&settings.metrics);
    info!("Starting keyword-scout...");

    // 3. Keyword set
    let keywords = match &settings.keywords {
        Some(list) => KeywordSet::new(list),
        None => KeywordSet::default_set(),
    }
    .context("Failed to compile keyword patterns")?;
    anyhow::ensure!(!keywords.is_empty(), "Keyword list has no non-blank entries");
    info!("Loaded {} keywords", keywords.len());

    // 4. Sheet access
    let store = build_sheet_store(&settings.sheet).context("Failed to open sheet")?;
    info!("Using {}", store.describe());

    // 5. Dispatcher
    let strategy = settings.scraper.strategy;
    let fetcher = build_fetcher(strategy, &settings.scraper);
    let dispatcher = JobDispatcher::new(
        fetcher,
        Arc::new(KeywordClassifier::new(keywords)),
        settings.scraper.concurrency,
    );
    info!(
        "Fetch strategy {} with concurrency {}",
        strategy,
        dispatcher.concurrency()
    );

    // 6. Run
    let use_case = ScanSheetUseCase::new(store, dispatcher);
    if let Some(outcome) = use_case.execute().await? {
        let summary = RunSummary::from_outcome(&outcome);
        summary.log();
        println!("{}", summary);
    }

    Ok(())
}
