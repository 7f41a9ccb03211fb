// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::start_site_server;
use keyword_scout::application::usecases::scan_sheet::ScanSheetUseCase;
use keyword_scout::config::settings::Settings;
use keyword_scout::domain::models::{KeywordSet, Verdict};
use keyword_scout::domain::services::KeywordClassifier;
use keyword_scout::engines::build_fetcher;
use keyword_scout::engines::traits::FetchStrategy;
use keyword_scout::infrastructure::sheets::build_sheet_store;
use keyword_scout::presentation::report::RunSummary;
use keyword_scout::workers::JobDispatcher;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn settings_for(csv_path: &str, concurrency: usize) -> Settings {
    let builder = Settings::defaults()
        .unwrap()
        .set_override("sheet.backend", "csv")
        .unwrap()
        .set_override("sheet.csv_path", csv_path)
        .unwrap()
        .set_override("scraper.concurrency", concurrency as i64)
        .unwrap()
        .set_override("scraper.fetch_timeout_secs", 1)
        .unwrap();
    Settings::from_builder(builder).unwrap()
}

async fn run_pipeline(settings: &Settings) -> Option<RunSummary> {
    let store = build_sheet_store(&settings.sheet).unwrap();
    let fetcher = build_fetcher(FetchStrategy::Fast, &settings.scraper);
    let classifier = Arc::new(KeywordClassifier::new(KeywordSet::default_set().unwrap()));
    let dispatcher = JobDispatcher::new(fetcher, classifier, settings.scraper.concurrency);

    ScanSheetUseCase::new(store, dispatcher)
        .execute()
        .await
        .unwrap()
        .map(|outcome| RunSummary::from_outcome(&outcome))
}

fn write_sheet(dir: &TempDir, site: &str) -> String {
    let path = dir.path().join("leads.csv");
    let content = format!(
        "Website,Verdict,Owner\n\
         http://{site}/cx,,alice\n\
         ,,\n\
         http://{site}/plain,,bob\n\
         http://{site}/nav-only,,carol\n\
         http://{site}/gone,,dave\n\
         http://127.0.0.1:1/,,erin\n\
         http://{site}/slow,,frank\n",
        site = site
    );
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn verdict_column(path: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().get(1).unwrap_or("").to_string())
        .collect()
}

#[tokio::test]
async fn test_csv_sheet_end_to_end() {
    let site = start_site_server().await;
    let dir = TempDir::new().unwrap();
    let path = write_sheet(&dir, &site);

    let summary = run_pipeline(&settings_for(&path, 4)).await.unwrap();

    let column = verdict_column(&path);
    assert_eq!(column[0], "YES: customer, vp of customer, vp of customer experience");
    assert_eq!(column[1], "");
    assert_eq!(column[2], "NO");
    assert_eq!(column[3], "NO");
    assert_eq!(column[4], "Error: Connection failed (HTTP 404)");
    assert!(column[5].starts_with("Error: Connection failed"));
    assert_eq!(column[6], "Error: Request timed out after 1s");

    assert_eq!(summary.total, 6);
    assert_eq!(summary.yes, 1);
    assert_eq!(summary.no, 2);
    assert_eq!(summary.errors, 3);

    // Other columns survive the write
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("Website,Verdict,Owner\n"));
    assert!(written.contains(",frank\n"));
}

#[tokio::test]
async fn test_concurrency_does_not_change_sheet_output() {
    let site = start_site_server().await;

    let dir_one = TempDir::new().unwrap();
    let path_one = write_sheet(&dir_one, &site);
    run_pipeline(&settings_for(&path_one, 1)).await.unwrap();

    let dir_many = TempDir::new().unwrap();
    let path_many = write_sheet(&dir_many, &site);
    run_pipeline(&settings_for(&path_many, 10)).await.unwrap();

    assert_eq!(verdict_column(&path_one), verdict_column(&path_many));
}

#[tokio::test]
async fn test_header_only_sheet_is_left_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "Website,Verdict\n").unwrap();
    let path = path.to_string_lossy().into_owned();

    assert!(run_pipeline(&settings_for(&path, 2)).await.is_none());
    assert_eq!(fs::read_to_string(&path).unwrap(), "Website,Verdict\n");
}

#[test]
fn test_verdict_strings_match_sheet_format() {
    assert_eq!(Verdict::EmptyDomain.to_string(), "Empty Domain");
    assert_eq!(Verdict::No.to_string(), "NO");
}
