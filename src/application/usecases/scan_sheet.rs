// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::Verdict;
use crate::infrastructure::sheets::{SheetError, SheetStore};
use crate::workers::JobDispatcher;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

/// 运行级错误，出现即中止整个运行
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to load domains from {source_name}: {source}")]
    LoadDomains {
        source_name: String,
        #[source]
        source: SheetError,
    },
    #[error("Failed to write results to {source_name}: {source}")]
    WriteResults {
        source_name: String,
        #[source]
        source: SheetError,
    },
}

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub domains: Vec<String>,
    pub verdicts: Vec<Verdict>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

// === Section: Use Case Definition ===

pub struct ScanSheetUseCase {
    store: Box<dyn SheetStore>,
    dispatcher: JobDispatcher,
}

// === Section: Implementation ===

impl ScanSheetUseCase {
    pub fn new(store: Box<dyn SheetStore>, dispatcher: JobDispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// 读取域名 → 分发 → 写回
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(outcome))` - 运行完成，结果已写回
    /// * `Ok(None)` - 没有读到任何域名，未写回
    /// * `Err(ScanError)` - 读取或写回失败
    pub async fn execute(&self) -> Result<Option<ScanOutcome>, ScanError> {
        let started_at = Utc::now();
        let source_name = self.store.describe();

        let domains = self
            .store
            .load_domains()
            .await
            .map_err(|source| ScanError::LoadDomains {
                source_name: source_name.clone(),
                source,
            })?;

        if domains.is_empty() {
            warn!("No domains found in {}, nothing to do", source_name);
            return Ok(None);
        }

        info!("Processing {} domains from {}", domains.len(), source_name);
        let verdicts = self.dispatcher.run(&domains).await;

        let results: Vec<String> = verdicts.iter().map(ToString::to_string).collect();
        self.store
            .write_results(&results)
            .await
            .map_err(|source| ScanError::WriteResults {
                source_name: source_name.clone(),
                source,
            })?;

        Ok(Some(ScanOutcome {
            domains,
            verdicts,
            started_at,
            finished_at: Utc::now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::KeywordSet;
    use crate::domain::services::KeywordClassifier;
    use crate::engines::traits::{ContentFetcher, FetchError, FetchStrategy, FetchedPage};
    use crate::utils::url_utils::TargetUrl;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct MemorySheet {
        domains: Result<Vec<String>, ()>,
        written: Mutex<Option<Vec<String>>>,
    }

    #[async_trait]
    impl SheetStore for Arc<MemorySheet> {
        async fn load_domains(&self) -> Result<Vec<String>, SheetError> {
            self.domains
                .clone()
                .map_err(|_| SheetError::Config("unreachable sheet".to_string()))
        }

        async fn write_results(&self, results: &[String]) -> Result<(), SheetError> {
            *self.written.lock().unwrap() = Some(results.to_vec());
            Ok(())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    struct EchoFetcher;

    #[async_trait]
    impl ContentFetcher for EchoFetcher {
        async fn fetch(&self, target: &TargetUrl) -> Result<FetchedPage, FetchError> {
            Ok(FetchedPage {
                url: target.to_string(),
                markup: format!("<p>{}</p>", target),
                strategy: FetchStrategy::Fast,
                status_code: Some(200),
                truncated: false,
                response_time_ms: 0,
            })
        }

        fn strategy(&self) -> FetchStrategy {
            FetchStrategy::Fast
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    fn dispatcher() -> JobDispatcher {
        let keywords = KeywordSet::new(["support"]).unwrap();
        JobDispatcher::new(
            Arc::new(EchoFetcher),
            Arc::new(KeywordClassifier::new(keywords)),
            2,
        )
    }

    fn sheet(domains: Result<Vec<&str>, ()>) -> Arc<MemorySheet> {
        Arc::new(MemorySheet {
            domains: domains.map(|d| d.into_iter().map(String::from).collect()),
            written: Mutex::new(None),
        })
    }

    #[tokio::test]
    async fn test_results_written_in_order() {
        let sheet = sheet(Ok(vec!["support.example.com", "shop.example.com"]));
        let use_case = ScanSheetUseCase::new(Box::new(sheet.clone()), dispatcher());

        let outcome = use_case.execute().await.unwrap().unwrap();

        assert_eq!(outcome.verdicts.len(), 2);
        assert_eq!(
            sheet.written.lock().unwrap().clone().unwrap(),
            vec!["YES: support".to_string(), "NO".to_string()]
        );
    }

    #[tokio::test]
    async fn test_zero_domains_writes_nothing() {
        let sheet = sheet(Ok(vec![]));
        let use_case = ScanSheetUseCase::new(Box::new(sheet.clone()), dispatcher());

        assert!(use_case.execute().await.unwrap().is_none());
        assert!(sheet.written.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_is_fatal() {
        let sheet = sheet(Err(()));
        let use_case = ScanSheetUseCase::new(Box::new(sheet.clone()), dispatcher());

        let err = use_case.execute().await.unwrap_err();

        assert!(matches!(err, ScanError::LoadDomains { .. }));
        assert!(sheet.written.lock().unwrap().is_none());
    }
}
