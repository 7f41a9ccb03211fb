// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{Job, Verdict};
use crate::domain::services::KeywordClassifier;
use crate::engines::traits::ContentFetcher;
use crate::utils::url_utils::normalize_domain;
use futures::stream::{self, StreamExt};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// 分发错误
///
/// 只用于任务本身崩溃的情况，抓取错误在任务内部已转为判定
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Job crashed: {0}")]
    Crashed(#[from] tokio::task::JoinError),
    #[error("Job produced no result")]
    MissingResult,
}

/// 任务分发器
///
/// 以有界并发执行 抓取 → 分类，按输入位置收集结果。
/// 单个任务的失败（包括panic）只影响该域名的判定。
pub struct JobDispatcher {
    fetcher: Arc<dyn ContentFetcher>,
    classifier: Arc<KeywordClassifier>,
    concurrency: usize,
}

impl JobDispatcher {
    /// 创建分发器
    ///
    /// # 参数
    ///
    /// * `fetcher` - 整个运行使用的抓取引擎
    /// * `classifier` - 关键词分类器
    /// * `concurrency` - 同时执行的任务数上限，0 按 1 处理
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        classifier: Arc<KeywordClassifier>,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 执行所有域名
    ///
    /// # 参数
    ///
    /// * `domains` - 按输入顺序排列的域名
    ///
    /// # 返回值
    ///
    /// 与输入逐位对齐的判定列表
    pub async fn run(&self, domains: &[String]) -> Vec<Verdict> {
        let total = domains.len();
        let mut slots: Vec<Option<Verdict>> = vec![None; total];
        let mut jobs = Vec::with_capacity(total);

        for (index, domain) in domains.iter().enumerate() {
            match normalize_domain(domain) {
                Some(target) => jobs.push(Job::new(index, domain.as_str(), target)),
                None => {
                    debug!("Row {} has an empty domain, skipping fetch", index);
                    counter!("scout_verdicts_total", "verdict" => Verdict::EmptyDomain.label())
                        .increment(1);
                    slots[index] = Some(Verdict::EmptyDomain);
                }
            }
        }

        info!(
            "Dispatching {} jobs ({} empty) with concurrency {} using {}",
            jobs.len(),
            total - jobs.len(),
            self.concurrency,
            self.fetcher.name()
        );
        counter!("scout_jobs_total").increment(jobs.len() as u64);

        let mut completed = total - jobs.len();
        let mut results = stream::iter(jobs.into_iter().map(|job| {
            let fetcher = self.fetcher.clone();
            let classifier = self.classifier.clone();
            async move {
                let index = job.index;
                let domain = job.domain.clone();
                let verdict = match tokio::spawn(execute_job(job, fetcher, classifier)).await {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        let err = DispatchError::from(e);
                        error!("Job for {} failed: {}", domain, err);
                        Verdict::error(err)
                    }
                };
                (index, domain, verdict)
            }
        }))
        .buffer_unordered(self.concurrency);

        while let Some((index, domain, verdict)) = results.next().await {
            completed += 1;
            info!("({}/{}) {} -> {}", completed, total, domain, verdict);
            counter!("scout_verdicts_total", "verdict" => verdict.label()).increment(1);
            slots[index] = Some(verdict);
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Verdict::error(DispatchError::MissingResult)))
            .collect()
    }
}

/// 单个任务：抓取后分类
#[instrument(skip_all, fields(index = job.index, domain = %job.domain))]
async fn execute_job(
    job: Job,
    fetcher: Arc<dyn ContentFetcher>,
    classifier: Arc<KeywordClassifier>,
) -> Verdict {
    let start = Instant::now();
    let result = fetcher.fetch(&job.target).await;
    histogram!(
        "scout_fetch_duration_seconds",
        "strategy" => fetcher.strategy().to_string()
    )
    .record(start.elapsed().as_secs_f64());

    match result {
        Ok(page) => {
            debug!(
                "Fetched {} (status {:?}) in {}ms",
                page.url, page.status_code, page.response_time_ms
            );
            if page.truncated {
                debug!("Markup for {} truncated to byte cap", page.url);
            }
            classifier.classify(&page.markup)
        }
        Err(e) => {
            warn!("Fetch of {} failed ({}): {}", job.target, e.kind(), e);
            Verdict::error(e)
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
