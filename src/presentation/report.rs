// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::usecases::scan_sheet::ScanOutcome;
use crate::domain::models::Verdict;
use std::fmt;
use tracing::info;

const MAX_DOMAIN_WIDTH: usize = 48;

/// 运行汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub yes: usize,
    pub no: usize,
    pub errors: usize,
    pub empty: usize,
    pub elapsed_secs: i64,
    rows: Vec<(String, String)>,
}

impl RunSummary {
    pub fn from_outcome(outcome: &ScanOutcome) -> Self {
        let mut summary = Self::from_verdicts(&outcome.domains, &outcome.verdicts);
        summary.elapsed_secs = (outcome.finished_at - outcome.started_at).num_seconds();
        summary
    }

    pub fn from_verdicts(domains: &[String], verdicts: &[Verdict]) -> Self {
        let mut summary = Self {
            total: verdicts.len(),
            ..Self::default()
        };

        for (domain, verdict) in domains.iter().zip(verdicts) {
            match verdict {
                Verdict::Yes(_) => summary.yes += 1,
                Verdict::No => summary.no += 1,
                Verdict::Error(_) => summary.errors += 1,
                Verdict::EmptyDomain => summary.empty += 1,
            }
            summary.rows.push((domain.trim().to_string(), verdict.to_string()));
        }

        summary
    }

    /// 汇总计数写入日志
    pub fn log(&self) {
        info!(
            total = self.total,
            yes = self.yes,
            no = self.no,
            errors = self.errors,
            empty = self.empty,
            elapsed_secs = self.elapsed_secs,
            "Run complete"
        );
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|(domain, _)| domain.chars().count())
            .max()
            .unwrap_or(0)
            .clamp("Domain".len(), MAX_DOMAIN_WIDTH);

        writeln!(f, "{:<width$}  Result", "Domain", width = width)?;
        writeln!(f, "{}  {}", "-".repeat(width), "-".repeat(6))?;
        for (domain, result) in &self.rows {
            writeln!(f, "{:<width$}  {}", clip(domain, width), result, width = width)?;
        }
        writeln!(f)?;
        write!(
            f,
            "{} domains: {} YES, {} NO, {} ERROR, {} empty",
            self.total, self.yes, self.no, self.errors, self.empty
        )
    }
}
