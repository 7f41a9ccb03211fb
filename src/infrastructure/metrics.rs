// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标系统
///
/// 未启用时直接返回，指标宏在没有记录器时为空操作
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(
                "Invalid metrics listen address {}: {}. Metrics disabled.",
                settings.listen_addr, e
            );
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_counter!("scout_jobs_total", "Total number of fetch+classify jobs dispatched");
    describe_counter!(
        "scout_verdicts_total",
        "Total number of verdicts produced, labelled by verdict"
    );
    describe_histogram!(
        "scout_fetch_duration_seconds",
        Unit::Seconds,
        "Duration of page fetches in seconds, labelled by strategy"
    );

    info!("Metrics exporter listening on {}", addr);
}
