// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

use crate::utils::errors::EnrichmentError;

/// 初始化指标系统
///
/// 安装Prometheus导出器并注册批量富化相关的指标，
/// 需要在 tokio 运行时内调用
///
/// # 参数
///
/// * `listen_addr` - 导出器的HTTP监听地址
pub fn init_metrics(listen_addr: &str) -> Result<(), EnrichmentError> {
    let addr: SocketAddr = listen_addr.parse().map_err(|e| {
        EnrichmentError::Configuration(format!("invalid metrics address '{}': {}", listen_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| {
            EnrichmentError::Configuration(format!("failed to install Prometheus recorder: {}", e))
        })?;

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

fn describe_metrics() {
    describe_counter!(
        "enrichment_submissions_total",
        "Total number of chunk submission attempts"
    );
    describe_counter!(
        "enrichment_submission_retries_total",
        "Total number of chunk submissions retried after a retryable error"
    );
    describe_counter!(
        "enrichment_chunks_rejected_total",
        "Total number of chunks that could not be submitted"
    );
    describe_counter!(
        "enrichment_polls_total",
        "Total number of job status requests"
    );
    describe_counter!(
        "enrichment_jobs_finished_total",
        "Total number of bulk jobs that reached a terminal state, by state"
    );
    describe_histogram!(
        "enrichment_job_duration_seconds",
        Unit::Seconds,
        "Time from submission until a bulk job reached a terminal state"
    );
}
