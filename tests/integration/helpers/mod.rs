// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.


use enrichrs::config::enrichment::EnrichmentConfig;
use enrichrs::domain::models::enrichment::EnrichmentRequestItem;
use std::time::Duration;

/// 按编号生成请求条目，外部ID为 "1".."n"
pub fn items(n: usize) -> Vec<EnrichmentRequestItem> {
    (1..=n)
        .map(|i| EnrichmentRequestItem::new(i.to_string(), format!("company{}.com", i)))
        .collect()
}

/// 测试用配置：10秒轮询，300秒上限，1秒退避基数
pub fn test_config(max_batch_size: usize) -> EnrichmentConfig {
    EnrichmentConfig {
        max_batch_size,
        api_timeout: Duration::from_secs(30),
        polling_interval: Duration::from_secs(10),
        max_wait_time: Duration::from_secs(300),
        ..EnrichmentConfig::default()
    }
}
