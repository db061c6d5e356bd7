// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 配置设置测试模块
//!
//! 测试配置加载、校验以及到运行时配置的转换

use enrichrs::config::settings::{config_files, Settings};
use enrichrs::utils::errors::EnrichmentError;
use std::time::Duration;
use validator::Validate;

#[test]
fn test_config_loading_from_default_toml() {
    let settings = Settings::new().expect("default configuration should load");

    assert_eq!(settings.bulk.max_batch_size, 1000);
    assert_eq!(settings.bulk.polling_interval_secs, 10);
    assert_eq!(settings.bulk.max_wait_time_secs, 300);
    assert_eq!(settings.retry.max_attempts, 3);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_enrichment_config_conversion() {
    let mut settings = Settings::new().unwrap();
    settings.api.timeout_secs = 12;
    settings.bulk.max_batch_size = 250;
    settings.retry.base_delay_ms = 500;
    settings.retry.max_delay_ms = 4000;

    let config = settings.enrichment_config();

    assert_eq!(config.max_batch_size, 250);
    assert_eq!(config.api_timeout, Duration::from_secs(12));
    assert_eq!(config.polling_interval, Duration::from_secs(10));
    assert_eq!(config.max_wait_time, Duration::from_secs(300));
    assert_eq!(config.retry.base_delay, Duration::from_millis(500));
    assert_eq!(config.retry.max_delay, Duration::from_millis(4000));
    assert_eq!(config.retry.max_attempts, 3);
    assert!(settings.check().is_ok());
}

#[test]
fn test_check_rejects_out_of_range_values() {
    let mut settings = Settings::new().unwrap();
    settings.bulk.max_batch_size = 0;
    assert!(matches!(
        settings.check(),
        Err(EnrichmentError::Configuration(_))
    ));

    let mut settings = Settings::new().unwrap();
    settings.api.base_url = "not a url".to_string();
    assert!(settings.check().is_err());

    let mut settings = Settings::new().unwrap();
    settings.retry.max_attempts = 0;
    assert!(settings.check().is_err());
}

#[test]
fn test_config_files_skip_duplicate_default() {
    assert_eq!(config_files("default"), vec!["config/default"]);
    assert_eq!(
        config_files("development"),
        vec!["config/default", "config/development"]
    );
    assert_eq!(
        config_files("production"),
        vec!["config/default", "config/production"]
    );
}
