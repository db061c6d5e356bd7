// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use crate::utils::errors::EnrichmentError;
use crate::utils::retry_policy::RetryPolicy;

/// 批量富化运行时配置
///
/// 由批量任务客户端在构造时持有，加载方式见 `Settings`
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentConfig {
    /// 单个分块的最大条目数
    pub max_batch_size: usize,
    /// 单次远端调用的超时时间
    pub api_timeout: Duration,
    /// 轮询间隔
    pub polling_interval: Duration,
    /// 单个任务从提交起的最大等待时间
    pub max_wait_time: Duration,
    /// 提交重试策略
    pub retry: RetryPolicy,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 1000,
            api_timeout: Duration::from_secs(30),
            polling_interval: Duration::from_secs(10),
            max_wait_time: Duration::from_secs(300),
            retry: RetryPolicy::standard(),
        }
    }
}

impl EnrichmentConfig {
    /// 校验配置
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 配置有效
    /// * `Err(EnrichmentError::Configuration)` - 存在为零的必需项
    pub fn validate(&self) -> Result<(), EnrichmentError> {
        if self.max_batch_size == 0 {
            return Err(EnrichmentError::Configuration(
                "max_batch_size must be at least 1".to_string(),
            ));
        }
        if self.api_timeout.is_zero() {
            return Err(EnrichmentError::Configuration(
                "api_timeout must be positive".to_string(),
            ));
        }
        if self.polling_interval.is_zero() {
            return Err(EnrichmentError::Configuration(
                "polling_interval must be positive".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(EnrichmentError::Configuration(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
