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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

use crate::config::enrichment::EnrichmentConfig;
use crate::utils::errors::EnrichmentError;
use crate::utils::retry_policy::RetryPolicy;

/// 应用程序配置设置
///
/// 包含API凭据、批量任务参数、重试策略和指标导出等所有配置项
#[derive(Debug, Deserialize, Validate)]
pub struct Settings {
    /// 富化API配置
    #[validate(nested)]
    pub api: ApiSettings,
    /// 批量任务配置
    #[validate(nested)]
    pub bulk: BulkSettings,
    /// 提交重试配置
    #[validate(nested)]
    pub retry: RetrySettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 富化API配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiSettings {
    /// API基础地址
    #[validate(url)]
    pub base_url: String,
    /// API密钥
    pub api_key: String,
    /// 单次请求超时时间（秒）
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
    /// 客户端每秒最大请求数，0 表示不限制
    pub requests_per_second: u32,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 批量任务配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkSettings {
    /// 单个分块的最大条目数
    #[validate(range(min = 1, max = 10000))]
    pub max_batch_size: u32,
    /// 轮询间隔（秒）
    #[validate(range(min = 1))]
    pub polling_interval_secs: u64,
    /// 最大等待时间（秒）
    #[validate(range(min = 1))]
    pub max_wait_time_secs: u64,
}

/// 重试配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RetrySettings {
    /// 最大尝试次数
    #[validate(range(min = 1, max = 10))]
    pub max_attempts: u32,
    /// 初始退避时间（毫秒）
    pub base_delay_ms: u64,
    /// 最大退避时间（毫秒）
    pub max_delay_ms: u64,
    /// 是否启用抖动
    pub jitter: bool,
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 和 `ENRICHRS__` 前缀的环境变量。未设置 `APP_ENVIRONMENT` 时按 `development` 处理
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env =
            std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let mut builder = Config::builder()
            // Default API settings
            .set_default("api.base_url", "https://api.surfe.com/v2")?
            .set_default("api.api_key", "")?
            .set_default("api.timeout_secs", 30)?
            .set_default("api.requests_per_second", 10)?
            // Default bulk job settings
            .set_default("bulk.max_batch_size", 1000)?
            .set_default("bulk.polling_interval_secs", 10)?
            .set_default("bulk.max_wait_time_secs", 300)?
            // Default retry settings
            .set_default("retry.max_attempts", 3)?
            .set_default("retry.base_delay_ms", 1000)?
            .set_default("retry.max_delay_ms", 60000)?
            .set_default("retry.jitter", false)?
            // Default metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?;

        for name in config_files(&env) {
            builder = builder.add_source(File::with_name(&name).required(false));
        }
        builder = builder.add_source(Environment::with_prefix("ENRICHRS").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 校验配置值
    pub fn check(&self) -> Result<(), EnrichmentError> {
        self.validate()?;
        self.enrichment_config().validate()
    }

    /// 转换为批量任务客户端的运行时配置
    pub fn enrichment_config(&self) -> EnrichmentConfig {
        EnrichmentConfig {
            max_batch_size: self.bulk.max_batch_size as usize,
            api_timeout: self.api.timeout(),
            polling_interval: Duration::from_secs(self.bulk.polling_interval_secs),
            max_wait_time: Duration::from_secs(self.bulk.max_wait_time_secs),
            retry: RetryPolicy {
                max_attempts: self.retry.max_attempts,
                base_delay: Duration::from_millis(self.retry.base_delay_ms),
                max_delay: Duration::from_millis(self.retry.max_delay_ms),
                enable_jitter: self.retry.jitter,
                ..RetryPolicy::standard()
            },
        }
    }
}

/// 按叠加顺序列出要读取的配置文件
///
/// 环境名为 `default` 时不会重复加载 `config/default`
pub fn config_files(environment: &str) -> Vec<String> {
    let mut files = vec!["config/default".to_string()];
    if environment != "default" {
        files.push(format!("config/{}", environment));
    }
    files
}
