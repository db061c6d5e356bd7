// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

/// 重试策略配置
///
/// 提交路径显式持有该值，第 n 次重试的等待时间为
/// `base_delay * backoff_multiplier^n`，并限制在 `max_delay` 以内。
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// 最大尝试次数（包含首次请求）
    pub max_attempts: u32,
    /// 初始退避时间
    pub base_delay: Duration,
    /// 最大退避时间
    pub max_delay: Duration,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
    /// 是否启用抖动
    pub enable_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
            enable_jitter: false,
        }
    }
}

impl RetryPolicy {
    /// 创建标准重试策略
    pub fn standard() -> Self {
        Self::default()
    }

    /// 计算第 `retry` 次重试（从0开始）的退避时间
    pub fn calculate_backoff(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let backoff_secs = self.base_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        // 限制最大退避时间
        let capped_backoff = backoff_secs.min(self.max_delay.as_secs_f64());

        let final_backoff = if self.enable_jitter && self.jitter_factor > 0.0 && capped_backoff > 0.0
        {
            let jitter_range = capped_backoff * self.jitter_factor;
            let jitter = rand::random_range(-jitter_range..jitter_range);
            (capped_backoff + jitter).clamp(0.0, self.max_delay.as_secs_f64())
        } else {
            capped_backoff
        };

        Duration::from_secs_f64(final_backoff)
    }

    /// 结合服务端提示计算等待时间
    ///
    /// 取退避时间与 `Retry-After` 中的较大者，仍受 `max_delay` 限制
    pub fn delay_for(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.calculate_backoff(retry);
        match retry_after {
            Some(hint) => backoff.max(hint).min(self.max_delay),
            None => backoff,
        }
    }

    /// 已完成 `attempts_made` 次尝试后是否还能重试
    pub fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }
}
