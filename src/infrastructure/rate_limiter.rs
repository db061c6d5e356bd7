// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use std::num::NonZeroU32;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// 客户端请求限流器
///
/// 在每次远端请求之前等待令牌，避免触发服务端的429
pub struct RequestRateLimiter {
    limiter: DirectRateLimiter,
}

impl RequestRateLimiter {
    /// 按每秒请求数创建限流器
    ///
    /// # 返回值
    ///
    /// `requests_per_second` 为0时返回None，表示不限流
    pub fn per_second(requests_per_second: u32) -> Option<Self> {
        let rate = NonZeroU32::new(requests_per_second)?;
        Some(Self {
            limiter: RateLimiter::direct(Quota::per_second(rate)),
        })
    }

    /// 等待直到可以发送下一个请求
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    /// 不等待地尝试获取令牌
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}
