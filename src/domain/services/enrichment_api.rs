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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::enrichment::{EnrichedRecord, EnrichmentRequestItem};

/// 远端接口错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 凭据无效或无权限（401/403）
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// 触发远端限流（429）
    #[error("rate limited")]
    RateLimited {
        /// 服务端建议的等待时间
        retry_after: Option<Duration>,
    },
    /// 网络错误、超时或服务端错误
    #[error("transient error: {0}")]
    Transient(String),
    /// 远端拒绝请求
    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    /// 响应无法解析
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 限流与瞬时错误返回true，其余返回false
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. } | ApiError::Transient(_))
    }

    /// 服务端给出的重试等待时间
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// 远端任务状态
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteJobStatus {
    /// 仍在处理，可能带有进度
    Running {
        completed: Option<u64>,
        total: Option<u64>,
    },
    /// 已完成，附带每个实体的记录
    Completed { records: Vec<EnrichedRecord> },
    /// 远端报告失败
    Failed { reason: String },
}

/// 富化接口特质
///
/// 远端批量富化服务的抽象：提交一个分块并返回任务句柄，按句柄查询状态。
/// 实现者不做重试，重试与轮询节奏由批量任务客户端决定。
#[async_trait]
pub trait EnrichmentApi: Send + Sync {
    /// 提交一个分块，返回不透明的任务句柄
    async fn submit_batch(&self, items: &[EnrichmentRequestItem]) -> Result<String, ApiError>;

    /// 查询任务状态
    async fn job_status(&self, job_id: &str) -> Result<RemoteJobStatus, ApiError>;
}
