// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::enrichment::{
    EnrichedRecord, EnrichmentRequestItem, EnrichmentResult, FieldMap, CANCELLED_DETAIL,
    TIMED_OUT_DETAIL,
};

/// 批量任务状态
///
/// 状态转换遵循以下流程：
/// Submitted → Polling → Completed/Failed/TimedOut/Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// 已提交，尚未收到状态响应
    #[default]
    Submitted,
    /// 轮询中，远端仍在处理
    Polling,
    /// 远端已完成
    Completed,
    /// 远端报告失败
    Failed,
    /// 超过最大等待时间
    TimedOut,
    /// 调用方取消
    Cancelled,
}

impl JobState {
    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Submitted | JobState::Polling)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobState::Submitted => write!(f, "submitted"),
            JobState::Polling => write!(f, "polling"),
            JobState::Completed => write!(f, "completed"),
            JobState::Failed => write!(f, "failed"),
            JobState::TimedOut => write!(f, "timed_out"),
            JobState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// 批量任务
///
/// 一个成功提交的分块对应一个批量任务。任务只由轮询循环修改，
/// 进入终止状态后缓存对齐后的结果，再次轮询不会访问远端。
#[derive(Debug, Clone)]
pub struct BulkJob {
    /// 远端返回的任务句柄
    pub job_id: String,
    /// 分块内的请求条目，保持输入顺序
    pub items: Vec<EnrichmentRequestItem>,
    /// 当前状态
    pub state: JobState,
    /// 提交时间
    pub submitted_at: DateTime<Utc>,
    /// 最近一次成功轮询的时间
    pub last_polled_at: Option<DateTime<Utc>>,
    /// 成功的状态查询次数，网络错误不计入
    pub attempts: u32,
    /// 分块在原始输入中的起始位置
    offset: usize,
    /// 单调时钟上的提交时刻，用于计算截止时间
    started: Instant,
    /// 终止后的结果缓存
    results: Vec<EnrichmentResult>,
}

impl BulkJob {
    pub fn new(job_id: impl Into<String>, items: Vec<EnrichmentRequestItem>, offset: usize) -> Self {
        Self {
            job_id: job_id.into(),
            items,
            state: JobState::Submitted,
            submitted_at: Utc::now(),
            last_polled_at: None,
            attempts: 0,
            offset,
            started: Instant::now(),
            results: Vec::new(),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// 自提交以来经过的时间
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// 按最大等待时间计算的截止时刻
    ///
    /// 超出时钟表示范围的等待时间视为不限时
    pub fn deadline(&self, max_wait_time: Duration) -> Instant {
        self.started
            .checked_add(max_wait_time)
            .unwrap_or_else(|| far_future(self.started))
    }

    /// 终止后的结果，未终止时为空
    pub fn results(&self) -> &[EnrichmentResult] {
        &self.results
    }

    /// 记录一次成功的状态查询
    pub fn record_poll(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.state = JobState::Polling;
        self.attempts += 1;
        self.last_polled_at = Some(Utc::now());
    }

    /// 用远端负载完成任务
    ///
    /// 按 `external_id` 匹配记录；请求中存在但负载中缺失的条目记为 NotFound，
    /// 负载中多出的记录被忽略。同一外部ID出现多次时取第一条。
    pub fn complete(&mut self, records: Vec<EnrichedRecord>) {
        let mut by_id: HashMap<String, FieldMap> = HashMap::with_capacity(records.len());
        for record in records {
            by_id.entry(record.external_id).or_insert(record.fields);
        }

        let results: Vec<EnrichmentResult> = self
            .items
            .iter()
            .map(|item| match by_id.remove(&item.external_id) {
                Some(fields) => EnrichmentResult::success(item, fields),
                None => EnrichmentResult::not_found(item),
            })
            .collect();

        if !by_id.is_empty() {
            debug!(
                "Job {} returned {} records with unknown external ids",
                self.job_id,
                by_id.len()
            );
        }

        self.finish(JobState::Completed, results);
    }

    /// 远端报告任务失败，所有条目带上远端原因
    pub fn fail(&mut self, reason: &str) {
        let results = self.synthesize(reason);
        self.finish(JobState::Failed, results);
    }

    /// 超过最大等待时间
    pub fn time_out(&mut self) {
        let results = self.synthesize(TIMED_OUT_DETAIL);
        self.finish(JobState::TimedOut, results);
    }

    /// 调用方取消
    pub fn cancel(&mut self) {
        let results = self.synthesize(CANCELLED_DETAIL);
        self.finish(JobState::Cancelled, results);
    }

    fn synthesize(&self, detail: &str) -> Vec<EnrichmentResult> {
        self.items
            .iter()
            .map(|item| EnrichmentResult::error(item, detail))
            .collect()
    }

    fn finish(&mut self, state: JobState, results: Vec<EnrichmentResult>) {
        // First terminal transition wins.
        if self.is_terminal() {
            return;
        }
        self.state = state;
        self.results = results;
    }
}

/// 约三十年之后，用作不限时的截止时刻
fn far_future(from: Instant) -> Instant {
    from + Duration::from_secs(86400 * 365 * 30)
}

/// 提交失败的分块
///
/// 分块内所有条目以同一个原因记为错误，不产生批量任务
#[derive(Debug, Clone)]
pub struct RejectedChunk {
    /// 分块在原始输入中的起始位置
    pub offset: usize,
    /// 分块内的请求条目
    pub items: Vec<EnrichmentRequestItem>,
    /// 失败原因
    pub reason: String,
}

impl RejectedChunk {
    pub fn new(offset: usize, items: Vec<EnrichmentRequestItem>, reason: impl Into<String>) -> Self {
        Self {
            offset,
            items,
            reason: reason.into(),
        }
    }

    pub fn results(&self) -> Vec<EnrichmentResult> {
        self.items
            .iter()
            .map(|item| EnrichmentResult::error(item, self.reason.clone()))
            .collect()
    }
}

/// 一次提交的产物
///
/// 成功提交的分块成为批量任务，失败的分块单独保存，
/// 两者合起来覆盖原始输入的每一个条目。
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// 成功提交的批量任务
    pub jobs: Vec<BulkJob>,
    /// 提交失败的分块
    pub rejected: Vec<RejectedChunk>,
    total_items: usize,
}

impl Submission {
    pub fn new(jobs: Vec<BulkJob>, rejected: Vec<RejectedChunk>, total_items: usize) -> Self {
        Self {
            jobs,
            rejected,
            total_items,
        }
    }

    /// 原始输入的条目数
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// 是否所有任务都已终止
    pub fn is_finished(&self) -> bool {
        self.jobs.iter().all(BulkJob::is_terminal)
    }
}
