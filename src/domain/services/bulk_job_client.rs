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

use futures::stream::{FuturesUnordered, StreamExt};
use metrics::{counter, histogram};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::{sleep, sleep_until, timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::enrichment::EnrichmentConfig;
use crate::domain::models::bulk_job::{BulkJob, RejectedChunk, Submission};
use crate::domain::models::enrichment::{
    EnrichmentRequestItem, EnrichmentResult, CANCELLED_DETAIL,
};
use crate::domain::services::enrichment_api::{ApiError, EnrichmentApi, RemoteJobStatus};
use crate::utils::errors::EnrichmentError;

/// 单个分块的提交结果
enum ChunkOutcome {
    Submitted(String),
    Rejected(String),
}

/// 批量富化任务客户端
///
/// 把输入切分为不超过 `max_batch_size` 的分块逐个提交，
/// 并发轮询每个远端任务直到终止或超时，最后按原始输入顺序对齐结果。
///
/// 只有认证失败会中止整个操作；分块提交失败、任务失败、超时与取消
/// 都体现为对应条目的 `Error` 结果。
pub struct BulkEnrichmentJobClient<A: EnrichmentApi> {
    /// 远端富化接口
    api: Arc<A>,
    /// 运行时配置
    config: EnrichmentConfig,
    /// 调用方取消信号
    cancel: CancellationToken,
}

impl<A: EnrichmentApi> BulkEnrichmentJobClient<A> {
    /// 创建新的批量任务客户端
    ///
    /// # 参数
    ///
    /// * `api` - 远端富化接口
    /// * `config` - 运行时配置
    ///
    /// # 返回值
    ///
    /// * `Ok(Self)` - 客户端实例
    /// * `Err(EnrichmentError::Configuration)` - 配置无效
    pub fn new(api: Arc<A>, config: EnrichmentConfig) -> Result<Self, EnrichmentError> {
        config.validate()?;
        Ok(Self {
            api,
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// 取消句柄
    ///
    /// 触发后所有轮询在下次唤醒时停止，未完成的条目记为 `cancelled`
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 提交并等待全部结果
    pub async fn enrich(
        &self,
        items: Vec<EnrichmentRequestItem>,
    ) -> Result<Vec<EnrichmentResult>, EnrichmentError> {
        let mut submission = self.submit(items).await?;
        self.poll_until_done(&mut submission).await
    }

    /// 分块提交
    ///
    /// 分块 i 包含输入中 `[i*B, (i+1)*B)` 的条目。限流与瞬时错误按重试策略
    /// 重试该分块，最终失败的分块记录为 `RejectedChunk`，不影响其他分块。
    ///
    /// # 返回值
    ///
    /// * `Ok(Submission)` - 成功提交的任务与失败的分块
    /// * `Err(EnrichmentError)` - 输入无效或认证失败
    pub async fn submit(
        &self,
        items: Vec<EnrichmentRequestItem>,
    ) -> Result<Submission, EnrichmentError> {
        validate_items(&items)?;

        let total = items.len();
        let chunk_count = total.div_ceil(self.config.max_batch_size);
        info!(
            "Submitting {} items in {} chunks (max batch size {})",
            total, chunk_count, self.config.max_batch_size
        );

        let mut jobs = Vec::with_capacity(chunk_count);
        let mut rejected = Vec::new();

        for (index, chunk) in items.chunks(self.config.max_batch_size).enumerate() {
            let offset = index * self.config.max_batch_size;

            if self.cancel.is_cancelled() {
                rejected.push(RejectedChunk::new(offset, chunk.to_vec(), CANCELLED_DETAIL));
                continue;
            }

            match self.submit_chunk(index, chunk).await? {
                ChunkOutcome::Submitted(job_id) => {
                    info!(
                        "Chunk {} ({} items) submitted as job {}",
                        index,
                        chunk.len(),
                        job_id
                    );
                    jobs.push(BulkJob::new(job_id, chunk.to_vec(), offset));
                }
                ChunkOutcome::Rejected(reason) => {
                    warn!("Chunk {} rejected: {}", index, reason);
                    counter!("enrichment_chunks_rejected_total").increment(1);
                    rejected.push(RejectedChunk::new(offset, chunk.to_vec(), reason));
                }
            }
        }

        Ok(Submission::new(jobs, rejected, total))
    }

    /// 提交单个分块，按重试策略处理可重试错误
    async fn submit_chunk(
        &self,
        index: usize,
        chunk: &[EnrichmentRequestItem],
    ) -> Result<ChunkOutcome, EnrichmentError> {
        let policy = &self.config.retry;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            counter!("enrichment_submissions_total").increment(1);

            let response = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return Ok(ChunkOutcome::Rejected(CANCELLED_DETAIL.to_string()));
                }
                response = timeout(self.config.api_timeout, self.api.submit_batch(chunk)) => response,
            };

            let error = match response {
                Ok(Ok(job_id)) => return Ok(ChunkOutcome::Submitted(job_id)),
                Ok(Err(ApiError::Authentication(msg))) => {
                    return Err(EnrichmentError::Authentication(msg))
                }
                Ok(Err(e)) => e,
                Err(_) => ApiError::Transient(format!(
                    "submission timed out after {:?}",
                    self.config.api_timeout
                )),
            };

            if !error.is_retryable() {
                return Ok(ChunkOutcome::Rejected(error.to_string()));
            }
            if !policy.should_retry(attempts) {
                return Ok(ChunkOutcome::Rejected(format!(
                    "{} after {} attempts",
                    error, attempts
                )));
            }

            let delay = policy.delay_for(attempts - 1, error.retry_after());
            counter!("enrichment_submission_retries_total").increment(1);
            warn!(
                "Chunk {} submission attempt {} failed ({}), retrying in {:?}",
                index, attempts, error, delay
            );

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return Ok(ChunkOutcome::Rejected(CANCELLED_DETAIL.to_string()));
                }
                _ = sleep(delay) => {}
            }
        }
    }

    /// 轮询所有任务直到终止
    ///
    /// 每个任务独立轮询，先完成的任务立即合并，不等待其他任务。
    /// 已终止的任务直接返回缓存结果，不再访问远端。
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<EnrichmentResult>)` - 与原始输入顺序一致、条目数相同的结果
    /// * `Err(EnrichmentError::Authentication)` - 轮询时认证失败
    pub async fn poll_until_done(
        &self,
        submission: &mut Submission,
    ) -> Result<Vec<EnrichmentResult>, EnrichmentError> {
        let mut slots: Vec<Option<EnrichmentResult>> = vec![None; submission.total_items()];

        for chunk in &submission.rejected {
            place(&mut slots, chunk.offset, chunk.results());
        }

        {
            let mut pollers: FuturesUnordered<_> = submission
                .jobs
                .iter_mut()
                .map(move |job| self.poll_job(job))
                .collect();

            while let Some(outcome) = pollers.next().await {
                let (offset, results) = outcome?;
                place(&mut slots, offset, results);
            }
        }

        let results: Vec<EnrichmentResult> = slots.into_iter().flatten().collect();
        debug_assert_eq!(results.len(), submission.total_items());

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        info!(
            "Enrichment finished: {}/{} items succeeded",
            succeeded,
            results.len()
        );
        Ok(results)
    }

    /// 单个任务的轮询循环
    async fn poll_job(
        &self,
        job: &mut BulkJob,
    ) -> Result<(usize, Vec<EnrichmentResult>), EnrichmentError> {
        if job.is_terminal() {
            return Ok((job.offset(), job.results().to_vec()));
        }

        let deadline = job.deadline(self.config.max_wait_time);

        while !job.is_terminal() {
            if self.cancel.is_cancelled() {
                info!("Job {} cancelled", job.job_id);
                job.cancel();
                break;
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(
                    "Job {} timed out after {:?}",
                    job.job_id, self.config.max_wait_time
                );
                job.time_out();
                break;
            }

            let budget = self.config.api_timeout.min(deadline - now);
            counter!("enrichment_polls_total").increment(1);

            let response = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => continue,
                response = timeout(budget, self.api.job_status(&job.job_id)) => response,
            };

            match response {
                Ok(Ok(status)) => {
                    job.record_poll();
                    apply_status(job, status);
                }
                Ok(Err(ApiError::Authentication(msg))) => {
                    return Err(EnrichmentError::Authentication(msg));
                }
                Ok(Err(e)) => {
                    warn!(
                        "Status poll for job {} failed, retrying on next tick: {}",
                        job.job_id, e
                    );
                }
                Err(_) => {
                    warn!(
                        "Status poll for job {} timed out after {:?}",
                        job.job_id, budget
                    );
                }
            }

            if job.is_terminal() {
                break;
            }

            let wake = Instant::now()
                .checked_add(self.config.polling_interval)
                .map_or(deadline, |next| next.min(deadline));
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {}
                _ = sleep_until(wake) => {}
            }
        }

        counter!("enrichment_jobs_finished_total", "state" => job.state.to_string()).increment(1);
        histogram!("enrichment_job_duration_seconds").record(job.elapsed().as_secs_f64());

        Ok((job.offset(), job.results().to_vec()))
    }
}

fn apply_status(job: &mut BulkJob, status: RemoteJobStatus) {
    match status {
        RemoteJobStatus::Running { completed, total } => match (completed, total) {
            (Some(done), Some(total)) if total > 0 => debug!(
                "Job {} processing: {}/{} (attempt {})",
                job.job_id, done, total, job.attempts
            ),
            _ => debug!("Job {} still processing (attempt {})", job.job_id, job.attempts),
        },
        RemoteJobStatus::Completed { records } => {
            info!(
                "Job {} completed with {} records for {} items",
                job.job_id,
                records.len(),
                job.items.len()
            );
            job.complete(records);
        }
        RemoteJobStatus::Failed { reason } => {
            warn!("Job {} failed remotely: {}", job.job_id, reason);
            job.fail(&reason);
        }
    }
}

fn place(slots: &mut [Option<EnrichmentResult>], offset: usize, results: Vec<EnrichmentResult>) {
    for (slot, result) in slots.iter_mut().skip(offset).zip(results) {
        *slot = Some(result);
    }
}

fn validate_items(items: &[EnrichmentRequestItem]) -> Result<(), EnrichmentError> {
    if items.is_empty() {
        return Err(EnrichmentError::InvalidInput(
            "at least one item is required".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.external_id.is_empty() {
            return Err(EnrichmentError::InvalidInput(format!(
                "item '{}' has an empty external id",
                item.identifier
            )));
        }
        if !seen.insert(item.external_id.as_str()) {
            return Err(EnrichmentError::InvalidInput(format!(
                "duplicate external id '{}'",
                item.external_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "bulk_job_client_test.rs"]
mod tests;
