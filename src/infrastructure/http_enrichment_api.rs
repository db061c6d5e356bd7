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
use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::settings::ApiSettings;
use crate::domain::models::enrichment::{EnrichedRecord, EnrichmentRequestItem, EntityKind};
use crate::domain::services::enrichment_api::{ApiError, EnrichmentApi, RemoteJobStatus};
use crate::domain::services::field_mapping::derive_company_fields;
use crate::infrastructure::rate_limiter::RequestRateLimiter;
use crate::utils::errors::EnrichmentError;

const EXTERNAL_ID_KEY: &str = "externalID";

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::InvalidResponse(error.to_string())
        } else {
            ApiError::Transient(error.to_string())
        }
    }
}

/// 基于HTTP的富化接口实现
///
/// 一个实例只服务一种实体类型，实体类型决定端点路径和请求体字段
pub struct HttpEnrichmentApi {
    /// HTTP 客户端
    client: reqwest::Client,
    /// 以 `/` 结尾的API基础地址
    base_url: Url,
    /// Bearer 令牌
    api_key: String,
    /// 实体类型
    kind: EntityKind,
    /// 可选的客户端限流器
    limiter: Option<RequestRateLimiter>,
}

impl HttpEnrichmentApi {
    /// 创建新的HTTP富化接口
    ///
    /// # 参数
    ///
    /// * `kind` - 实体类型
    /// * `settings` - API配置
    ///
    /// # 返回值
    ///
    /// * `Ok(Self)` - 接口实例
    /// * `Err(EnrichmentError::Configuration)` - 未配置API密钥或基础地址无效
    pub fn new(kind: EntityKind, settings: &ApiSettings) -> Result<Self, EnrichmentError> {
        if settings.api_key.trim().is_empty() {
            return Err(EnrichmentError::Configuration(
                "API key is required".to_string(),
            ));
        }

        let base = format!("{}/", settings.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|e| {
            EnrichmentError::Configuration(format!("invalid base url '{}': {}", base, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| {
                EnrichmentError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key.trim().to_string(),
            kind,
            limiter: RequestRateLimiter::per_second(settings.requests_per_second),
        })
    }

    /// 按条件搜索公司
    pub async fn search_companies(&self, criteria: &Value) -> Result<Value, ApiError> {
        self.post("companies/search", criteria).await
    }

    /// 按条件搜索人员
    pub async fn search_people(&self, criteria: &Value) -> Result<Value, ApiError> {
        self.post("people/search", criteria).await
    }

    /// 查找与给定域名相似的公司
    pub async fn company_lookalikes(
        &self,
        domain: &str,
        country: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut payload = Map::new();
        payload.insert("domain".to_string(), Value::String(domain.to_string()));
        if let Some(country) = country.filter(|c| !c.is_empty()) {
            payload.insert("country".to_string(), Value::String(country.to_string()));
        }
        self.post("organizations/lookalikes", &Value::Object(payload))
            .await
    }

    /// 查询账户剩余额度
    pub async fn check_credits(&self) -> Result<Value, ApiError> {
        self.get("account/credits").await
    }

    /// 校验API密钥
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 密钥有效
    /// * `Ok(false)` - 服务端拒绝了密钥
    /// * `Err(ApiError)` - 其他错误，无法判断
    pub async fn validate_api_key(&self) -> Result<bool, ApiError> {
        match self.check_credits().await {
            Ok(_) => Ok(true),
            Err(ApiError::Authentication(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidResponse(format!("invalid endpoint '{}': {}", path, e)))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        self.send(self.client.post(url).json(body)).await
    }

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        self.send(self.client.get(url)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        if let Some(limiter) = &self.limiter {
            if !limiter.try_acquire() {
                debug!("Request throttled by client-side rate limit");
                limiter.acquire().await;
            }
        }

        let response = request
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!("{} responded with {}", response.url(), status);

        if status.is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body)
                .map_err(|e| ApiError::InvalidResponse(format!("undecodable body: {}", e)));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ApiError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, body))
    }
}

#[async_trait]
impl EnrichmentApi for HttpEnrichmentApi {
    async fn submit_batch(&self, items: &[EnrichmentRequestItem]) -> Result<String, ApiError> {
        let body = submission_body(self.kind, items);
        let path = format!("{}/enrich", resource(self.kind));
        let response = self.post(&path, &body).await?;
        job_id_from(&response)
    }

    async fn job_status(&self, job_id: &str) -> Result<RemoteJobStatus, ApiError> {
        let path = format!("{}/enrich/{}", resource(self.kind), job_id);
        let response = self.get(&path).await?;
        parse_job_status(self.kind, &response)
    }
}

fn resource(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Company => "companies",
        EntityKind::Person => "people",
    }
}

fn identifier_key(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Company => "domain",
        EntityKind::Person => "linkedinUrl",
    }
}

fn classify_status(status: StatusCode, body: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Authentication("invalid API key (HTTP 401)".to_string()),
        StatusCode::FORBIDDEN => {
            ApiError::Authentication("access forbidden, check API permissions (HTTP 403)".to_string())
        }
        s if s.is_server_error() => ApiError::Transient(format!("HTTP {}: {}", s.as_u16(), body)),
        s => ApiError::Rejected {
            status: s.as_u16(),
            body,
        },
    }
}

/// 构造提交请求体
pub(crate) fn submission_body(kind: EntityKind, items: &[EnrichmentRequestItem]) -> Value {
    let entries: Vec<Value> = items
        .iter()
        .map(|item| {
            let mut entry = Map::new();
            entry.insert(
                identifier_key(kind).to_string(),
                Value::String(item.identifier.clone()),
            );
            entry.insert(
                EXTERNAL_ID_KEY.to_string(),
                Value::String(item.external_id.clone()),
            );
            Value::Object(entry)
        })
        .collect();

    let mut body = Map::new();
    body.insert(resource(kind).to_string(), Value::Array(entries));
    Value::Object(body)
}

fn job_id_from(response: &Value) -> Result<String, ApiError> {
    ["enrichmentID", "id"]
        .iter()
        .filter_map(|key| response.get(*key))
        .find_map(scalar_to_string)
        .ok_or_else(|| ApiError::InvalidResponse("response has no enrichment id".to_string()))
}

/// 解析任务状态响应
pub(crate) fn parse_job_status(kind: EntityKind, response: &Value) -> Result<RemoteJobStatus, ApiError> {
    let object = response
        .as_object()
        .ok_or_else(|| ApiError::InvalidResponse("status response is not an object".to_string()))?;

    let status = object
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("processing")
        .to_lowercase();

    match status.as_str() {
        "completed" => {
            let records = object
                .get(resource(kind))
                .and_then(Value::as_array)
                .map(|entries| entries.iter().filter_map(|e| record_from(kind, e)).collect())
                .unwrap_or_default();
            Ok(RemoteJobStatus::Completed { records })
        }
        "failed" => Ok(RemoteJobStatus::Failed {
            reason: object
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string(),
        }),
        _ => {
            let progress = object.get("progress");
            Ok(RemoteJobStatus::Running {
                completed: progress.and_then(|p| p.get("completed")).and_then(Value::as_u64),
                total: progress.and_then(|p| p.get("total")).and_then(Value::as_u64),
            })
        }
    }
}

fn record_from(kind: EntityKind, entry: &Value) -> Option<EnrichedRecord> {
    let mut fields = entry.as_object()?.clone();
    let external_id = fields.remove(EXTERNAL_ID_KEY).as_ref().and_then(scalar_to_string)?;
    if kind == EntityKind::Company {
        derive_company_fields(&mut fields);
    }
    Some(EnrichedRecord {
        external_id,
        fields,
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
