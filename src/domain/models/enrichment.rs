// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// 超时条目的错误说明
pub const TIMED_OUT_DETAIL: &str = "timed out";

/// 取消条目的错误说明
pub const CANCELLED_DETAIL: &str = "cancelled";

/// 富化字段映射
pub type FieldMap = Map<String, Value>;

/// 富化实体类型
///
/// 决定远端接口的端点与请求体中标识字段的名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// 公司，标识为域名
    #[default]
    Company,
    /// 人员，标识为LinkedIn个人主页URL
    Person,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityKind::Company => write!(f, "company"),
            EntityKind::Person => write!(f, "person"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "company" | "companies" => Ok(EntityKind::Company),
            "person" | "people" => Ok(EntityKind::Person),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

/// 富化请求条目
///
/// 由调用方在提交前创建，提交后不可变。
/// `external_id` 在一次提交内唯一，用于把结果对齐回输入行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRequestItem {
    /// 调用方分配的外部ID
    pub external_id: String,
    /// 域名或个人主页URL
    pub identifier: String,
}

impl EnrichmentRequestItem {
    pub fn new(external_id: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            identifier: identifier.into(),
        }
    }
}

/// 远端返回的单条记录
///
/// 远端已完成任务的负载中，每个被富化的实体对应一条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// 回传的外部ID
    pub external_id: String,
    /// 除外部ID之外的全部字段
    pub fields: FieldMap,
}

/// 富化结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    /// 富化成功
    Success,
    /// 远端完成但没有该条目的数据
    NotFound,
    /// 提交失败、任务失败、超时或被取消
    Error,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResultStatus::Success => write!(f, "SUCCESS"),
            ResultStatus::NotFound => write!(f, "NOT_FOUND"),
            ResultStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// 单条富化结果
///
/// 每个输入条目恰好对应一条结果，失败以数据形式表达而不是错误返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    /// 外部ID
    pub external_id: String,
    /// 原始标识
    pub identifier: String,
    /// 结果状态
    pub status: ResultStatus,
    /// 富化字段，仅在成功时存在
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: FieldMap,
    /// 可读的失败原因
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl EnrichmentResult {
    /// 成功结果
    pub fn success(item: &EnrichmentRequestItem, fields: FieldMap) -> Self {
        Self {
            external_id: item.external_id.clone(),
            identifier: item.identifier.clone(),
            status: ResultStatus::Success,
            fields,
            error_detail: None,
        }
    }

    /// 远端没有返回该条目
    pub fn not_found(item: &EnrichmentRequestItem) -> Self {
        Self {
            external_id: item.external_id.clone(),
            identifier: item.identifier.clone(),
            status: ResultStatus::NotFound,
            fields: FieldMap::new(),
            error_detail: None,
        }
    }

    /// 合成的错误结果
    pub fn error(item: &EnrichmentRequestItem, detail: impl Into<String>) -> Self {
        Self {
            external_id: item.external_id.clone(),
            identifier: item.identifier.clone(),
            status: ResultStatus::Error,
            fields: FieldMap::new(),
            error_detail: Some(detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }
}
