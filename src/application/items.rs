// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::domain::models::enrichment::{EnrichmentRequestItem, EntityKind};
use crate::utils::normalize::{normalize_domain, normalize_profile_url};

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// 空行
    Empty,
    /// 无法规范化为有效标识
    Invalid,
    /// 与前面的行规范化后相同
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::Empty => write!(f, "empty"),
            SkipReason::Invalid => write!(f, "invalid"),
            SkipReason::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// 被跳过的输入行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 行号，从0开始
    pub row: usize,
    /// 原始内容
    pub raw: String,
    pub reason: SkipReason,
}

/// 整理后的请求条目
#[derive(Debug, Clone, Default)]
pub struct PreparedItems {
    /// 可提交的条目，保持输入顺序
    pub items: Vec<EnrichmentRequestItem>,
    /// 被跳过的行
    pub skipped: Vec<SkippedRow>,
}

/// 把原始输入行整理成富化请求条目
///
/// 公司按域名规范化，人员按LinkedIn个人主页URL规范化。
/// 外部ID为 `row_{行号}`，因此结果可以对齐回原始输入行；
/// 规范化后重复的行只保留第一次出现。
pub fn build_request_items<I, S>(kind: EntityKind, rows: I) -> PreparedItems
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut prepared = PreparedItems::default();
    let mut seen = HashSet::new();

    for (row, raw) in rows.into_iter().enumerate() {
        let raw = raw.as_ref();
        let skip = |reason| SkippedRow {
            row,
            raw: raw.to_string(),
            reason,
        };

        if raw.trim().is_empty() {
            prepared.skipped.push(skip(SkipReason::Empty));
            continue;
        }

        let identifier = match kind {
            EntityKind::Company => normalize_domain(raw),
            EntityKind::Person => normalize_profile_url(raw),
        };
        let Some(identifier) = identifier else {
            prepared.skipped.push(skip(SkipReason::Invalid));
            continue;
        };

        if !seen.insert(identifier.clone()) {
            prepared.skipped.push(skip(SkipReason::Duplicate));
            continue;
        }

        prepared
            .items
            .push(EnrichmentRequestItem::new(format!("row_{}", row), identifier));
    }

    debug!(
        "Prepared {} {} items, skipped {} rows",
        prepared.items.len(),
        kind,
        prepared.skipped.len()
    );
    prepared
}
