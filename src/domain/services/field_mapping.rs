// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;

use crate::domain::models::enrichment::FieldMap;
use crate::utils::normalize::{company_size_bucket, normalize_linkedin_company_url};

/// 为公司记录补充派生字段
///
/// - `linkedin`：由 `linkedinURL`/`linkedInURL` 规范化得到
/// - `website`：`websites` 数组的第一项
/// - `size`：由 `employeeCount` 划分的规模区间
///
/// 已存在的同名字段不会被覆盖。
pub fn derive_company_fields(fields: &mut FieldMap) {
    let linkedin = fields
        .get("linkedinURL")
        .or_else(|| fields.get("linkedInURL"))
        .and_then(Value::as_str)
        .map(normalize_linkedin_company_url)
        .filter(|url| !url.is_empty());
    if let Some(url) = linkedin {
        fields.entry("linkedin").or_insert(Value::String(url));
    }

    let website = fields
        .get("websites")
        .and_then(Value::as_array)
        .and_then(|sites| sites.first())
        .and_then(Value::as_str)
        .map(str::to_string);
    if let Some(site) = website {
        fields.entry("website").or_insert(Value::String(site));
    }

    if let Some(count) = fields.get("employeeCount").and_then(employee_count) {
        fields
            .entry("size")
            .or_insert_with(|| Value::String(company_size_bucket(count).to_string()));
    }
}

fn employee_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        // Only thousands separators are tolerated; ranges and decimals yield no size.
        Value::String(s) => s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect::<String>()
            .parse()
            .ok(),
        _ => None,
    }
}
