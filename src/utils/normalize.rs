// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 规范化公司域名
///
/// 去掉协议、`www.` 前缀和路径并转为小写，不含点号的输入视为无效
///
/// # 返回值
///
/// * `Some(String)` - 规范化后的域名
/// * `None` - 输入为空或不是域名
pub fn normalize_domain(raw: &str) -> Option<String> {
    let mut domain = raw.trim().to_lowercase();
    for prefix in ["https://", "http://"] {
        if let Some(rest) = domain.strip_prefix(prefix) {
            domain = rest.to_string();
        }
    }
    if let Some(rest) = domain.strip_prefix("www.") {
        domain = rest.to_string();
    }

    let host = domain
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('.')
        .to_string();

    if host.is_empty() || !host.contains('.') || host.contains(char::is_whitespace) {
        return None;
    }
    Some(host)
}

/// 规范化LinkedIn个人主页URL
///
/// 去掉查询串与片段，补全 https 协议与结尾斜杠
pub fn normalize_profile_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or_default();
    if !without_query.contains("linkedin.com/in/") {
        return None;
    }

    let rest = without_query
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let mut url = format!("https://{}", rest);
    if !url.ends_with('/') {
        url.push('/');
    }
    Some(url)
}

/// 规范化LinkedIn公司主页URL
///
/// 统一为 `https://www.linkedin.com/company/<slug>/`；只给出slug时补全为完整URL，
/// 无法识别的格式原样返回
pub fn normalize_linkedin_company_url(raw: &str) -> String {
    let url = raw.trim();
    if url.is_empty() {
        return String::new();
    }

    if url.contains("linkedin.com/company") {
        let mut clean = url.split('?').next().unwrap_or_default().to_string();
        if !clean.ends_with('/') {
            clean.push('/');
        }
        let rest = clean
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");
        return format!("https://www.{}", rest);
    }

    if !url.contains('/') {
        return format!("https://www.linkedin.com/company/{}/", url);
    }

    raw.to_string()
}

/// 按员工数划分公司规模区间
pub fn company_size_bucket(employees: u64) -> &'static str {
    match employees {
        0..=10 => "1-10",
        11..=50 => "11-50",
        51..=200 => "51-200",
        201..=1000 => "201-1000",
        1001..=5000 => "1001-5000",
        5001..=10000 => "5001-10000",
        _ => "10000+",
    }
}
