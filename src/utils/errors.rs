// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 富化操作错误类型
///
/// 只有会中止整个操作的情况才以错误返回，
/// 单个分块或任务的失败以结果数据的形式表达。
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("认证失败: {0}")]
    Authentication(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("配置错误: {0}")]
    Configuration(String),
}

impl From<validator::ValidationErrors> for EnrichmentError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EnrichmentError::Configuration(errors.to_string())
    }
}
