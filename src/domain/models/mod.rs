// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 富化（enrichment）：请求条目、实体类型与单条富化结果
/// - 批量任务（bulk_job）：远端批量任务的本地状态机与提交结果
pub mod bulk_job;
pub mod enrichment;
