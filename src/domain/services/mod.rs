// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 批量任务客户端（bulk_job_client）：分块提交、并发轮询与结果对齐
/// - 富化接口（enrichment_api）：远端提交与状态查询的抽象
/// - 字段映射（field_mapping）：从远端记录派生展示字段
pub mod bulk_job_client;
pub mod enrichment_api;
pub mod field_mapping;
