// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含的子模块：
/// - HTTP富化接口（http_enrichment_api）：基于reqwest的远端API实现
/// - 可观测性（observability）：Prometheus指标导出
/// - 限流（rate_limiter）：客户端请求节流
///
/// 基础设施层依赖于领域层的抽象接口，领域层不感知具体传输实现。
pub mod http_enrichment_api;
pub mod observability;
pub mod rate_limiter;
