// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置，包括API凭据、批量任务参数与重试策略
pub mod enrichment;
pub mod settings;
