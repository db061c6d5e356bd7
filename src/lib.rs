// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 把调用方的原始输入整理成可提交的富化请求
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含富化任务的核心实体、远端接口抽象和批量任务客户端
pub mod domain;

/// 基础设施模块
///
/// 提供外部服务集成，如富化API的HTTP客户端、客户端限流与指标导出
pub mod infrastructure;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
