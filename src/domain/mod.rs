// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：富化请求、富化结果与批量任务
/// - 服务（services）：远端富化接口抽象、字段映射与批量任务客户端
///
/// 领域层不依赖具体的HTTP实现，远端接口通过特质注入。
pub mod models;
pub mod services;
