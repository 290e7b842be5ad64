// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含跨实体的业务流程：
/// - 调度服务（dispatch_service）：将单个任务交给浏览器代理执行
///   并记录其结果
pub mod dispatch_service;
