// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和统一错误映射。
/// 所有管理操作都返回统一的 `{status: success|error}` 响应
/// 信封，调用方根据 `status` 字段分支而不是捕获异常。
pub mod errors;
pub mod handlers;
pub mod routes;
