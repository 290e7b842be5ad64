// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::history_request::{HistoryQueryDto, HistorySearchDto};
use crate::domain::repositories::activity_log::{ActivityLog, LogFilter};
use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 查询活动日志
///
/// 过滤条件之间为与关系；`limit` 返回过滤后最近的N条
pub async fn get_history(
    Extension(activity_log): Extension<Arc<dyn ActivityLog>>,
    Query(query): Query<HistoryQueryDto>,
) -> impl IntoResponse {
    let filter = LogFilter {
        limit: query.limit,
        category: query.category,
        action: query.action,
    };

    let history = activity_log.query(&filter).await;

    (
        StatusCode::OK,
        Json(json!({ "status": "success", "history": history })),
    )
}

/// 按关键词搜索活动日志
///
/// 可选的时间窗口边界包含
pub async fn search_history(
    Extension(activity_log): Extension<Arc<dyn ActivityLog>>,
    Query(query): Query<HistorySearchDto>,
) -> impl IntoResponse {
    let Some(keyword) = query.keyword else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "error": "keyword is required" })),
        );
    };

    let history = activity_log
        .search(&keyword, query.start, query.end)
        .await;

    (
        StatusCode::OK,
        Json(json!({ "status": "success", "history": history })),
    )
}

/// 清空活动日志
pub async fn clear_history(
    Extension(activity_log): Extension<Arc<dyn ActivityLog>>,
) -> impl IntoResponse {
    activity_log.clear().await;

    (StatusCode::OK, Json(json!({ "status": "success" })))
}
