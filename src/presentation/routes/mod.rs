// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::job_repository::JobRepository;
use crate::presentation::handlers::{history_handler, task_handler};
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// 处理器以泛型形式挂载，依赖通过 `Extension` 注入，
/// 便于在测试中用替身仓库和代理组装同一棵路由树。
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<R: JobRepository + 'static>() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route(
            "/v1/tasks",
            get(task_handler::get_tasks::<R>).post(task_handler::add_task::<R>),
        )
        .route(
            "/v1/tasks/{id}",
            axum::routing::put(task_handler::update_task::<R>)
                .delete(task_handler::delete_task::<R>),
        )
        .route("/v1/tasks/{id}/run", post(task_handler::run_task::<R>))
        .route("/v1/tasks/run-next", post(task_handler::run_next_task::<R>))
        .route(
            "/v1/history",
            get(history_handler::get_history).delete(history_handler::clear_history),
        )
        .route("/v1/history/search", get(history_handler::search_history));

    Router::new().merge(public_routes).merge(api_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
