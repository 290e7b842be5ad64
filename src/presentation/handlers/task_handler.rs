// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::task_request::{
    AddTaskRequestDto, TaskListQueryDto, UpdateTaskRequestDto,
};
use crate::domain::models::job::JobStatus;
use crate::domain::repositories::activity_log::{ActivityLog, DEFAULT_CATEGORY};
use crate::domain::repositories::job_repository::{JobChanges, JobRepository};
use crate::domain::services::dispatch_service::{DispatchError, DispatchOutcome, DispatchService};
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 构建错误信封响应
fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({ "status": "error", "error": message.into() })),
    )
        .into_response()
}

/// 获取任务列表
///
/// 支持可选的状态过滤和排序值精确过滤，结果始终按
/// (ordering, created_at) 升序排列
pub async fn get_tasks<R: JobRepository>(
    Extension(repository): Extension<Arc<R>>,
    Query(query): Query<TaskListQueryDto>,
) -> Result<Response, AppError> {
    let mut tasks = match &query.status {
        Some(raw) => {
            let Ok(status) = raw.parse::<JobStatus>() else {
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid status value: {}", raw),
                ));
            };
            repository.list_by_status(status).await?
        }
        None => repository.list_all().await?,
    };

    if let Some(ordering) = query.ordering {
        tasks.retain(|task| task.ordering == ordering);
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "tasks": tasks })),
    )
        .into_response())
}

/// 创建新任务
pub async fn add_task<R: JobRepository>(
    Extension(repository): Extension<Arc<R>>,
    Extension(activity_log): Extension<Arc<dyn ActivityLog>>,
    Json(payload): Json<AddTaskRequestDto>,
) -> Result<Response, AppError> {
    if let Err(errors) = payload.validate() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            format!("Validation error: {}", errors),
        ));
    }

    let task = repository.create(&payload.into()).await?;

    activity_log
        .append(
            "add_task",
            json!({ "task_id": task.id, "target_website": task.target_website }),
            DEFAULT_CATEGORY,
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "task": task })),
    )
        .into_response())
}

/// 更新任务字段
///
/// 应用部分字段更新；请求体中的未知字段被忽略
pub async fn update_task<R: JobRepository>(
    Extension(repository): Extension<Arc<R>>,
    Extension(activity_log): Extension<Arc<dyn ActivityLog>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTaskRequestDto>,
) -> Result<Response, AppError> {
    let status = match &payload.status {
        Some(raw) => match raw.parse::<JobStatus>() {
            Ok(status) => Some(status),
            Err(()) => {
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid status value: {}", raw),
                ));
            }
        },
        None => None,
    };

    let changes = JobChanges {
        target_website: payload.target_website,
        search_keyword: payload.search_keyword,
        loop_count: payload.loop_count,
        status,
        ordering: payload.ordering,
    };

    let Some(task) = repository.update(id, &changes).await? else {
        return Ok(error_response(StatusCode::NOT_FOUND, "task not found"));
    };

    activity_log
        .append("update_task", json!({ "task_id": task.id }), DEFAULT_CATEGORY)
        .await;

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "task": task })),
    )
        .into_response())
}

/// 删除任务
///
/// 删除不存在的ID不是错误，`deleted` 字段反映是否有记录被删除
pub async fn delete_task<R: JobRepository>(
    Extension(repository): Extension<Arc<R>>,
    Extension(activity_log): Extension<Arc<dyn ActivityLog>>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let deleted = repository.delete(id).await?;

    if deleted {
        activity_log
            .append("delete_task", json!({ "task_id": id }), DEFAULT_CATEGORY)
            .await;
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "deleted": deleted })),
    )
        .into_response())
}

/// 调度指定任务
///
/// 将任务交给浏览器代理执行并阻塞等待终态。代理失败
/// 以错误信封返回，不作为HTTP层错误传播。
pub async fn run_task<R: JobRepository>(
    Extension(repository): Extension<Arc<R>>,
    Extension(dispatcher): Extension<Arc<DispatchService<R>>>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let Some(task) = repository.find_by_id(id).await? else {
        return Ok(error_response(StatusCode::NOT_FOUND, "task not found"));
    };

    match dispatcher.dispatch(&task).await {
        Ok(DispatchOutcome::Completed { result }) => Ok((
            StatusCode::OK,
            Json(json!({ "status": "success", "result": result })),
        )
            .into_response()),
        Ok(DispatchOutcome::Failed { error }) => {
            Ok(error_response(StatusCode::OK, error))
        }
        Err(DispatchError::NotPending(id)) => Ok(error_response(
            StatusCode::CONFLICT,
            format!("task {} is not pending", id),
        )),
        Err(DispatchError::Repository(e)) => Err(e.into()),
    }
}

/// 调度下一个待处理任务
///
/// 队列为空时返回 `task: null` 的成功信封
pub async fn run_next_task<R: JobRepository>(
    Extension(dispatcher): Extension<Arc<DispatchService<R>>>,
) -> Result<Response, AppError> {
    match dispatcher.dispatch_next().await {
        Ok(None) => Ok((
            StatusCode::OK,
            Json(json!({ "status": "success", "task": null })),
        )
            .into_response()),
        Ok(Some((task, DispatchOutcome::Completed { result }))) => Ok((
            StatusCode::OK,
            Json(json!({ "status": "success", "task": task, "result": result })),
        )
            .into_response()),
        Ok(Some((task, DispatchOutcome::Failed { error }))) => Ok((
            StatusCode::OK,
            Json(json!({ "status": "error", "task": task, "error": error })),
        )
            .into_response()),
        Err(DispatchError::NotPending(id)) => Ok(error_response(
            StatusCode::CONFLICT,
            format!("task {} is not pending", id),
        )),
        Err(DispatchError::Repository(e)) => Err(e.into()),
    }
}
