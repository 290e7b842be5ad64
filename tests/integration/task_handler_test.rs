// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use serde_json::{json, Value};
use visitrs::domain::models::job::JobStatus;
use visitrs::domain::repositories::job_repository::JobRepository;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 创建任务并列出：统一成功信封
#[tokio::test]
async fn test_add_and_list_tasks() {
    let app = create_test_app("http://127.0.0.1:9").await;

    let response = app
        .server
        .post("/v1/tasks")
        .json(&json!({
            "target_website": "example.com",
            "search_keyword": "widgets",
            "loop": 2
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["task"]["target_website"], "example.com");
    assert_eq!(body["task"]["loop"], 2);
    assert_eq!(body["task"]["status"], "pending");
    assert!(body["task"]["date_add"].is_string());

    let list: Value = app.server.get("/v1/tasks").await.json();
    assert_eq!(list["status"], "success");
    assert_eq!(list["tasks"].as_array().unwrap().len(), 1);
}

/// 校验失败返回错误信封，且不持久化任何记录
#[tokio::test]
async fn test_add_task_with_empty_field_is_rejected() {
    let app = create_test_app("http://127.0.0.1:9").await;

    let response = app
        .server
        .post("/v1/tasks")
        .json(&json!({
            "target_website": "",
            "search_keyword": "kw"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("target_website"));

    assert!(app.repository.list_all().await.unwrap().is_empty());
}

/// 非法状态过滤值返回错误信封
#[tokio::test]
async fn test_get_tasks_rejects_invalid_status() {
    let app = create_test_app("http://127.0.0.1:9").await;

    let response = app.server.get("/v1/tasks").add_query_param("status", "doing").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("doing"));
}

/// 部分更新：未知字段被忽略，状态被覆盖
#[tokio::test]
async fn test_update_task_ignores_unknown_fields() {
    let app = create_test_app("http://127.0.0.1:9").await;

    let created: Value = app
        .server
        .post("/v1/tasks")
        .json(&json!({
            "target_website": "example.com",
            "search_keyword": "widgets"
        }))
        .await
        .json();
    let id = created["task"]["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/v1/tasks/{}", id))
        .json(&json!({
            "status": "completed",
            "bogus_field": "ignored",
            "id": 424242
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["task"]["id"], json!(id));
    assert_eq!(body["task"]["status"], "completed");

    let stored = app
        .repository
        .find_by_id(id as i32)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
}

/// 更新不存在的任务返回404错误信封
#[tokio::test]
async fn test_update_missing_task_returns_not_found() {
    let app = create_test_app("http://127.0.0.1:9").await;

    let response = app
        .server
        .put("/v1/tasks/9999")
        .json(&json!({"ordering": 5}))
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["status"], "error");
}

/// 删除两次：deleted字段先true后false，两次都是成功信封
#[tokio::test]
async fn test_delete_task_twice() {
    let app = create_test_app("http://127.0.0.1:9").await;

    let created: Value = app
        .server
        .post("/v1/tasks")
        .json(&json!({
            "target_website": "example.com",
            "search_keyword": "widgets"
        }))
        .await
        .json();
    let id = created["task"]["id"].as_i64().unwrap();

    let first: Value = app
        .server
        .delete(&format!("/v1/tasks/{}", id))
        .await
        .json();
    assert_eq!(first["status"], "success");
    assert_eq!(first["deleted"], json!(true));

    let second: Value = app
        .server
        .delete(&format!("/v1/tasks/{}", id))
        .await
        .json();
    assert_eq!(second["status"], "success");
    assert_eq!(second["deleted"], json!(false));
}

/// 通过HTTP触发调度：成功后任务完成，重复调度返回冲突
#[tokio::test]
async fn test_run_task_dispatches_and_rejects_double_dispatch() {
    let mock_agent = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/agent/run"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success", "result": "found"})),
        )
        .expect(1)
        .mount(&mock_agent)
        .await;

    let app = create_test_app(&mock_agent.uri()).await;

    let created: Value = app
        .server
        .post("/v1/tasks")
        .json(&json!({
            "target_website": "example.com",
            "search_keyword": "widgets"
        }))
        .await
        .json();
    let id = created["task"]["id"].as_i64().unwrap();

    let run: Value = app
        .server
        .post(&format!("/v1/tasks/{}/run", id))
        .await
        .json();
    assert_eq!(run["status"], "success");
    assert_eq!(run["result"], json!("found"));

    let rerun = app.server.post(&format!("/v1/tasks/{}/run", id)).await;
    rerun.assert_status(axum::http::StatusCode::CONFLICT);
    let body: Value = rerun.json();
    assert_eq!(body["status"], "error");
}

/// run-next：空队列返回task=null，有任务时按排序调度
#[tokio::test]
async fn test_run_next_task() {
    let mock_agent = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/agent/run"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success", "result": "ok"})),
        )
        .mount(&mock_agent)
        .await;

    let app = create_test_app(&mock_agent.uri()).await;

    let empty: Value = app.server.post("/v1/tasks/run-next").await.json();
    assert_eq!(empty["status"], "success");
    assert!(empty["task"].is_null());

    app.server
        .post("/v1/tasks")
        .json(&json!({
            "target_website": "example.com",
            "search_keyword": "widgets"
        }))
        .await;

    let run: Value = app.server.post("/v1/tasks/run-next").await.json();
    assert_eq!(run["status"], "success");
    assert_eq!(run["task"]["target_website"], "example.com");
    assert_eq!(run["result"], json!("ok"));
}

/// 管理操作写入活动日志，历史接口可查询、搜索和清空
#[tokio::test]
async fn test_history_endpoints() {
    let app = create_test_app("http://127.0.0.1:9").await;

    app.server
        .post("/v1/tasks")
        .json(&json!({
            "target_website": "example.com",
            "search_keyword": "widgets"
        }))
        .await;

    let history: Value = app
        .server
        .get("/v1/history")
        .add_query_param("action", "add_task")
        .await
        .json();
    assert_eq!(history["status"], "success");
    assert_eq!(history["history"].as_array().unwrap().len(), 1);

    // The HTTP view and the log component agree
    let direct = app
        .activity_log
        .query(&visitrs::domain::repositories::activity_log::LogFilter::default())
        .await;
    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].action, "add_task");

    let found: Value = app
        .server
        .get("/v1/history/search")
        .add_query_param("keyword", "EXAMPLE.COM")
        .await
        .json();
    assert_eq!(found["history"].as_array().unwrap().len(), 1);

    let missing_keyword = app.server.get("/v1/history/search").await;
    missing_keyword.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let cleared: Value = app.server.delete("/v1/history").await.json();
    assert_eq!(cleared["status"], "success");

    let after: Value = app.server.get("/v1/history").await.json();
    assert!(after["history"].as_array().unwrap().is_empty());
}
