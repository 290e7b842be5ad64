// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::json;
use tempfile::TempDir;
use visitrs::domain::repositories::activity_log::{ActivityLog, LogFilter, DEFAULT_CATEGORY};
use visitrs::infrastructure::activity_log::JsonFileActivityLog;

fn log_in(dir: &TempDir) -> JsonFileActivityLog {
    JsonFileActivityLog::new(dir.path().join("log.json"))
}

/// 过滤条件为与关系，limit保留过滤后最近的N条
#[tokio::test]
async fn test_query_filters_and_limit() {
    let dir = TempDir::new().unwrap();
    let log = log_in(&dir);

    log.append("add_task", json!({"task_id": 1}), DEFAULT_CATEGORY)
        .await;
    log.append("run_browser_agent", json!({"task_id": 1}), "agent")
        .await;
    log.append("run_browser_agent", json!({"task_id": 2}), "agent")
        .await;
    log.append("run_browser_agent", json!({"task_id": 3}), "error")
        .await;

    let all = log.query(&LogFilter::default()).await;
    assert_eq!(all.len(), 4);

    let agent_runs = log
        .query(&LogFilter {
            category: Some("agent".to_string()),
            action: Some("run_browser_agent".to_string()),
            limit: None,
        })
        .await;
    assert_eq!(agent_runs.len(), 2);

    // Most recent N after filtering
    let latest = log
        .query(&LogFilter {
            action: Some("run_browser_agent".to_string()),
            limit: Some(2),
            category: None,
        })
        .await;
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].details["task_id"], json!(2));
    assert_eq!(latest[1].details["task_id"], json!(3));
}

/// 关键词搜索大小写不敏感，匹配动作或负载中的值
#[tokio::test]
async fn test_search_matches_action_and_details_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let log = log_in(&dir);

    log.append(
        "file_created",
        json!({"filename": "example.txt", "size": 1024}),
        "file_system",
    )
    .await;
    log.append("user_login", json!({"user_id": "12345"}), "user")
        .await;

    let by_action = log.search("FILE", None, None).await;
    assert_eq!(by_action.len(), 1);
    assert_eq!(by_action[0].action, "file_created");

    let by_detail_value = log.search("Example.TXT", None, None).await;
    assert_eq!(by_detail_value.len(), 1);

    let by_number = log.search("1024", None, None).await;
    assert_eq!(by_number.len(), 1);

    assert!(log.search("nothing-here", None, None).await.is_empty());
}

/// 时间窗口边界包含：恰好落在边界上的条目被保留
#[tokio::test]
async fn test_search_time_window_is_boundary_inclusive() {
    let dir = TempDir::new().unwrap();
    let log = log_in(&dir);

    log.append("file_created", json!({"filename": "a.txt"}), "file_system")
        .await;

    let entry_time = log.query(&LogFilter::default()).await[0].timestamp;

    let at_boundary = log
        .search("file", Some(entry_time), Some(entry_time))
        .await;
    assert_eq!(at_boundary.len(), 1);

    let after: DateTime<FixedOffset> = (Utc::now() + chrono::Duration::seconds(60)).into();
    assert!(log.search("file", Some(after), None).await.is_empty());
    assert!(log
        .search("file", None, Some(entry_time - chrono::Duration::seconds(60)))
        .await
        .is_empty());
}

/// 条目在实例重建后从文件恢复；清空后文件也被清空
#[tokio::test]
async fn test_entries_survive_reload_and_clear_discards_all() {
    let dir = TempDir::new().unwrap();

    {
        let log = log_in(&dir);
        log.append("add_task", json!({"task_id": 1}), DEFAULT_CATEGORY)
            .await;
    }

    let reloaded = log_in(&dir);
    let entries = reloaded.query(&LogFilter::default()).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "add_task");

    reloaded.clear().await;
    assert!(reloaded.query(&LogFilter::default()).await.is_empty());

    let after_clear = log_in(&dir);
    assert!(after_clear.query(&LogFilter::default()).await.is_empty());
}

/// 追加是失败宽容的：不可写路径下调用方不受影响
#[tokio::test]
async fn test_append_survives_unwritable_path() {
    let dir = TempDir::new().unwrap();
    let log = JsonFileActivityLog::new(dir.path().join("missing").join("log.json"));

    log.append("add_task", json!({"task_id": 1}), DEFAULT_CATEGORY)
        .await;

    // The write failed silently, the in-memory entry is still observable
    assert_eq!(log.query(&LogFilter::default()).await.len(), 1);
}
