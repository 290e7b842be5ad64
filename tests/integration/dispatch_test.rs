// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{setup_db, test_agent_settings};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use visitrs::agent::http_agent::HttpBrowserAgent;
use visitrs::agent::traits::AgentOptions;
use visitrs::domain::models::job::{JobStatus, NewJob};
use visitrs::domain::repositories::activity_log::{ActivityLog, LogFilter};
use visitrs::domain::repositories::job_repository::JobRepository;
use visitrs::domain::services::dispatch_service::{DispatchOutcome, DispatchService};
use visitrs::infrastructure::activity_log::JsonFileActivityLog;
use visitrs::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct DispatchHarness {
    repository: Arc<JobRepositoryImpl>,
    activity_log: Arc<JsonFileActivityLog>,
    dispatcher: DispatchService<JobRepositoryImpl>,
    _log_dir: TempDir,
}

async fn harness(agent_url: &str) -> DispatchHarness {
    let repository = Arc::new(JobRepositoryImpl::new(setup_db().await));

    let log_dir = TempDir::new().unwrap();
    let activity_log = Arc::new(JsonFileActivityLog::new(log_dir.path().join("log.json")));

    let settings = test_agent_settings(agent_url);
    let agent = Arc::new(HttpBrowserAgent::new(&settings).unwrap());

    let dispatcher = DispatchService::new(
        repository.clone(),
        agent,
        activity_log.clone(),
        AgentOptions::from(&settings),
    );

    DispatchHarness {
        repository,
        activity_log,
        dispatcher,
        _log_dir: log_dir,
    }
}

/// 端到端成功路径：pending → running → completed，
/// 恰好一条日志记录了动作和结果
#[tokio::test]
async fn test_dispatch_completes_job_via_agent_service() {
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

    let harness = harness(&mock_agent.uri()).await;
    let job = harness
        .repository
        .create(&NewJob::new("example.com", "widgets"))
        .await
        .unwrap();

    let outcome = harness.dispatcher.dispatch(&job).await.unwrap();

    assert!(matches!(
        outcome,
        DispatchOutcome::Completed { ref result } if result == &json!("found")
    ));
    assert_eq!(
        harness
            .repository
            .find_by_id(job.id)
            .await
            .unwrap()
            .unwrap()
            .status,
        JobStatus::Completed
    );

    let entries = harness.activity_log.query(&LogFilter::default()).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "run_browser_agent");
    assert_eq!(entries[0].details["result"], json!("found"));
    let message = entries[0].details["message"].as_str().unwrap();
    assert!(message.contains("widgets"));
    assert!(message.contains("example.com"));
}

/// 代理报告失败：任务终态failed，日志记录错误文本而非结果
#[tokio::test]
async fn test_dispatch_marks_job_failed_on_agent_error() {
    let mock_agent = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/agent/run"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "error", "error": "page structure changed"})),
        )
        .mount(&mock_agent)
        .await;

    let harness = harness(&mock_agent.uri()).await;
    let job = harness
        .repository
        .create(&NewJob::new("example.com", "widgets"))
        .await
        .unwrap();

    let outcome = harness.dispatcher.dispatch(&job).await.unwrap();

    match outcome {
        DispatchOutcome::Failed { error } => assert!(error.contains("page structure changed")),
        other => panic!("expected failed outcome, got {:?}", other),
    }
    assert_eq!(
        harness
            .repository
            .find_by_id(job.id)
            .await
            .unwrap()
            .unwrap()
            .status,
        JobStatus::Failed
    );

    let entries = harness.activity_log.query(&LogFilter::default()).await;
    assert_eq!(entries.len(), 1);
    assert!(entries[0].details["error"]
        .as_str()
        .unwrap()
        .contains("page structure changed"));
    assert!(entries[0].details.get("result").is_none());
}

/// 代理服务不可达同样被就地恢复为失败终态
#[tokio::test]
async fn test_dispatch_recovers_from_unreachable_agent() {
    // Nothing is listening on this port
    let harness = harness("http://127.0.0.1:9").await;
    let job = harness
        .repository
        .create(&NewJob::new("example.com", "widgets"))
        .await
        .unwrap();

    let outcome = harness.dispatcher.dispatch(&job).await.unwrap();

    assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    assert_eq!(
        harness
            .repository
            .find_by_id(job.id)
            .await
            .unwrap()
            .unwrap()
            .status,
        JobStatus::Failed
    );
}
