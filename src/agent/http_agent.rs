// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::agent::traits::{AgentError, AgentTask, BrowserAgent};
use crate::config::settings::AgentSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP浏览器代理实现
///
/// 通过HTTP与旁路运行的浏览器代理服务通信。服务接收
/// 任务描述和行为标志，驱动真实浏览器完成搜索并访问流程，
/// 执行耗时可达数分钟，因此客户端超时需配置得足够宽松。
pub struct HttpBrowserAgent {
    client: reqwest::Client,
    run_url: Url,
}

#[derive(Serialize)]
struct AgentRunRequest<'a> {
    task: &'a str,
    use_vision: bool,
    max_failures: u32,
    max_actions_per_step: u32,
}

#[derive(Deserialize, Debug)]
struct AgentRunResponse {
    status: String,
    result: Option<Value>,
    error: Option<String>,
}

impl HttpBrowserAgent {
    /// 创建新的HTTP浏览器代理实例
    ///
    /// # 参数
    ///
    /// * `settings` - 代理服务配置
    ///
    /// # 返回值
    ///
    /// * `Ok(HttpBrowserAgent)` - 代理客户端
    /// * `Err(AgentError)` - HTTP客户端构建失败
    pub fn new(settings: &AgentSettings) -> Result<Self, AgentError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder.build()?;

        let base_url = Url::parse(&settings.url)
            .map_err(|e| AgentError::Other(format!("invalid agent url: {}", e)))?;
        let run_url = base_url
            .join("/v1/agent/run")
            .map_err(|e| AgentError::Other(format!("invalid agent url: {}", e)))?;

        Ok(Self { client, run_url })
    }
}

#[async_trait]
impl BrowserAgent for HttpBrowserAgent {
    async fn run(&self, task: &AgentTask) -> Result<Value, AgentError> {
        let req_body = AgentRunRequest {
            task: &task.message,
            use_vision: task.options.use_vision,
            max_failures: task.options.max_failures,
            max_actions_per_step: task.options.max_actions_per_step,
        };

        debug!("Submitting task to browser agent at {}", self.run_url);

        let resp = self
            .client
            .post(self.run_url.clone())
            .json(&req_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout
                } else {
                    AgentError::RequestFailed(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AgentError::Failure(format!(
                "agent service returned {}: {}",
                status, body
            )));
        }

        let payload: AgentRunResponse = resp.json().await.map_err(|e| {
            AgentError::Other(format!("invalid agent response: {}", e))
        })?;

        if payload.status == "error" {
            return Err(AgentError::Failure(
                payload
                    .error
                    .unwrap_or_else(|| "agent reported an unspecified error".to_string()),
            ));
        }

        Ok(payload.result.unwrap_or(Value::Null))
    }
}
