// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::agent::traits::{AgentOptions, AgentTask, BrowserAgent};
use crate::domain::models::job::Job;
use crate::domain::repositories::activity_log::ActivityLog;
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// 调度错误类型
#[derive(Error, Debug)]
pub enum DispatchError {
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    /// 任务不处于待处理状态，未被抢占
    #[error("Job {0} is not pending")]
    NotPending(i32),
}

/// 调度结果
///
/// 单次调度的终态。代理失败被就地恢复为 `Failed` 结果
/// 返回给调用方，绝不作为原始错误向上传播。
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// 代理成功返回最终结果
    Completed {
        /// 代理返回的结果负载
        result: Value,
    },
    /// 代理执行失败
    Failed {
        /// 失败原因文本
        error: String,
    },
}

/// 调度服务
///
/// 将单个任务交给外部浏览器代理执行，并用持久化的状态
/// 记录包围这次缓慢且不可靠的调用：调用前置为 `running`，
/// 返回后根据结果置为 `completed` 或 `failed`，同时向活动
/// 日志追加一条记录。进程在执行中途崩溃时，持久化状态
/// 足以诊断现场。服务本身不做重试，重试预算属于代理内部。
pub struct DispatchService<R: JobRepository> {
    repository: Arc<R>,
    agent: Arc<dyn BrowserAgent>,
    activity_log: Arc<dyn ActivityLog>,
    options: AgentOptions,
}

impl<R: JobRepository> DispatchService<R> {
    /// 创建新的调度服务实例
    ///
    /// # 参数
    ///
    /// * `repository` - 任务仓库
    /// * `agent` - 浏览器代理能力
    /// * `activity_log` - 活动日志
    /// * `options` - 每次调用传递给代理的行为标志
    pub fn new(
        repository: Arc<R>,
        agent: Arc<dyn BrowserAgent>,
        activity_log: Arc<dyn ActivityLog>,
        options: AgentOptions,
    ) -> Self {
        Self {
            repository,
            agent,
            activity_log,
            options,
        }
    }

    /// 调度一个任务
    ///
    /// 以比较并交换方式抢占任务（pending → running），构建
    /// 确定性的任务描述，调用代理并阻塞等待其完成，最后
    /// 落盘终态并记录日志。
    ///
    /// # 参数
    ///
    /// * `job` - 待调度的任务
    ///
    /// # 返回值
    ///
    /// * `Ok(DispatchOutcome)` - 调度终态（成功或代理失败）
    /// * `Err(DispatchError)` - 任务未被抢占，或状态落盘失败
    pub async fn dispatch(&self, job: &Job) -> Result<DispatchOutcome, DispatchError> {
        if !self.repository.acquire(job.id).await? {
            return Err(DispatchError::NotPending(job.id));
        }

        let message = build_task_message(&job.target_website, &job.search_keyword);
        let dispatch_id = Uuid::new_v4();

        info!(
            job_id = job.id,
            %dispatch_id,
            target_website = %job.target_website,
            "Dispatching job to browser agent"
        );

        let task = AgentTask {
            message: message.clone(),
            options: self.options.clone(),
        };

        match self.agent.run(&task).await {
            Ok(result) => {
                self.repository.mark_completed(job.id).await?;
                self.activity_log
                    .append(
                        "run_browser_agent",
                        json!({
                            "dispatch_id": dispatch_id,
                            "task_id": job.id,
                            "loop": job.loop_count,
                            "message": message,
                            "result": result,
                        }),
                        "agent",
                    )
                    .await;

                info!(job_id = job.id, "Job completed");
                Ok(DispatchOutcome::Completed { result })
            }
            Err(e) => {
                let error_message = e.to_string();
                self.repository.mark_failed(job.id).await?;
                self.activity_log
                    .append(
                        "run_browser_agent",
                        json!({
                            "dispatch_id": dispatch_id,
                            "task_id": job.id,
                            "loop": job.loop_count,
                            "message": message,
                            "error": error_message,
                        }),
                        "error",
                    )
                    .await;

                error!(job_id = job.id, error = %error_message, "Job failed");
                Ok(DispatchOutcome::Failed {
                    error: error_message,
                })
            }
        }
    }

    /// 调度下一个待处理任务
    ///
    /// 按排序契约选取优先级最高的待处理任务并调度。
    ///
    /// # 返回值
    ///
    /// * `Ok(Some((Job, DispatchOutcome)))` - 被调度的任务及其终态
    /// * `Ok(None)` - 没有待处理任务
    /// * `Err(DispatchError)` - 调度失败
    pub async fn dispatch_next(&self) -> Result<Option<(Job, DispatchOutcome)>, DispatchError> {
        let Some(job) = self.repository.next_pending().await? else {
            return Ok(None);
        };

        let outcome = self.dispatch(&job).await?;
        Ok(Some((job, outcome)))
    }
}

/// 构建代理任务描述
///
/// 由目标域名和搜索关键词确定性地生成：打开搜索引擎、
/// 搜索关键词、翻页定位目标域名下的结果、点击访问。
///
/// # 参数
///
/// * `target_website` - 目标网站域名
/// * `search_keyword` - 搜索关键词
///
/// # 返回值
///
/// 返回提交给浏览器代理的自然语言任务描述
pub fn build_task_message(target_website: &str, search_keyword: &str) -> String {
    format!(
        r#"
1. Access Google:
    * Open your browser and navigate to https://google.com.
2. Search for the Keyword:
    * In the Google search bar, type "{search_keyword}" and press Enter.
3. Locate the Specific Domain in Results:
    * Check the search results for links under the domain {target_website}.
    * If not found on the current page: Click the "Next" button (or page numbers) at the bottom of Google to check subsequent pages.
4. Visit the Target Website:
    * Once you find a result matching the domain, click the link to navigate to {target_website}.
"#
    )
}
