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

use crate::config::settings::AgentSettings;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// 代理错误类型
#[derive(Error, Debug)]
pub enum AgentError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 代理报告的执行失败
    #[error("Agent failure: {0}")]
    Failure(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 代理行为标志
///
/// 控制浏览器代理执行任务时的行为，随每次调用传递
#[derive(Debug, Clone)]
pub struct AgentOptions {
    /// 是否启用视觉能力
    pub use_vision: bool,
    /// 最大失败次数
    pub max_failures: u32,
    /// 每步最大动作数
    pub max_actions_per_step: u32,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            use_vision: false,
            max_failures: 2,
            max_actions_per_step: 1,
        }
    }
}

impl From<&AgentSettings> for AgentOptions {
    fn from(settings: &AgentSettings) -> Self {
        Self {
            use_vision: settings.use_vision,
            max_failures: settings.max_failures,
            max_actions_per_step: settings.max_actions_per_step,
        }
    }
}

/// 代理任务
///
/// 提交给浏览器代理的单次执行请求
#[derive(Debug, Clone)]
pub struct AgentTask {
    /// 自然语言任务描述
    pub message: String,
    /// 行为标志
    pub options: AgentOptions,
}

/// 浏览器代理特质
///
/// 外部浏览器自动化能力的抽象。实现接受任务描述，
/// 阻塞直到代理返回最终结果或报告失败。调用可能持续
/// 数秒到数分钟，调用方需在专用工作任务中执行。
#[async_trait]
pub trait BrowserAgent: Send + Sync {
    /// 执行一次代理任务
    ///
    /// # 参数
    ///
    /// * `task` - 任务描述和行为标志
    ///
    /// # 返回值
    ///
    /// * `Ok(Value)` - 代理返回的最终结果负载
    /// * `Err(AgentError)` - 执行失败
    async fn run(&self, task: &AgentTask) -> Result<Value, AgentError>;
}
