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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、代理、活动日志和调度器等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 浏览器代理配置
    pub agent: AgentSettings,
    /// 活动日志配置
    pub activity_log: ActivityLogSettings,
    /// 调度器配置
    pub dispatcher: DispatcherSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 浏览器代理配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSettings {
    /// 代理服务基础URL
    pub url: String,
    /// 单次任务请求超时时间（秒）
    pub request_timeout: Option<u64>,
    /// 是否启用视觉能力
    pub use_vision: bool,
    /// 最大失败次数
    pub max_failures: u32,
    /// 每步最大动作数
    pub max_actions_per_step: u32,
}

/// 活动日志配置设置
#[derive(Debug, Deserialize)]
pub struct ActivityLogSettings {
    /// 日志文件路径
    pub path: String,
}

/// 调度器配置设置
#[derive(Debug, Deserialize)]
pub struct DispatcherSettings {
    /// 是否自动执行待处理任务
    pub auto_run: bool,
    /// 待处理任务轮询间隔（秒）
    pub poll_interval: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8090)?
            // Default DB pool settings
            .set_default("database.url", "sqlite://visitrs.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default agent settings
            .set_default("agent.url", "http://127.0.0.1:8765")?
            .set_default("agent.request_timeout", 600)?
            .set_default("agent.use_vision", false)?
            .set_default("agent.max_failures", 2)?
            .set_default("agent.max_actions_per_step", 1)?
            // Default activity log settings
            .set_default("activity_log.path", "log.json")?
            // Default dispatcher settings
            .set_default("dispatcher.auto_run", false)?
            .set_default("dispatcher.poll_interval", 5)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("VISITRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
