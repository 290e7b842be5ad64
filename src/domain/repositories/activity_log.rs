// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::log_entry::LogEntry;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

/// 默认日志分类
pub const DEFAULT_CATEGORY: &str = "general";

/// 日志查询过滤器
///
/// 过滤条件之间为与关系；`limit` 在过滤后保留最近的N条
#[derive(Debug, Default, Clone)]
pub struct LogFilter {
    /// 返回条数上限
    pub limit: Option<usize>,
    /// 按分类过滤
    pub category: Option<String>,
    /// 按动作标签过滤
    pub action: Option<String>,
}

/// 活动日志特质
///
/// 追加式活动日志的抽象接口。`append` 是失败宽容的：
/// 底层存储写入失败只通过旁路通道报告，绝不向调用方
/// 抛出，丢失一条日志不能中断正在记录的操作。
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// 追加一条日志
    ///
    /// # 参数
    ///
    /// * `action` - 动作标签
    /// * `details` - 结构化负载
    /// * `category` - 分类，通常为 [`DEFAULT_CATEGORY`]
    async fn append(&self, action: &str, details: Value, category: &str);

    /// 按过滤器查询日志
    async fn query(&self, filter: &LogFilter) -> Vec<LogEntry>;

    /// 按关键词搜索日志
    ///
    /// 对动作标签和负载做大小写不敏感的子串匹配，并可选地
    /// 限制在 `[start, end]` 时间窗口内（边界包含）
    async fn search(
        &self,
        keyword: &str,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Vec<LogEntry>;

    /// 清空全部日志
    async fn clear(&self);
}
