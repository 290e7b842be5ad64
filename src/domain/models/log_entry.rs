// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 日志条目实体
///
/// 活动日志中的单条结构化记录。条目一旦追加即不可变，
/// 仅支持整体清空。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 记录时间
    pub timestamp: DateTime<FixedOffset>,
    /// 动作标签，例如 "run_browser_agent"、"add_task"
    pub action: String,
    /// 分类，默认为 "general"
    pub category: String,
    /// 任意结构化负载，例如消息文本、结果或错误信息
    pub details: Value,
}

impl LogEntry {
    /// 判断条目是否匹配关键词
    ///
    /// 对 `action` 以及 `details` 中的每个值做大小写不敏感的
    /// 子串匹配。`details` 为对象时逐值匹配，否则匹配其整体
    /// 字符串表示。
    ///
    /// # 参数
    ///
    /// * `keyword` - 搜索关键词
    ///
    /// # 返回值
    ///
    /// 匹配则返回true，否则返回false
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();

        if self.action.to_lowercase().contains(&keyword) {
            return true;
        }

        match &self.details {
            Value::Object(map) => map
                .values()
                .any(|v| value_text(v).to_lowercase().contains(&keyword)),
            other => value_text(other).to_lowercase().contains(&keyword),
        }
    }
}

/// 提取JSON值的文本表示
///
/// 字符串值直接返回内容，其余类型返回紧凑JSON表示
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
