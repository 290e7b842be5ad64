// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::log_entry::LogEntry;
use crate::domain::repositories::activity_log::{ActivityLog, LogFilter};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use std::path::PathBuf;
use tracing::warn;

/// JSON文件活动日志实现
///
/// 条目常驻内存，文件在每次追加时整体重写。该文件归
/// 活动日志独占，其他组件不得直接写入。写入失败只记录
/// 告警，绝不向调用方抛出。
pub struct JsonFileActivityLog {
    path: PathBuf,
    entries: RwLock<Vec<LogEntry>>,
}

impl JsonFileActivityLog {
    /// 创建新的活动日志实例
    ///
    /// 若日志文件已存在则加载其中的历史条目；文件损坏或
    /// 不可读时从空日志开始并记录告警。
    ///
    /// # 参数
    ///
    /// * `path` - 日志文件路径
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<LogEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), "Failed to parse activity log file: {}", e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), "Failed to read activity log file: {}", e);
                Vec::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// 将当前条目快照写入文件
    async fn persist(&self, snapshot: &[LogEntry]) {
        let payload = match serde_json::to_vec_pretty(snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize activity log: {}", e);
                return;
            }
        };

        if let Err(e) = tokio::fs::write(&self.path, payload).await {
            warn!(path = %self.path.display(), "Failed to persist activity log: {}", e);
        }
    }
}

#[async_trait]
impl ActivityLog for JsonFileActivityLog {
    async fn append(&self, action: &str, details: Value, category: &str) {
        let entry = LogEntry {
            timestamp: Utc::now().into(),
            action: action.to_string(),
            category: category.to_string(),
            details,
        };

        // Snapshot under the lock, write the file outside of it
        let snapshot = {
            let mut entries = self.entries.write();
            entries.push(entry);
            entries.clone()
        };

        self.persist(&snapshot).await;
    }

    async fn query(&self, filter: &LogFilter) -> Vec<LogEntry> {
        let entries = self.entries.read();

        let mut filtered: Vec<LogEntry> = entries
            .iter()
            .filter(|entry| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|category| &entry.category == category)
            })
            .filter(|entry| {
                filter
                    .action
                    .as_ref()
                    .is_none_or(|action| &entry.action == action)
            })
            .cloned()
            .collect();

        if let Some(limit) = filter.limit {
            if filtered.len() > limit {
                filtered = filtered.split_off(filtered.len() - limit);
            }
        }

        filtered
    }

    async fn search(
        &self,
        keyword: &str,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Vec<LogEntry> {
        let entries = self.entries.read();

        entries
            .iter()
            .filter(|entry| start.is_none_or(|start| entry.timestamp >= start))
            .filter(|entry| end.is_none_or(|end| entry.timestamp <= end))
            .filter(|entry| entry.matches_keyword(keyword))
            .cloned()
            .collect()
    }

    async fn clear(&self) {
        {
            let mut entries = self.entries.write();
            entries.clear();
        }

        self.persist(&[]).await;
    }
}
