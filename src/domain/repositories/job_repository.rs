// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{Job, JobStatus, NewJob};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 输入验证失败
    #[error("Validation error: {0}")]
    Validation(String),
}

/// 任务字段变更集
///
/// 显式标记的部分更新请求：每个可更新字段对应一个可选项，
/// `None` 表示保持原值。`id` 和 `created_at` 不可更新。
/// 未知字段在DTO边界被静默丢弃，保持来源系统的宽松语义。
#[derive(Debug, Default, Clone)]
pub struct JobChanges {
    /// 目标网站域名
    pub target_website: Option<String>,
    /// 搜索关键词
    pub search_keyword: Option<String>,
    /// 重复次数
    pub loop_count: Option<i32>,
    /// 任务状态（人工修正出口）
    pub status: Option<JobStatus>,
    /// 手动排序值
    pub ordering: Option<i32>,
}

impl JobChanges {
    /// 判断变更集是否为空
    pub fn is_empty(&self) -> bool {
        self.target_website.is_none()
            && self.search_keyword.is_none()
            && self.loop_count.is_none()
            && self.status.is_none()
            && self.ordering.is_none()
    }
}

/// 任务仓库特质
///
/// 定义任务数据访问接口。所有列表操作按
/// (`ordering` 升序, `created_at` 升序) 排序，这是
/// `next_pending` 选取策略依赖的排序契约。
/// 未找到记录通过 `Option`/`bool` 表示，不作为错误返回。
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 创建新任务
    ///
    /// 校验目标域名和搜索关键词非空、重复次数为正，
    /// 成功时返回带有存储层分配的 `id` 和 `created_at`、
    /// 状态为 `pending` 的任务
    async fn create(&self, new_job: &NewJob) -> Result<Job, RepositoryError>;

    /// 根据ID查找任务
    async fn find_by_id(&self, id: i32) -> Result<Option<Job>, RepositoryError>;

    /// 获取所有任务
    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError>;

    /// 按状态获取任务
    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError>;

    /// 应用部分字段更新
    ///
    /// 任务不存在时返回 `Ok(None)`，不产生任何变更
    async fn update(&self, id: i32, changes: &JobChanges) -> Result<Option<Job>, RepositoryError>;

    /// 删除任务
    ///
    /// 返回是否有记录被删除；删除不存在的ID不是错误
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;

    /// 更新任务排序值
    async fn reorder(&self, id: i32, new_ordering: i32) -> Result<Option<Job>, RepositoryError>;

    /// 获取下一个待处理任务
    ///
    /// 按排序契约返回优先级最高的待处理任务。这是一个
    /// 建议性的幂等读取，不加锁：状态未变时重复调用
    /// 返回同一任务
    async fn next_pending(&self) -> Result<Option<Job>, RepositoryError>;

    /// 以比较并交换方式占用任务
    ///
    /// 仅当存储中的状态仍为 `pending` 时将其置为 `running`，
    /// 返回是否抢占成功。防止同一任务被并发重复调度
    async fn acquire(&self, id: i32) -> Result<bool, RepositoryError>;

    /// 标记任务已完成
    async fn mark_completed(&self, id: i32) -> Result<(), RepositoryError>;

    /// 标记任务已失败
    async fn mark_failed(&self, id: i32) -> Result<(), RepositoryError>;
}
