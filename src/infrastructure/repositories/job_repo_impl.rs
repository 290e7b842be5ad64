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

use crate::domain::models::job::{Job, JobStatus, NewJob};
use crate::domain::repositories::job_repository::{JobChanges, JobRepository, RepositoryError};
use crate::infrastructure::database::entities::job as job_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use std::sync::Arc;

/// 任务仓库实现
///
/// 基于SeaORM实现的任务数据访问层
#[derive(Clone)]
pub struct JobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl JobRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 以排序契约排序查询
    ///
    /// 排序值相同的任务按创建时间排列；`id` 作为最终决胜项，
    /// 因为自增ID的顺序即插入顺序，可在时间戳碰撞时保持
    /// 排序全序
    fn ordered(select: Select<job_entity::Entity>) -> Select<job_entity::Entity> {
        select
            .order_by_asc(job_entity::Column::Ordering)
            .order_by_asc(job_entity::Column::DateAdd)
            .order_by_asc(job_entity::Column::Id)
    }

    /// 无条件更新任务状态
    async fn set_status(&self, id: i32, status: JobStatus) -> Result<(), RepositoryError> {
        let result = job_entity::Entity::update_many()
            .col_expr(job_entity::Column::Status, Expr::value(status.to_string()))
            .filter(job_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl From<job_entity::Model> for Job {
    fn from(model: job_entity::Model) -> Self {
        Self {
            id: model.id,
            target_website: model.target_website,
            search_keyword: model.search_keyword,
            loop_count: model.loop_count,
            status: model.status.parse().unwrap_or_default(),
            ordering: model.ordering,
            created_at: model.date_add,
        }
    }
}

/// 校验必填字符串非空
fn require_non_empty(field: &str, value: &str) -> Result<(), RepositoryError> {
    if value.trim().is_empty() {
        return Err(RepositoryError::Validation(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}

/// 校验重复次数为正整数
fn require_positive_loop(loop_count: i32) -> Result<(), RepositoryError> {
    if loop_count < 1 {
        return Err(RepositoryError::Validation(
            "loop must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn create(&self, new_job: &NewJob) -> Result<Job, RepositoryError> {
        require_non_empty("target_website", &new_job.target_website)?;
        require_non_empty("search_keyword", &new_job.search_keyword)?;
        require_positive_loop(new_job.loop_count)?;

        let model = job_entity::ActiveModel {
            target_website: Set(new_job.target_website.clone()),
            search_keyword: Set(new_job.search_keyword.clone()),
            loop_count: Set(new_job.loop_count),
            status: Set(JobStatus::Pending.to_string()),
            ordering: Set(new_job.ordering),
            date_add: Set(Utc::now().into()),
            ..Default::default()
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Job>, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError> {
        let models = Self::ordered(job_entity::Entity::find())
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Job::from).collect())
    }

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError> {
        let models = Self::ordered(
            job_entity::Entity::find()
                .filter(job_entity::Column::Status.eq(status.to_string())),
        )
        .all(self.db.as_ref())
        .await?;

        Ok(models.into_iter().map(Job::from).collect())
    }

    async fn update(&self, id: i32, changes: &JobChanges) -> Result<Option<Job>, RepositoryError> {
        if let Some(target_website) = &changes.target_website {
            require_non_empty("target_website", target_website)?;
        }
        if let Some(search_keyword) = &changes.search_keyword {
            require_non_empty("search_keyword", search_keyword)?;
        }
        if let Some(loop_count) = changes.loop_count {
            require_positive_loop(loop_count)?;
        }

        let Some(model) = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
        else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Ok(Some(model.into()));
        }

        let mut active: job_entity::ActiveModel = model.into();
        if let Some(target_website) = &changes.target_website {
            active.target_website = Set(target_website.clone());
        }
        if let Some(search_keyword) = &changes.search_keyword {
            active.search_keyword = Set(search_keyword.clone());
        }
        if let Some(loop_count) = changes.loop_count {
            active.loop_count = Set(loop_count);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.to_string());
        }
        if let Some(ordering) = changes.ordering {
            active.ordering = Set(ordering);
        }

        let updated = active.update(self.db.as_ref()).await?;
        Ok(Some(updated.into()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let result = job_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn reorder(&self, id: i32, new_ordering: i32) -> Result<Option<Job>, RepositoryError> {
        self.update(
            id,
            &JobChanges {
                ordering: Some(new_ordering),
                ..Default::default()
            },
        )
        .await
    }

    async fn next_pending(&self) -> Result<Option<Job>, RepositoryError> {
        let model = Self::ordered(
            job_entity::Entity::find()
                .filter(job_entity::Column::Status.eq(JobStatus::Pending.to_string())),
        )
        .one(self.db.as_ref())
        .await?;

        Ok(model.map(Into::into))
    }

    async fn acquire(&self, id: i32) -> Result<bool, RepositoryError> {
        // Single UPDATE with the pending precondition, so two concurrent
        // dispatchers cannot both win the same job
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Running.to_string()),
            )
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::Status.eq(JobStatus::Pending.to_string()))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn mark_completed(&self, id: i32) -> Result<(), RepositoryError> {
        self.set_status(id, JobStatus::Completed).await
    }

    async fn mark_failed(&self, id: i32) -> Result<(), RepositoryError> {
        self.set_status(id, JobStatus::Failed).await
    }
}
