// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::NewJob;
use serde::Deserialize;
use validator::Validate;

fn default_loop() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddTaskRequestDto {
    #[validate(length(min = 1, message = "target_website cannot be empty"))]
    pub target_website: String,
    #[validate(length(min = 1, message = "search_keyword cannot be empty"))]
    pub search_keyword: String,
    #[serde(default = "default_loop", rename = "loop")]
    #[validate(range(min = 1, message = "loop must be a positive integer"))]
    pub loop_count: i32,
    #[serde(default)]
    pub ordering: i32,
}

impl From<AddTaskRequestDto> for NewJob {
    fn from(dto: AddTaskRequestDto) -> Self {
        Self {
            target_website: dto.target_website,
            search_keyword: dto.search_keyword,
            loop_count: dto.loop_count,
            ordering: dto.ordering,
        }
    }
}

/// 部分更新请求
///
/// 缺失的字段保持原值；请求体中未知的字段被静默忽略。
/// `id` 和 `date_add` 不可更新，即使出现在请求体中也会被丢弃。
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequestDto {
    pub target_website: Option<String>,
    pub search_keyword: Option<String>,
    #[serde(rename = "loop")]
    pub loop_count: Option<i32>,
    pub status: Option<String>,
    pub ordering: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct TaskListQueryDto {
    pub status: Option<String>,
    pub ordering: Option<i32>,
}
