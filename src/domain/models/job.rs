// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 任务实体
///
/// 表示一个排队的搜索并访问自动化任务。任务携带目标域名、
/// 搜索关键词、重复次数、生命周期状态以及手动排序值。
/// `id` 和 `created_at` 由存储层在插入时分配，之后不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// 任务唯一标识符，由存储层分配
    pub id: i32,
    /// 目标网站域名
    pub target_website: String,
    /// 搜索引擎查询关键词
    pub search_keyword: String,
    /// 请求的重复次数，默认为1
    #[serde(rename = "loop")]
    pub loop_count: i32,
    /// 任务状态，跟踪任务在其生命周期中的当前阶段
    pub status: JobStatus,
    /// 手动排序值，数值越小优先级越高，允许重复
    pub ordering: i32,
    /// 创建时间，任务插入时由存储层设置
    #[serde(rename = "date_add")]
    pub created_at: DateTime<FixedOffset>,
}

/// 新任务请求
///
/// 创建任务时由调用方提供的字段集合。`id` 和 `created_at`
/// 由存储层分配，不在此结构中出现。
#[derive(Debug, Clone)]
pub struct NewJob {
    /// 目标网站域名
    pub target_website: String,
    /// 搜索引擎查询关键词
    pub search_keyword: String,
    /// 请求的重复次数
    pub loop_count: i32,
    /// 手动排序值
    pub ordering: i32,
}

impl NewJob {
    /// 创建一个新任务请求
    ///
    /// # 参数
    ///
    /// * `target_website` - 目标网站域名
    /// * `search_keyword` - 搜索关键词
    ///
    /// # 返回值
    ///
    /// 返回重复次数为1、排序值为0的新任务请求
    pub fn new(target_website: impl Into<String>, search_keyword: impl Into<String>) -> Self {
        Self {
            target_website: target_website.into(),
            search_keyword: search_keyword.into(),
            loop_count: 1,
            ordering: 0,
        }
    }
}

/// 任务状态枚举
///
/// 表示任务在其生命周期中的不同状态。
/// 状态转换遵循以下流程：
/// Pending → Running → Completed/Failed
///
/// 调度器是唯一执行这些转换的组件；通用的字段更新操作
/// 仍可直接覆盖状态，作为人工修正的出口。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 待处理，任务已创建但尚未开始执行
    #[default]
    Pending,
    /// 执行中，任务已交给浏览器代理
    Running,
    /// 已完成，代理成功执行完成
    Completed,
    /// 已失败，代理执行失败
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(()),
        }
    }
}
