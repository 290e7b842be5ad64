// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::services::dispatch_service::{DispatchError, DispatchService};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{error, info};

/// 调度工作器
///
/// 单工作器模型：循环轮询下一个待处理任务并串行调度，
/// 任意时刻最多只有一次代理调用在进行。代理调用可能持续
/// 数分钟，因此工作器独占一个后台任务，绝不在请求线程
/// 上执行。
pub struct DispatchWorker<R: JobRepository + 'static> {
    dispatcher: Arc<DispatchService<R>>,
    poll_interval: Duration,
}

impl<R: JobRepository + 'static> DispatchWorker<R> {
    /// 创建新的调度工作器实例
    ///
    /// # 参数
    ///
    /// * `dispatcher` - 调度服务
    /// * `poll_interval` - 队列为空时的轮询间隔
    pub fn new(dispatcher: Arc<DispatchService<R>>, poll_interval: Duration) -> Self {
        Self {
            dispatcher,
            poll_interval,
        }
    }

    /// 启动工作器后台任务
    ///
    /// # 返回值
    ///
    /// 返回后台任务的句柄
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Dispatch worker started");
            let mut interval = interval(self.poll_interval);

            loop {
                interval.tick().await;

                match self.dispatcher.dispatch_next().await {
                    Ok(Some((job, _outcome))) => {
                        info!(job_id = job.id, "Dispatch worker finished job");
                    }
                    Ok(None) => {
                        // Queue empty, wait for the next tick
                    }
                    Err(DispatchError::NotPending(id)) => {
                        // Someone else won the job between selection and
                        // acquisition; pick again on the next tick
                        info!(job_id = id, "Job was acquired elsewhere, skipping");
                    }
                    Err(e) => {
                        error!("Dispatch worker iteration failed: {}", e);
                    }
                }
            }
        })
    }
}
