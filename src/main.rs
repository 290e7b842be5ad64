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

use axum::Extension;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use visitrs::agent::http_agent::HttpBrowserAgent;
use visitrs::agent::traits::AgentOptions;
use visitrs::config::settings::Settings;
use visitrs::domain::repositories::activity_log::ActivityLog;
use visitrs::domain::services::dispatch_service::DispatchService;
use visitrs::infrastructure::activity_log::JsonFileActivityLog;
use visitrs::infrastructure::database::connection;
use visitrs::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use visitrs::presentation::routes;
use visitrs::utils::telemetry;
use visitrs::workers::dispatch_worker::DispatchWorker;

use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting visitrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize components
    let job_repository = Arc::new(JobRepositoryImpl::new(db.clone()));
    let activity_log: Arc<dyn ActivityLog> =
        Arc::new(JsonFileActivityLog::new(&settings.activity_log.path));
    let agent = Arc::new(HttpBrowserAgent::new(&settings.agent)?);

    let dispatcher = Arc::new(DispatchService::new(
        job_repository.clone(),
        agent,
        activity_log.clone(),
        AgentOptions::from(&settings.agent),
    ));

    // 5. Optionally start the background dispatch worker
    if settings.dispatcher.auto_run {
        let worker = DispatchWorker::new(
            dispatcher.clone(),
            Duration::from_secs(settings.dispatcher.poll_interval),
        );
        worker.start();
        info!("Dispatch worker enabled");
    }

    // 6. Start HTTP server
    let app = routes::routes::<JobRepositoryImpl>()
        .layer(Extension(job_repository))
        .layer(Extension(activity_log))
        .layer(Extension(dispatcher))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
