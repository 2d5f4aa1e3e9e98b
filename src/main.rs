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

use anyhow::Context;
use onionrs::config::settings::Settings;
use onionrs::domain::services::content_policy::{ContentTypePolicy, MatchMode};
use onionrs::engines::fetch_engine::HttpFetchEngine;
use onionrs::engines::traits::PageFetcher;
use onionrs::infrastructure::amqp::client::AmqpClient;
use onionrs::infrastructure::metrics;
use onionrs::utils::telemetry;
use onionrs::workers::crawl_worker::CrawlWorker;
use onionrs::workers::runtime::WorkerRuntime;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 主函数
///
/// 工作器入口点，初始化所有组件并启动消费循环
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Initializing crawler worker");

    // 2. Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    info!("Configuration loaded");

    // 3. Initialize Prometheus metrics
    if settings.metrics.enabled {
        metrics::init_metrics(settings.metrics.port);
    }

    // Allow some boot delay so the broker comes up first in docker-compose
    if settings.startup_delay_secs > 0 {
        info!(delay = settings.startup_delay_secs, "Delaying startup");
        tokio::time::sleep(Duration::from_secs(settings.startup_delay_secs)).await;
    }

    // 4. Connect to the message broker and declare the queues
    let client = AmqpClient::connect(&settings.amqp.uri)
        .await
        .context("Unable to connect to message broker")?;
    client.declare_queue(&settings.queues.todo).await?;
    client.declare_queue(&settings.queues.content).await?;
    client.declare_queue(&settings.queues.done).await?;

    // 5. Build the fetch engine
    let mode = settings
        .policy
        .match_mode
        .parse::<MatchMode>()
        .map_err(anyhow::Error::msg)?;
    let policy = ContentTypePolicy::new(&settings.policy.forbidden_content_types, mode);
    let fetcher = Arc::new(
        HttpFetchEngine::new(&settings.http, policy).context("Unable to build fetch engine")?,
    );
    info!(engine = fetcher.name(), "Fetch engine initialized");

    // 6. Start the worker runtime
    let worker = CrawlWorker::new(fetcher, Arc::new(client.clone()), settings.queues.clone());
    let runtime =
        WorkerRuntime::start(&client, worker, &settings.queues.todo, settings.amqp.prefetch)
            .await
            .context("Unable to start consumer")?;
    info!("Crawler worker started");

    // 7. Run until process termination
    runtime.wait_for_shutdown().await;

    Ok(())
}
