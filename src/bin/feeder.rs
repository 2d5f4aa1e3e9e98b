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
use clap::Parser;
use onionrs::config::settings::Settings;
use onionrs::infrastructure::amqp::client::{publish_json, AmqpClient};
use onionrs::utils::telemetry;
use tracing::info;
use url::Url;

/// 向爬虫集群的工作队列注入一个种子URL
#[derive(Parser, Debug)]
#[command(name = "feeder", about = "Publish a seed url to the crawler work queue")]
struct Args {
    /// 要入队的URL
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();

    let args = Args::parse();
    Url::parse(&args.url).context("Invalid seed url")?;

    let settings = Settings::new().context("Failed to load configuration")?;

    let client = AmqpClient::connect(&settings.amqp.uri)
        .await
        .context("Unable to connect to message broker")?;
    client.declare_queue(&settings.queues.todo).await?;

    info!(url = %args.url, "Feeding url to the crawler fleet");
    publish_json(&client, &settings.queues.todo, &args.url).await?;

    Ok(())
}
