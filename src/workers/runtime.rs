// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::PageFetcher;
use crate::infrastructure::amqp::client::{AmqpClient, MessagePublisher, PublishError};
use crate::workers::crawl_worker::CrawlWorker;
use futures::StreamExt;
use lapin::options::{BasicAckOptions, BasicNackOptions};
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 工作器运行时
///
/// 拥有入站队列订阅，按预取上限并发地把投递分发给消息处理器；
/// 运行至进程终止，除代理确认模型外不做在途排空
pub struct WorkerRuntime {
    handle: Option<JoinHandle<()>>,
}

impl WorkerRuntime {
    /// 启动消费循环
    ///
    /// 每条投递在独立任务中处理；未确认消息数由prefetch限制，
    /// 因此prefetch同时是唯一的背压与并发上限
    ///
    /// # 参数
    ///
    /// * `client` - 已连接的AMQP客户端
    /// * `worker` - 消息处理器
    /// * `todo_queue` - 入站队列名称
    /// * `prefetch` - 预取上限
    pub async fn start<F, P>(
        client: &AmqpClient,
        worker: CrawlWorker<F, P>,
        todo_queue: &str,
        prefetch: u16,
    ) -> Result<Self, PublishError>
    where
        F: PageFetcher + 'static,
        P: MessagePublisher + 'static,
    {
        let consumer_tag = format!("onionrs-worker-{}", worker.worker_id());
        let mut consumer = client.consumer(todo_queue, &consumer_tag, prefetch).await?;
        info!(queue = %todo_queue, prefetch = prefetch, "Consumer initialized");

        let worker = Arc::new(worker);
        let handle = tokio::spawn(async move {
            while let Some(delivery) = consumer.next().await {
                let delivery = match delivery {
                    Ok(delivery) => delivery,
                    Err(e) => {
                        warn!(error = %e, "Failed to receive delivery from broker");
                        continue;
                    }
                };

                let worker = worker.clone();
                tokio::spawn(async move {
                    match worker.handle(&delivery.data).await {
                        Ok(_) => {
                            if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
                                warn!(error = %e, "Failed to ack delivery");
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "Error while processing message");
                            // 不重新入队，避免坏消息无限重投
                            let options = BasicNackOptions {
                                requeue: false,
                                ..Default::default()
                            };
                            if let Err(e) = delivery.nack(options).await {
                                warn!(error = %e, "Failed to nack delivery");
                            }
                        }
                    }
                });
            }
        });

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// 等待关闭信号并中止消费循环
    pub async fn wait_for_shutdown(mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        info!("Worker shut down");
    }
}
