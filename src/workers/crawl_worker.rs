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

use crate::config::settings::QueueSettings;
use crate::domain::models::page::CrawlResult;
use crate::engines::traits::{FetchError, PageFetcher};
use crate::infrastructure::amqp::client::{publish_json, MessagePublisher, PublishError};
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 消息处理错误类型
#[derive(Error, Debug)]
pub enum HandleError {
    /// 入站负载反序列化失败
    #[error("Invalid payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// 页面抓取失败
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// 内容记录发布失败
    #[error("Content publish failed: {0}")]
    Publish(#[from] PublishError),
}

/// 本次消息处理的发布统计
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PublishSummary {
    /// 成功发布的发现URL数量
    pub published_urls: usize,
    /// 因单条发布失败而跳过的URL数量
    pub skipped_urls: usize,
}

/// 抓取工作者
///
/// 将一条入站消息桥接为一次页面抓取，并把结果扇出到
/// 内容队列与发现队列；处理之间不共享可变状态
pub struct CrawlWorker<F, P>
where
    F: PageFetcher,
    P: MessagePublisher,
{
    fetcher: Arc<F>,
    publisher: P,
    queues: QueueSettings,
    worker_id: Uuid,
}

impl<F, P> CrawlWorker<F, P>
where
    F: PageFetcher,
    P: MessagePublisher,
{
    /// 创建新的抓取工作者实例
    pub fn new(fetcher: Arc<F>, publisher: P, queues: QueueSettings) -> Self {
        Self {
            fetcher,
            publisher,
            queues,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 工作者ID，用于日志关联与消费者标签
    pub fn worker_id(&self) -> Uuid {
        self.worker_id
    }

    /// 处理一条入站消息
    ///
    /// 成功时先发布内容记录，再逐条发布发现的URL。
    /// 内容发布失败中止整条消息；单条URL发布失败只跳过该条，
    /// 不阻塞剩余URL
    ///
    /// # 参数
    ///
    /// * `payload` - 入站消息负载，JSON编码的URL字符串
    ///
    /// # 返回值
    ///
    /// * `Ok(PublishSummary)` - 处理成功，消息可确认
    /// * `Err(HandleError)` - 处理失败，消息应拒绝且不重新入队
    #[instrument(skip(self, payload), fields(worker_id = %self.worker_id))]
    pub async fn handle(&self, payload: &[u8]) -> Result<PublishSummary, HandleError> {
        let url: String = serde_json::from_slice(payload)?;
        info!(url = %url, "Crawling page");

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                counter!("onionrs_fetch_failures").increment(1);
                return Err(e.into());
            }
        };
        counter!("onionrs_pages_fetched").increment(1);

        let record = CrawlResult {
            url: page.url.clone(),
            content: page.content,
        };
        publish_json(&self.publisher, &self.queues.content, &record).await?;
        counter!("onionrs_content_published").increment(1);

        let mut summary = PublishSummary::default();
        for link in &page.links {
            match publish_json(&self.publisher, &self.queues.done, link).await {
                Ok(()) => summary.published_urls += 1,
                Err(e) => {
                    warn!(url = %link, error = %e, "Failed to publish discovered url");
                    summary.skipped_urls += 1;
                }
            }
        }
        counter!("onionrs_urls_published").increment(summary.published_urls as u64);

        info!(
            url = %page.url,
            published = summary.published_urls,
            skipped = summary.skipped_urls,
            "Page processed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "crawl_worker_test.rs"]
mod tests;
