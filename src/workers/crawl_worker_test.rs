#[cfg(test)]
mod tests {
    use crate::config::settings::QueueSettings;
    use crate::domain::models::page::CrawlResult;
    use crate::engines::traits::{FetchError, FetchedPage, PageFetcher};
    use crate::infrastructure::amqp::client::{MessagePublisher, PublishError};
    use crate::workers::crawl_worker::{CrawlWorker, HandleError};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    fn test_queues() -> QueueSettings {
        QueueSettings {
            todo: "todo".to_string(),
            content: "content".to_string(),
            done: "done".to_string(),
        }
    }

    // Mock fetchers for testing
    struct StaticFetcher {
        links: Vec<String>,
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            Ok(FetchedPage {
                url: url.to_string(),
                content: "<a href=\"/x\">".to_string(),
                links: self.links.clone(),
            })
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl PageFetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
            Err(FetchError::UnacceptableStatus { status: 404 })
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    /// 记录发布的mock，可按队列或负载内容注入失败
    #[derive(Default)]
    struct RecordingPublisher {
        messages: Mutex<Vec<(String, Vec<u8>)>>,
        fail_queue: Option<String>,
        fail_payload_containing: Option<String>,
    }

    impl RecordingPublisher {
        fn published(&self) -> Vec<(String, String)> {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .map(|(q, p)| (q.clone(), String::from_utf8_lossy(p).into_owned()))
                .collect()
        }
    }

    #[async_trait]
    impl MessagePublisher for RecordingPublisher {
        async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), PublishError> {
            if self.fail_queue.as_deref() == Some(queue) {
                return Err(PublishError::Broker(lapin::Error::ChannelsLimitReached));
            }
            if let Some(marker) = &self.fail_payload_containing {
                if String::from_utf8_lossy(&payload).contains(marker.as_str()) {
                    return Err(PublishError::Broker(lapin::Error::ChannelsLimitReached));
                }
            }
            self.messages
                .lock()
                .unwrap()
                .push((queue.to_string(), payload));
            Ok(())
        }
    }

    fn url_payload(url: &str) -> Vec<u8> {
        serde_json::to_vec(url).unwrap()
    }

    #[tokio::test]
    async fn test_success_publishes_content_then_urls() {
        let fetcher = Arc::new(StaticFetcher {
            links: vec!["http://a.onion".to_string(), "http://b.onion".to_string()],
        });
        let publisher = Arc::new(RecordingPublisher::default());
        let worker = CrawlWorker::new(fetcher, publisher.clone(), test_queues());

        let summary = worker
            .handle(&url_payload("http://example.onion"))
            .await
            .expect("handling must succeed");
        assert_eq!(summary.published_urls, 2);
        assert_eq!(summary.skipped_urls, 0);

        let published = publisher.published();
        assert_eq!(published.len(), 3);

        // 内容记录先于发现URL发布
        assert_eq!(published[0].0, "content");
        let record: CrawlResult = serde_json::from_str(&published[0].1).unwrap();
        assert_eq!(record.url, "http://example.onion");
        assert_eq!(record.content, "<a href=\"/x\">");

        assert_eq!(
            published[1],
            ("done".to_string(), "\"http://a.onion\"".to_string())
        );
        assert_eq!(
            published[2],
            ("done".to_string(), "\"http://b.onion\"".to_string())
        );
    }

    #[tokio::test]
    async fn test_decode_failure_publishes_nothing() {
        let fetcher = Arc::new(StaticFetcher { links: vec![] });
        let publisher = Arc::new(RecordingPublisher::default());
        let worker = CrawlWorker::new(fetcher, publisher.clone(), test_queues());

        let err = worker
            .handle(b"not json at all")
            .await
            .expect_err("payload must be rejected");
        assert!(matches!(err, HandleError::Decode(_)));
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_publishes_nothing() {
        let fetcher = Arc::new(FailingFetcher);
        let publisher = Arc::new(RecordingPublisher::default());
        let worker = CrawlWorker::new(fetcher, publisher.clone(), test_queues());

        let err = worker
            .handle(&url_payload("http://example.onion"))
            .await
            .expect_err("fetch failure must fail handling");
        assert!(matches!(
            err,
            HandleError::Fetch(FetchError::UnacceptableStatus { status: 404 })
        ));
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_content_publish_failure_aborts_message() {
        let fetcher = Arc::new(StaticFetcher {
            links: vec!["http://a.onion".to_string()],
        });
        let publisher = Arc::new(RecordingPublisher {
            fail_queue: Some("content".to_string()),
            ..Default::default()
        });
        let worker = CrawlWorker::new(fetcher, publisher.clone(), test_queues());

        let err = worker
            .handle(&url_payload("http://example.onion"))
            .await
            .expect_err("content publish failure must abort");
        assert!(matches!(err, HandleError::Publish(_)));

        // 内容未记录时不得对外公布任何发现URL
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_single_url_publish_failure_skips_only_that_url() {
        let fetcher = Arc::new(StaticFetcher {
            links: vec![
                "http://a.onion".to_string(),
                "http://bad.onion".to_string(),
                "http://c.onion".to_string(),
            ],
        });
        let publisher = Arc::new(RecordingPublisher {
            fail_payload_containing: Some("bad.onion".to_string()),
            ..Default::default()
        });
        let worker = CrawlWorker::new(fetcher, publisher.clone(), test_queues());

        let summary = worker
            .handle(&url_payload("http://example.onion"))
            .await
            .expect("handling must succeed despite one bad publish");
        assert_eq!(summary.published_urls, 2);
        assert_eq!(summary.skipped_urls, 1);

        let done: Vec<String> = publisher
            .published()
            .into_iter()
            .filter(|(q, _)| q == "done")
            .map(|(_, p)| p)
            .collect();
        assert_eq!(
            done,
            vec![
                "\"http://a.onion\"".to_string(),
                "\"http://c.onion\"".to_string()
            ]
        );
    }
}
