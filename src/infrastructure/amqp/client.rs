// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use lapin::options::{
    BasicConsumeOptions, BasicPublishOptions, BasicQosOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, Consumer};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// 发布错误类型
#[derive(Error, Debug)]
pub enum PublishError {
    /// 消息代理错误
    #[error("Broker error: {0}")]
    Broker(#[from] lapin::Error),

    /// 负载序列化错误
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 消息发布者特质
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// 向指定队列发布一条原始负载
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), PublishError>;
}

#[async_trait]
impl<T: MessagePublisher + ?Sized> MessagePublisher for Arc<T> {
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        (**self).publish(queue, payload).await
    }
}

/// 将值序列化为JSON后发布到指定队列
pub async fn publish_json<P, T>(publisher: &P, queue: &str, value: &T) -> Result<(), PublishError>
where
    P: MessagePublisher + ?Sized,
    T: Serialize + Sync,
{
    let payload = serde_json::to_vec(value)?;
    publisher.publish(queue, payload).await
}

/// AMQP客户端
///
/// 持有一条信道；连接建立之后只读共享，发布与消费共用
#[derive(Clone)]
pub struct AmqpClient {
    channel: Channel,
}

impl AmqpClient {
    /// 建立连接并创建信道
    ///
    /// # 参数
    ///
    /// * `uri` - AMQP连接URI
    ///
    /// # 返回值
    ///
    /// * `Ok(AmqpClient)` - 连接成功的客户端
    /// * `Err(PublishError)` - 连接或信道创建失败
    pub async fn connect(uri: &str) -> Result<Self, PublishError> {
        let connection = Connection::connect(uri, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        info!("AMQP connection established");
        Ok(Self { channel })
    }

    /// 声明一个队列，已存在时幂等
    pub async fn declare_queue(&self, name: &str) -> Result<(), PublishError> {
        self.channel
            .queue_declare(name, QueueDeclareOptions::default(), FieldTable::default())
            .await?;
        Ok(())
    }

    /// 创建带预取限制的消费者
    ///
    /// # 参数
    ///
    /// * `queue` - 要消费的队列
    /// * `tag` - 消费者标签
    /// * `prefetch` - 未确认消息上限，即并发处理上限
    pub async fn consumer(
        &self,
        queue: &str,
        tag: &str,
        prefetch: u16,
    ) -> Result<Consumer, PublishError> {
        self.channel
            .basic_qos(prefetch, BasicQosOptions::default())
            .await?;
        let consumer = self
            .channel
            .basic_consume(
                queue,
                tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;
        Ok(consumer)
    }
}

#[async_trait]
impl MessagePublisher for AmqpClient {
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        // 默认交换机按队列名路由
        self.channel
            .basic_publish(
                "",
                queue,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default(),
            )
            .await?
            .await?;
        Ok(())
    }
}
