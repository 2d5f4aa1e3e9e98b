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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含消息代理、队列、HTTP客户端、内容策略和指标等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 消息代理配置
    pub amqp: AmqpSettings,
    /// 队列名称配置
    pub queues: QueueSettings,
    /// HTTP客户端配置
    pub http: HttpSettings,
    /// 内容策略配置
    pub policy: PolicySettings,
    /// 指标配置
    pub metrics: MetricsSettings,
    /// 启动延迟（秒），用于容器编排下等待代理就绪
    pub startup_delay_secs: u64,
}

/// 消息代理配置设置
#[derive(Debug, Deserialize)]
pub struct AmqpSettings {
    /// AMQP连接URI
    pub uri: String,
    /// 预取数量，同时也是单个工作器的并发处理上限
    pub prefetch: u16,
}

/// 队列名称配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSettings {
    /// 待抓取URL队列
    pub todo: String,
    /// 页面内容队列
    pub content: String,
    /// 已发现URL队列
    pub done: String,
}

/// HTTP客户端配置设置
#[derive(Debug, Deserialize)]
pub struct HttpSettings {
    /// 出站连接使用的SOCKS代理地址（如 socks5h://127.0.0.1:9050）
    pub proxy: Option<String>,
    /// 请求超时时间（秒），同时约束连接与响应阶段
    pub timeout_secs: u64,
    /// User-Agent请求头
    pub user_agent: String,
    /// 是否接受无效TLS证书
    pub accept_invalid_certs: bool,
}

/// 内容策略配置设置
#[derive(Debug, Deserialize)]
pub struct PolicySettings {
    /// 禁止处理的内容类型列表
    pub forbidden_content_types: Vec<String>,
    /// 内容类型匹配模式（exact 或 prefix）
    pub match_mode: String,
}

/// 指标配置设置
#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus指标导出
    pub enabled: bool,
    /// Prometheus监听端口
    pub port: u16,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("amqp.uri", "amqp://127.0.0.1:5672/%2f")?
            .set_default("amqp.prefetch", 10)?
            // Default queue names
            .set_default("queues.todo", "todo")?
            .set_default("queues.content", "content")?
            .set_default("queues.done", "done")?
            // Default HTTP client settings
            .set_default("http.timeout_secs", 5)?
            .set_default("http.user_agent", "Mozilla/5.0 (compatible; onionrs/0.1)")?
            .set_default("http.accept_invalid_certs", true)?
            // Default content policy settings
            .set_default(
                "policy.forbidden_content_types",
                vec!["application/octet-stream"],
            )?
            .set_default("policy.match_mode", "prefix")?
            // Default metrics settings
            .set_default("metrics.enabled", true)?
            .set_default("metrics.port", 9000)?
            .set_default("startup_delay_secs", 0)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("ONIONRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
