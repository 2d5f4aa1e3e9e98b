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

use crate::config::settings::HttpSettings;
use crate::domain::services::content_policy::ContentTypePolicy;
use crate::domain::services::extraction_service::ExtractionService;
use crate::engines::traits::{FetchError, FetchedPage, PageFetcher};
use async_trait::async_trait;
use reqwest::header;
use reqwest::redirect;
use std::time::Duration;
use tracing::debug;

/// 抓取引擎
///
/// 基于reqwest实现的页面抓取引擎。客户端在启动时构建一次，
/// 之后在并发处理之间只读共享；自动重定向被禁用，
/// 301/302 的目标作为新发现的URL重新入队
pub struct HttpFetchEngine {
    client: reqwest::Client,
    policy: ContentTypePolicy,
}

impl HttpFetchEngine {
    /// 创建新的抓取引擎实例
    ///
    /// # 参数
    ///
    /// * `http` - HTTP客户端配置（代理、超时、User-Agent）
    /// * `policy` - 内容类型策略
    pub fn new(http: &HttpSettings, policy: ContentTypePolicy) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(http.user_agent.clone())
            .timeout(Duration::from_secs(http.timeout_secs))
            .redirect(redirect::Policy::none());

        if let Some(proxy_url) = &http.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        // 容器内通常没有可校验的证书链
        if http.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            policy,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetchEngine {
    /// 抓取单个URL
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 通过策略检查的页面及其出站链接
    /// * `Err(FetchError)` - 传输失败或被策略拒绝
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        if status > 302 {
            return Err(FetchError::UnacceptableStatus { status });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if self.policy.is_forbidden(&content_type) {
            return Err(FetchError::ForbiddenContentType { content_type });
        }

        let redirected = status == 301 || status == 302;
        let location = if redirected {
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        } else {
            None
        };

        let content = response.text().await?;
        let mut links = ExtractionService::extract_links(url, &content);

        if redirected {
            // 重定向目标作为一条新发现的URL重新入队，本工作器不继续跟随
            match location {
                Some(target) => links.push(target),
                None => debug!(url = %url, "Redirect response without location header"),
            }
        }

        Ok(FetchedPage {
            url: url.to_string(),
            content,
            links,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "fetch_engine_test.rs"]
mod tests;
