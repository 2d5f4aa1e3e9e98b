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

use async_trait::async_trait;
use thiserror::Error;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 传输层失败（连接、超时、DNS、代理）
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// 内容类型被策略禁止
    #[error("Forbidden content type: {content_type}")]
    ForbiddenContentType { content_type: String },

    /// 状态码超出可接受范围
    #[error("Unacceptable status code: {status}")]
    UnacceptableStatus { status: u16 },
}

/// 抓取到的页面
#[derive(Debug)]
pub struct FetchedPage {
    /// 页面URL
    pub url: String,
    /// 页面正文
    pub content: String,
    /// 从正文提取的出站链接
    pub links: Vec<String>,
}

/// 页面抓取引擎特质
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取单个URL并应用状态码与内容类型策略
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
