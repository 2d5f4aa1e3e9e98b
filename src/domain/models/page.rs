// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 抓取结果
///
/// 发布到内容队列的页面记录，按消息创建、发布后即丢弃
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    /// 页面最终URL
    pub url: String,
    /// 页面正文
    pub content: String,
}
