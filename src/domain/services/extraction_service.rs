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

use crate::utils::url_utils;
use once_cell::sync::Lazy;
use regex::Regex;

// 正文中任意位置的绝对 .onion URL
static ABSOLUTE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[a-zA-Z0-9\-_.]+\.onion[a-zA-Z0-9\-_./]*")
        .expect("absolute url pattern")
});

// href 属性中的相对引用；字符类不含 ':'，因此与绝对模式互不重叠
static RELATIVE_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(/?[a-zA-Z0-9\-_./]+)""#).expect("relative href pattern"));

/// 链接提取服务
///
/// 从页面正文提取出站链接：绝对链接在前、相对链接在后，
/// 各组内按首次出现顺序排列，不做去重和归一化
pub struct ExtractionService;

impl ExtractionService {
    /// 提取链接
    ///
    /// # 参数
    ///
    /// * `base_url` - 页面自身URL，相对引用以它为基准解析
    /// * `body` - 页面正文
    ///
    /// # 返回值
    ///
    /// 提取出的URL序列，无匹配时为空序列
    pub fn extract_links(base_url: &str, body: &str) -> Vec<String> {
        let mut links: Vec<String> = ABSOLUTE_URL_RE
            .find_iter(body)
            .map(|m| m.as_str().to_string())
            .collect();

        for capture in RELATIVE_HREF_RE.captures_iter(body) {
            if let Some(path) = capture.get(1) {
                links.push(url_utils::join_relative(base_url, path.as_str()));
            }
        }

        links
    }
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
