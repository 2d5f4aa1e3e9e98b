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

use std::collections::HashSet;
use std::str::FromStr;

/// 内容类型匹配模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// 响应头与配置项完全相等
    Exact,
    /// 响应头以配置项为前缀，带参数的头（如 charset）也能命中
    Prefix,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "prefix" => Ok(MatchMode::Prefix),
            other => Err(format!("unknown content-type match mode: {}", other)),
        }
    }
}

/// 内容类型策略
///
/// 每个响应只做一次成员检查，在正文暴露给提取或发布之前执行
#[derive(Debug, Clone)]
pub struct ContentTypePolicy {
    forbidden: HashSet<String>,
    mode: MatchMode,
}

impl ContentTypePolicy {
    /// 创建新的内容类型策略实例
    pub fn new(forbidden_types: &[String], mode: MatchMode) -> Self {
        Self {
            forbidden: forbidden_types
                .iter()
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            mode,
        }
    }

    /// 判断响应内容类型是否被禁止
    pub fn is_forbidden(&self, content_type: &str) -> bool {
        let normalized = content_type.trim().to_ascii_lowercase();
        match self.mode {
            MatchMode::Exact => self.forbidden.contains(&normalized),
            MatchMode::Prefix => self
                .forbidden
                .iter()
                .any(|entry| normalized.starts_with(entry.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(entries: &[&str], mode: MatchMode) -> ContentTypePolicy {
        let entries: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
        ContentTypePolicy::new(&entries, mode)
    }

    #[test]
    fn test_exact_mode_requires_full_match() {
        let policy = policy(&["text/html"], MatchMode::Exact);

        assert!(policy.is_forbidden("text/html"));
        assert!(!policy.is_forbidden("text/html; charset=utf-8"));
        assert!(!policy.is_forbidden("text/plain"));
    }

    #[test]
    fn test_prefix_mode_matches_parameterized_header() {
        let policy = policy(&["application/octet-stream"], MatchMode::Prefix);

        assert!(policy.is_forbidden("application/octet-stream"));
        assert!(policy.is_forbidden("application/octet-stream; charset=binary"));
        assert!(!policy.is_forbidden("application/json"));
    }

    #[test]
    fn test_prefix_mode_matches_type_family() {
        let policy = policy(&["image/"], MatchMode::Prefix);

        assert!(policy.is_forbidden("image/png"));
        assert!(policy.is_forbidden("image/jpeg"));
        assert!(!policy.is_forbidden("text/html"));
    }

    #[test]
    fn test_comparison_is_case_insensitive() {
        let policy = policy(&["Application/Octet-Stream"], MatchMode::Exact);

        assert!(policy.is_forbidden("application/octet-stream"));
        assert!(policy.is_forbidden("APPLICATION/OCTET-STREAM"));
    }

    #[test]
    fn test_empty_header_never_forbidden() {
        let policy = policy(&["application/octet-stream"], MatchMode::Prefix);

        assert!(!policy.is_forbidden(""));
    }

    #[test]
    fn test_match_mode_parsing() {
        assert_eq!("prefix".parse::<MatchMode>().unwrap(), MatchMode::Prefix);
        assert_eq!("Exact".parse::<MatchMode>().unwrap(), MatchMode::Exact);
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }
}
