//! 学习配置
//! 显式的配置结构，替代散落的本地存储设置，由宿主负责持久化位置

use crate::error::ConfigError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::Path;

/// 批量导入配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// 题目块非空白字符数必须大于该值才会被接受
    pub min_question_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_question_chars: 5,
        }
    }
}

/// 题目范围，1 起始、闭区间（与界面上的 "第 3 题到第 10 题" 一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRange {
    pub start: usize,
    pub end: usize,
}

impl QuestionRange {
    /// 转换为针对 `len` 道题的合法下标区间，越界部分被截断
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let start = self.start.max(1).min(len + 1) - 1;
        let end = self.end.min(len).max(start);
        start..end
    }
}

/// 学习配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// 开始学习前是否先展示配置界面
    pub show_config_before_studying: bool,
    /// 未指定范围时每轮的题目数
    pub default_session_size: usize,
    /// 上次使用的题目范围
    pub last_range: Option<QuestionRange>,
    pub extractor: ExtractorConfig,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            show_config_before_studying: true,
            default_session_size: 20,
            last_range: None,
            extractor: ExtractorConfig::default(),
        }
    }
}

impl StudyConfig {
    /// 读取配置文件；文件不存在时返回默认配置
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("配置文件不存在，使用默认配置: {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// 本轮学习的题目下标区间：优先使用上次范围，否则取前 `default_session_size` 道
    pub fn session_range(&self, len: usize) -> Range<usize> {
        match self.last_range {
            Some(range) => {
                let resolved = range.resolve(len);
                if resolved.is_empty() && len > 0 {
                    warn!("题目范围 {:?} 超出题目集 ({} 道)，改用默认范围", range, len);
                    0..self.default_session_size.min(len)
                } else {
                    resolved
                }
            }
            None => 0..self.default_session_size.min(len),
        }
    }
}
