//! 解析相关命令
//! 提供给前端调用的题目解析、判分与批量导入接口

use crate::commands::config::ConfigState;
use crate::config::ExtractorConfig;
use crate::models::{ParsedChoice, QuestionRecord};
use crate::services::extractor::{BulkExtractor, Extraction};
use crate::services::grader::{grade, is_multi_answer, AnswerSet};
use crate::services::{flatten_markdown, parse_choices};
use anyhow::{bail, Context};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// 解析器状态，导入配置取自共享的学习配置
#[derive(Debug, Default)]
pub struct ParserState(pub Arc<ConfigState>);

impl ParserState {
    pub fn new(config: Arc<ConfigState>) -> Self {
        Self(config)
    }

    async fn extractor(&self) -> BulkExtractor {
        let config = self.0.lock().await;
        BulkExtractor::new(config.extractor.clone())
    }
}

// ==================== DTO 类型定义 ====================

/// 选项 DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceDto {
    pub letter: String,
    pub text: String,
}

impl From<ParsedChoice> for ChoiceDto {
    fn from(c: ParsedChoice) -> Self {
        Self {
            letter: c.letter.to_string(),
            text: c.text,
        }
    }
}

/// 供界面渲染的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionViewDto {
    pub id: String,
    pub stem: String,
    pub choices: Vec<ChoiceDto>,
    /// 多选题需要显式提交
    pub multi_answer: bool,
    /// 简答题没有选项，直接展示的答案
    pub free_response_answer: Option<String>,
}

impl From<&QuestionRecord> for QuestionViewDto {
    fn from(record: &QuestionRecord) -> Self {
        let parsed = parse_choices(&record.question_text);
        let free_response_answer = parsed
            .is_free_response()
            .then(|| record.correct_answer.clone());

        Self {
            id: record.id.clone(),
            stem: parsed.stem,
            choices: parsed.choices.into_iter().map(Into::into).collect(),
            multi_answer: is_multi_answer(&record.correct_answer),
            free_response_answer,
        }
    }
}

/// 批量导入结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResultDto {
    pub questions: Vec<QuestionRecord>,
    pub skipped: usize,
    pub message: Option<String>,
}

impl From<Extraction> for ImportResultDto {
    fn from(e: Extraction) -> Self {
        Self {
            questions: e.questions.into_iter().map(Into::into).collect(),
            skipped: e.skipped,
            message: e.message,
        }
    }
}

/// 把界面传入的字母字符串转为选择集合
pub(crate) fn to_answer_set(selected: &[String]) -> Result<AnswerSet, String> {
    selected
        .iter()
        .map(|s| {
            let mut chars = s.trim().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c.to_ascii_uppercase()),
                _ => Err(format!("无效的选项: {:?}", s)),
            }
        })
        .collect()
}

// ==================== 命令 ====================

/// 解析单道题目为题干与选项
pub async fn parse_question(record: QuestionRecord) -> Result<QuestionViewDto, String> {
    Ok(QuestionViewDto::from(&record))
}

/// 判分命令
pub async fn grade_answer(selected: Vec<String>, correct_answer: String) -> Result<bool, String> {
    let selected = to_answer_set(&selected)?;
    Ok(grade(&selected, &correct_answer))
}

/// 从粘贴文本（或 PDF 提取文本）批量导入
pub async fn import_questions(
    content: String,
    state: &ParserState,
) -> Result<ImportResultDto, String> {
    let extractor = state.extractor().await;
    Ok(extractor.extract(&content).into())
}

/// 从 Markdown 文本批量导入
pub async fn import_markdown(
    content: String,
    state: &ParserState,
) -> Result<ImportResultDto, String> {
    let extractor = state.extractor().await;
    Ok(extractor.extract(&flatten_markdown(&content)).into())
}

/// 读取文件内容；Markdown 文件先展平
async fn read_document(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        bail!("文件不存在: {}", path.display());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("读取文件失败: {}", path.display()))?;

    let is_markdown = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"));

    Ok(if is_markdown {
        flatten_markdown(&content)
    } else {
        content
    })
}

/// 从文本或 Markdown 文件批量导入
pub async fn import_questions_from_file(
    file_path: String,
    state: &ParserState,
) -> Result<ImportResultDto, String> {
    let content = read_document(Path::new(&file_path))
        .await
        .map_err(|e| format!("{:#}", e))?;

    let extractor = state.extractor().await;
    let result = extractor.extract(&content);
    info!("从 {} 导入 {} 道题", file_path, result.questions.len());
    Ok(result.into())
}

/// 获取导入配置
pub async fn get_parser_state(state: &ParserState) -> Result<ExtractorConfig, String> {
    Ok(state.0.lock().await.extractor.clone())
}

/// 更新导入配置并写回配置文件
pub async fn update_parser_config(
    state: &ParserState,
    min_question_chars: Option<usize>,
) -> Result<(), String> {
    let mut config = state.0.lock().await;
    if let Some(v) = min_question_chars {
        config.extractor.min_question_chars = v;
    }
    state.0.persist(&config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "What is 2 + 2?\nA. 3\nB. 4\nAnswer: B\n\nWhich are primary colors?\nA. Red\nB. Green\nC. Blue\nAnswer: A, C\n";

    #[tokio::test]
    async fn test_parse_question_view() {
        let record = QuestionRecord::new("Which are primary colors?\nA. Red\nB. Green\nC. Blue", "A,C");
        let view = parse_question(record).await.unwrap();

        assert_eq!(view.stem, "Which are primary colors?");
        assert_eq!(view.choices.len(), 3);
        assert_eq!(view.choices[0].letter, "A");
        assert!(view.multi_answer);
        assert!(view.free_response_answer.is_none());
    }

    #[tokio::test]
    async fn test_free_response_view() {
        let view = parse_question(QuestionRecord::new("Define osmosis.", "Diffusion of water"))
            .await
            .unwrap();
        assert_eq!(view.free_response_answer.as_deref(), Some("Diffusion of water"));
    }

    #[tokio::test]
    async fn test_grade_answer() {
        assert!(grade_answer(vec!["c".to_string(), "A".to_string()], "A,C".to_string()).await.unwrap());
        assert!(!grade_answer(vec![], "A".to_string()).await.unwrap());
        assert!(grade_answer(vec!["AB".to_string()], "A".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn test_import_questions() {
        let state = ParserState::default();
        let result = import_questions(DOCUMENT.to_string(), &state).await.unwrap();

        assert_eq!(result.questions.len(), 2);
        assert_eq!(result.questions[1].correct_answer, "A,C");
        assert_ne!(result.questions[0].id, result.questions[1].id);
    }

    #[tokio::test]
    async fn test_import_nothing_found() {
        let state = ParserState::default();
        let result = import_questions("just some notes".to_string(), &state).await.unwrap();

        assert!(result.questions.is_empty());
        assert!(result.message.is_some());
    }

    #[tokio::test]
    async fn test_import_from_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("set.md");
        std::fs::write(&path, "## What is 2 + 2?\n\n- A. 3\n- B. 4\n\n**Answer:** B\n").unwrap();

        let state = ParserState::default();
        let result = import_questions_from_file(path.display().to_string(), &state)
            .await
            .unwrap();
        assert_eq!(result.questions.len(), 1);
        assert_eq!(result.questions[0].question_text, "What is 2 + 2?\nA. 3\nB. 4");
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let state = ParserState::default();
        let err = import_questions_from_file("/nonexistent/set.txt".to_string(), &state)
            .await
            .unwrap_err();
        assert!(err.contains("文件不存在"));
    }

    #[tokio::test]
    async fn test_update_parser_config() {
        let state = ParserState::default();
        update_parser_config(&state, Some(1)).await.unwrap();
        assert_eq!(get_parser_state(&state).await.unwrap().min_question_chars, 1);

        let result = import_questions("2+2?\nAnswer: A".to_string(), &state).await.unwrap();
        assert_eq!(result.questions.len(), 1);
    }

    #[tokio::test]
    async fn test_saved_threshold_is_used_after_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let state = ParserState::new(Arc::new(ConfigState::load(path.clone())));
        update_parser_config(&state, Some(1)).await.unwrap();
        drop(state);

        let reloaded = ParserState::new(Arc::new(ConfigState::load(path)));
        assert_eq!(get_parser_state(&reloaded).await.unwrap().min_question_chars, 1);

        let result = import_questions("2+2?\nAnswer: A".to_string(), &reloaded).await.unwrap();
        assert_eq!(result.questions.len(), 1);
    }
}
