//! 批量导入：从粘贴文本或 PDF 提取文本中切分题目
//! 以 "Answer:" 标记为界，向前还原题目块，向后读取答案字母

use crate::config::ExtractorConfig;
use crate::models::QuestionCandidate;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static EXPLANATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)explanation:").expect("valid explanation pattern"));

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)reference:").expect("valid reference pattern"));

static QUESTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)question:").expect("valid question pattern"));

static QUESTION_OR_ANSWER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)question:|answers?:").expect("valid question/answer pattern")
});

static ANSWER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)answers?:").expect("valid answer pattern"));

/// 答案片段开头的字母串，如 "B"、"A, C"、"B and D"、"AC"、"b"
/// 小写字母必须单独成词，"each"、"bad" 之类的单词不算答案
static ANSWER_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*((?:[A-J]|[a-j]\b)(?:[ \t]*(?:,|\band\b|&)?[ \t]*(?:[A-J]|[a-j]\b))*)\b")
        .expect("valid answer run pattern")
});

/// 上一题答案渗入本题块开头的字母串
static LEADING_LETTERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-J](?:[ \t]*(?:,|\band\b|&)?[ \t]*[A-J])*\b[.)]?")
        .expect("valid leading letters pattern")
});

/// "Question:"、"Question: 12."、"Question 3:" 等题号标签
static QUESTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*question\s*(?::\s*(?:\d+\s*[.):]?)?|\d+\s*[.):]?)")
        .expect("valid question label pattern")
});

const NO_QUESTIONS_MESSAGE: &str = "No questions found. Each question must be followed by a line \
such as \"Answer: B\" or \"Answer: A, C\". Review the text and edit it manually.";

/// 提取结果；题目为空时附带提示信息，不视为错误
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub questions: Vec<QuestionCandidate>,
    /// 因答案格式不正确或题目过短而丢弃的片段数
    pub skipped: usize,
    pub message: Option<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// 删除从 `start` 标记到下一个 `stop` 标记（不含）或文档末尾之间的内容
fn strip_sections(text: &str, start: &Regex, stop: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(m) = start.find_at(text, pos) {
        out.push_str(&text[pos..m.start()]);
        pos = stop
            .find_at(text, m.end())
            .map_or(text.len(), |next| next.start());
    }
    out.push_str(&text[pos..]);

    out
}

/// 读取答案片段开头的字母，去重后按首次出现顺序以逗号连接
pub fn normalize_answer_run(fragment: &str) -> Option<String> {
    let run = ANSWER_RUN.captures(fragment)?.get(1)?.as_str();

    let mut letters: Vec<char> = Vec::new();
    let tokens = run
        .split(|c: char| c.is_whitespace() || c == ',' || c == '&')
        .filter(|token| *token != "and");
    for c in tokens.flat_map(str::chars).map(|c| c.to_ascii_uppercase()) {
        if !letters.contains(&c) {
            letters.push(c);
        }
    }

    if letters.is_empty() {
        return None;
    }
    Some(
        letters
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// 清理题目块：去掉上一题答案残留（仅 i > 0）与 "Question:" 标签
fn clean_question_block(block: &str, strip_leading_letters: bool) -> String {
    let block = if strip_leading_letters {
        LEADING_LETTERS.replace(block, "")
    } else {
        block.into()
    };
    let block = QUESTION_LABEL.replace(&block, "");
    block.trim().to_string()
}

/// 批量题目提取器
#[derive(Debug, Clone, Default)]
pub struct BulkExtractor {
    config: ExtractorConfig,
}

impl BulkExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, document: &str) -> Extraction {
        let cleaned = strip_sections(document, &EXPLANATION, &QUESTION_MARKER);
        let cleaned = strip_sections(&cleaned, &REFERENCE, &QUESTION_OR_ANSWER_MARKER);

        let fragments: Vec<&str> = ANSWER_MARKER.split(&cleaned).collect();
        let mut questions = Vec::new();
        let mut skipped = 0;

        for (i, pair) in fragments.windows(2).enumerate() {
            let (block, answer_fragment) = (pair[0], pair[1]);

            let Some(correct_answer) = normalize_answer_run(answer_fragment) else {
                debug!("跳过第 {} 个片段：答案处没有字母", i + 1);
                skipped += 1;
                continue;
            };

            let question_text = clean_question_block(block, i > 0);
            let content_chars = question_text.chars().filter(|c| !c.is_whitespace()).count();
            if content_chars <= self.config.min_question_chars {
                debug!("跳过第 {} 个片段：题目内容过短 ({} 字符)", i + 1, content_chars);
                skipped += 1;
                continue;
            }

            questions.push(QuestionCandidate {
                question_text,
                correct_answer,
            });
        }

        info!("批量导入：识别 {} 道题，丢弃 {} 个片段", questions.len(), skipped);

        let message = questions.is_empty().then(|| NO_QUESTIONS_MESSAGE.to_string());
        Extraction {
            questions,
            skipped,
            message,
        }
    }
}

/// 使用默认配置提取
pub fn extract_questions(document: &str) -> Extraction {
    BulkExtractor::default().extract(document)
}
