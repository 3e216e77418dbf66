//! 题库数据模型
//! 与 REST 层交换的 JSON 结构保持一致（camelCase 字段）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 单道题目记录，创建后不可变，编辑时整体替换
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub question_text: String,
    pub correct_answer: String,
}

impl QuestionRecord {
    pub fn new(question_text: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question_text: question_text.into(),
            correct_answer: correct_answer.into(),
        }
    }
}

/// 批量导入得到的候选题目（尚未分配 id）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCandidate {
    pub question_text: String,
    pub correct_answer: String,
}

impl From<QuestionCandidate> for QuestionRecord {
    fn from(c: QuestionCandidate) -> Self {
        QuestionRecord::new(c.question_text, c.correct_answer)
    }
}

/// 题目集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySet {
    pub id: String,
    pub title: String,
    pub questions: Vec<QuestionRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 解析出的单个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedChoice {
    pub letter: char,
    pub text: String,
}

/// 解析出的题干与选项
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedQuestion {
    pub stem: String,
    pub choices: Vec<ParsedChoice>,
}

impl ParsedQuestion {
    /// 没有选项即视为简答题，调用方应直接展示正确答案
    pub fn is_free_response(&self) -> bool {
        self.choices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_record_json_shape() {
        let record = QuestionRecord {
            id: "q1".to_string(),
            question_text: "What is 2 + 2?\nA. 3\nB. 4".to_string(),
            correct_answer: "B".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["questionText"], "What is 2 + 2?\nA. 3\nB. 4");
        assert_eq!(json["correctAnswer"], "B");

        let back: QuestionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_candidate_gets_fresh_id() {
        let a: QuestionRecord = QuestionCandidate {
            question_text: "Q".to_string(),
            correct_answer: "A".to_string(),
        }
        .into();
        let b = QuestionRecord::new("Q", "A");
        assert_ne!(a.id, b.id);
        assert_eq!(a.correct_answer, "A");
    }
}
