//! 测验模式
//! 按顺序作答一遍，每题只计一次分

use crate::services::grader::{grade, AnswerSet};
use crate::models::QuestionRecord;
use serde::{Deserialize, Serialize};

/// 测验进度，宿主可序列化保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    questions: Vec<QuestionRecord>,
    index: usize,
    /// 每题的判分结果，未作答为 `None`
    results: Vec<Option<bool>>,
}

impl QuizSession {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        let results = vec![None; questions.len()];
        Self {
            questions,
            index: 0,
            results,
        }
    }

    pub fn current(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 对当前题判分；已作答的题保持第一次的结果
    pub fn answer(&mut self, selected: &AnswerSet) -> Option<bool> {
        let question = self.questions.get(self.index)?;
        let slot = &mut self.results[self.index];
        if slot.is_none() {
            *slot = Some(grade(selected, &question.correct_answer));
        }
        *slot
    }

    /// 进入下一题，已是最后一题时返回 `false`
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.questions.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn score(&self) -> usize {
        self.results.iter().filter(|r| **r == Some(true)).count()
    }

    pub fn answered(&self) -> usize {
        self.results.iter().filter(|r| r.is_some()).count()
    }

    pub fn is_finished(&self) -> bool {
        self.answered() == self.questions.len()
    }

    /// 答错的题，用于测验结束后的回顾
    pub fn incorrect_questions(&self) -> Vec<&QuestionRecord> {
        self.questions
            .iter()
            .zip(&self.results)
            .filter(|(_, r)| **r == Some(false))
            .map(|(q, _)| q)
            .collect()
    }
}
