//! 判分逻辑
//! 多选题按集合相等判分，不给部分分

use std::collections::BTreeSet;

/// 用户当前选中的选项字母
pub type AnswerSet = BTreeSet<char>;

/// 正确答案中含逗号即为多选题
pub fn is_multi_answer(correct_answer: &str) -> bool {
    correct_answer.contains(',')
}

/// 拆分正确答案：按逗号切分、去空白、转大写，重复字母按集合去重
pub fn correct_letters(correct_answer: &str) -> BTreeSet<String> {
    correct_answer
        .split(',')
        .map(|token| token.trim().to_uppercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// 精确匹配判分：空选择判错；多选或漏选均判错
pub fn grade(selected: &AnswerSet, correct_answer: &str) -> bool {
    if selected.is_empty() {
        return false;
    }
    let selected: BTreeSet<String> = selected
        .iter()
        .map(|c| c.to_uppercase().collect::<String>())
        .collect();
    selected == correct_letters(correct_answer)
}

/// 单题作答过程
///
/// 单选题在第一次点选时立即判分；多选题只切换选中状态，直到 `submit` 才判分。
#[derive(Debug, Clone)]
pub struct AnswerSelection {
    correct_answer: String,
    multi: bool,
    selected: AnswerSet,
    outcome: Option<bool>,
}

impl AnswerSelection {
    pub fn new(correct_answer: impl Into<String>) -> Self {
        let correct_answer = correct_answer.into();
        let multi = is_multi_answer(&correct_answer);
        Self {
            correct_answer,
            multi,
            selected: AnswerSet::new(),
            outcome: None,
        }
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn selected(&self) -> &AnswerSet {
        &self.selected
    }

    /// 已判分则返回结果
    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }

    /// 点选一个字母；单选题返回判分结果，多选题返回 `None`
    ///
    /// 判分后的点选会被忽略并返回已有结果。
    pub fn select(&mut self, letter: char) -> Option<bool> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        let letter = letter.to_ascii_uppercase();

        if self.multi {
            if !self.selected.remove(&letter) {
                self.selected.insert(letter);
            }
            return None;
        }

        self.selected.clear();
        self.selected.insert(letter);
        let result = grade(&self.selected, &self.correct_answer);
        self.outcome = Some(result);
        Some(result)
    }

    /// 提交多选题；单选题未点选时提交视为空选择
    pub fn submit(&mut self) -> bool {
        if let Some(result) = self.outcome {
            return result;
        }
        let result = grade(&self.selected, &self.correct_answer);
        self.outcome = Some(result);
        result
    }
}
