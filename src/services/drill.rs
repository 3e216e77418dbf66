//! 学习模式状态机
//! 首轮顺序作答，答错的题进入错题队列；首轮结束后循环复习错题，直到全部答对

use crate::error::DrillError;
use log::debug;
use serde::{Deserialize, Serialize};

/// 学习阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrillPhase {
    Primary,
    Review,
    Complete,
}

/// 学习会话状态，可由宿主序列化保存后恢复
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillState {
    pub total: usize,
    /// 首轮下标，只增不减
    pub cursor: usize,
    /// 首轮答错的题目下标，按出现顺序，不重复
    pub missed_queue: Vec<usize>,
    pub phase: DrillPhase,
    /// 错题队列中的位置，仅在 Review 阶段有效
    pub review_cursor: usize,
    pub mastered_count: usize,
    /// 当前题已记录但尚未 advance 的作答结果
    pub pending: Option<bool>,
}

impl DrillState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            cursor: 0,
            missed_queue: Vec::new(),
            phase: if total == 0 {
                DrillPhase::Complete
            } else {
                DrillPhase::Primary
            },
            review_cursor: 0,
            mastered_count: 0,
            pending: None,
        }
    }

    fn validate(&self) -> Result<(), DrillError> {
        if self.mastered_count > self.total {
            return Err(DrillError::InvalidState("mastered count exceeds total"));
        }
        if self.missed_queue.iter().any(|&i| i >= self.total) {
            return Err(DrillError::InvalidState("missed question out of range"));
        }
        for (pos, i) in self.missed_queue.iter().enumerate() {
            if self.missed_queue[..pos].contains(i) {
                return Err(DrillError::InvalidState("duplicate missed question"));
            }
        }

        match self.phase {
            DrillPhase::Primary if self.cursor >= self.total => {
                Err(DrillError::InvalidState("cursor out of range"))
            }
            DrillPhase::Review if self.missed_queue.is_empty() => {
                Err(DrillError::InvalidState("review with empty missed queue"))
            }
            DrillPhase::Review if self.review_cursor >= self.missed_queue.len() => {
                Err(DrillError::InvalidState("review cursor out of range"))
            }
            DrillPhase::Complete if self.pending.is_some() => {
                Err(DrillError::InvalidState("pending answer after completion"))
            }
            _ => Ok(()),
        }
    }
}

/// 界面展示用的进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillProgress {
    pub phase: DrillPhase,
    pub mastered: usize,
    pub remaining: usize,
    pub missed: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct DrillEngine {
    state: DrillState,
}

impl DrillEngine {
    pub fn new(total: usize) -> Self {
        Self {
            state: DrillState::new(total),
        }
    }

    /// 从宿主保存的状态恢复；状态不一致时返回 `InvalidState`
    pub fn from_state(state: DrillState) -> Result<Self, DrillError> {
        state.validate()?;
        Ok(Self { state })
    }

    pub fn state(&self) -> &DrillState {
        &self.state
    }

    pub fn phase(&self) -> DrillPhase {
        self.state.phase
    }

    pub fn is_complete(&self) -> bool {
        self.state.phase == DrillPhase::Complete
    }

    /// 当前应展示的题目下标
    pub fn current_question(&self) -> Option<usize> {
        match self.state.phase {
            DrillPhase::Primary => Some(self.state.cursor),
            DrillPhase::Review => self.state.missed_queue.get(self.state.review_cursor).copied(),
            DrillPhase::Complete => None,
        }
    }

    pub fn progress(&self) -> DrillProgress {
        DrillProgress {
            phase: self.state.phase,
            mastered: self.state.mastered_count,
            remaining: self.state.total.saturating_sub(self.state.mastered_count),
            missed: self.state.missed_queue.len(),
            total: self.state.total,
        }
    }

    /// 记录当前题的作答结果
    pub fn record_answer(&mut self, was_correct: bool) -> Result<(), DrillError> {
        let state = &mut self.state;
        if state.phase == DrillPhase::Complete {
            return Err(DrillError::SessionComplete);
        }
        if state.pending.is_some() {
            return Err(DrillError::AnswerAlreadyRecorded);
        }

        if was_correct {
            state.mastered_count += 1;
        } else if state.phase == DrillPhase::Primary && !state.missed_queue.contains(&state.cursor) {
            state.missed_queue.push(state.cursor);
        }
        state.pending = Some(was_correct);
        Ok(())
    }

    /// 根据已记录的结果进入下一题，返回新的阶段
    pub fn advance(&mut self) -> Result<DrillPhase, DrillError> {
        let state = &mut self.state;
        if state.phase == DrillPhase::Complete {
            return Err(DrillError::SessionComplete);
        }
        let Some(was_correct) = state.pending.take() else {
            return Err(DrillError::NoAnswerRecorded);
        };

        match state.phase {
            DrillPhase::Primary => {
                if state.cursor + 1 >= state.total {
                    if state.missed_queue.is_empty() {
                        state.phase = DrillPhase::Complete;
                    } else {
                        debug!("首轮结束，进入错题复习 ({} 道)", state.missed_queue.len());
                        state.review_cursor = 0;
                        state.phase = DrillPhase::Review;
                    }
                } else {
                    state.cursor += 1;
                }
            }
            DrillPhase::Review => {
                if was_correct && state.review_cursor < state.missed_queue.len() {
                    state.missed_queue.remove(state.review_cursor);
                    if state.missed_queue.is_empty() {
                        state.phase = DrillPhase::Complete;
                    } else if state.review_cursor >= state.missed_queue.len() {
                        state.review_cursor = 0;
                    }
                } else {
                    state.review_cursor = (state.review_cursor + 1) % state.missed_queue.len().max(1);
                }
            }
            DrillPhase::Complete => {}
        }

        if state.phase == DrillPhase::Complete {
            debug!("学习完成，共掌握 {} 道", state.mastered_count);
        }
        Ok(state.phase)
    }

    /// 记录结果并立即进入下一题
    pub fn answer(&mut self, was_correct: bool) -> Result<DrillPhase, DrillError> {
        self.record_answer(was_correct)?;
        self.advance()
    }

    pub fn restart(&mut self) {
        self.state = DrillState::new(self.state.total);
    }
}
