//! 学习与测验命令
//! 会话状态由宿主持有，一个 StudyState 对应一个正在学习的用户

use crate::commands::config::ConfigState;
use crate::commands::parser::{to_answer_set, QuestionViewDto};
use crate::config::{QuestionRange, StudyConfig};
use crate::error::DrillError;
use crate::models::{QuestionRecord, StudySet};
use crate::services::drill::{DrillEngine, DrillProgress, DrillState};
use crate::services::grader::AnswerSelection;
use crate::services::quiz::QuizSession;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const NO_LEARN_SESSION: &str = "没有进行中的学习";
const NO_QUIZ_SESSION: &str = "没有进行中的测验";

/// 学习模式会话：题目 + 状态机 + 当前题的作答
pub struct LearnSession {
    questions: Vec<QuestionRecord>,
    engine: DrillEngine,
    selection: Option<AnswerSelection>,
}

impl LearnSession {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        let engine = DrillEngine::new(questions.len());
        Self::with_engine(questions, engine)
    }

    /// 用宿主保存的状态继续学习，题目数必须与保存时一致
    pub fn resume(questions: Vec<QuestionRecord>, saved: DrillState) -> Result<Self, DrillError> {
        if saved.total != questions.len() {
            return Err(DrillError::InvalidState("question count does not match saved session"));
        }
        let engine = DrillEngine::from_state(saved)?;
        Ok(Self::with_engine(questions, engine))
    }

    fn with_engine(questions: Vec<QuestionRecord>, engine: DrillEngine) -> Self {
        let mut session = Self {
            questions,
            engine,
            selection: None,
        };
        session.reset_selection();
        session
    }

    fn current(&self) -> Option<&QuestionRecord> {
        self.engine
            .current_question()
            .and_then(|i| self.questions.get(i))
    }

    fn reset_selection(&mut self) {
        self.selection = self
            .current()
            .map(|q| AnswerSelection::new(q.correct_answer.clone()));
    }

    fn apply(&mut self, was_correct: bool) -> Result<LearnStepDto, String> {
        let answered = self.current().map(|q| q.correct_answer.clone());
        self.engine.answer(was_correct).map_err(|e| e.to_string())?;
        self.reset_selection();
        Ok(self.step(Some(was_correct), answered))
    }

    fn step(&self, last_result: Option<bool>, last_correct_answer: Option<String>) -> LearnStepDto {
        LearnStepDto {
            question: self.current().map(QuestionViewDto::from),
            progress: self.engine.progress(),
            last_result,
            last_correct_answer,
        }
    }
}

/// 学习状态
pub struct StudyState {
    config: Arc<ConfigState>,
    learn: Mutex<Option<LearnSession>>,
    quiz: Mutex<Option<QuizSession>>,
}

impl StudyState {
    /// 从默认配置文件加载配置
    pub fn new() -> Self {
        Self::with_shared_config(Arc::new(ConfigState::load_default()))
    }

    /// `config_path` 为 `None` 时配置只保存在内存中
    pub fn with_config(config: StudyConfig, config_path: Option<PathBuf>) -> Self {
        Self::with_shared_config(Arc::new(ConfigState::new(config, config_path)))
    }

    /// 与 `ParserState` 共用同一份配置
    pub fn with_shared_config(config: Arc<ConfigState>) -> Self {
        Self {
            config,
            learn: Mutex::new(None),
            quiz: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &Arc<ConfigState> {
        &self.config
    }

    /// 按配置截取本轮题目；传入范围时记为上次使用的范围
    async fn select_questions(
        &self,
        set: &StudySet,
        range: Option<QuestionRange>,
    ) -> Result<Vec<QuestionRecord>, String> {
        let mut config = self.config.lock().await;
        if range.is_some() {
            config.last_range = range;
            self.config.persist(&config).await?;
        }
        let indices = config.session_range(set.questions.len());
        Ok(set.questions[indices].to_vec())
    }
}

impl Default for StudyState {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== DTO 类型定义 ====================

/// 学习模式每一步的返回
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnStepDto {
    /// 下一道要展示的题，完成时为 `None`
    pub question: Option<QuestionViewDto>,
    pub progress: DrillProgress,
    pub last_result: Option<bool>,
    pub last_correct_answer: Option<String>,
}

/// 测验每一步的返回
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStepDto {
    pub question: Option<QuestionViewDto>,
    pub index: usize,
    pub total: usize,
    pub score: usize,
    pub answered: usize,
    pub finished: bool,
    pub last_result: Option<bool>,
}

impl QuizStepDto {
    fn from_session(quiz: &QuizSession, last_result: Option<bool>) -> Self {
        Self {
            question: quiz.current().map(QuestionViewDto::from),
            index: quiz.index(),
            total: quiz.len(),
            score: quiz.score(),
            answered: quiz.answered(),
            finished: quiz.is_finished(),
            last_result,
        }
    }
}

// ==================== 学习模式 ====================

/// 开始学习
pub async fn start_learn_session(
    set: StudySet,
    range: Option<QuestionRange>,
    state: &StudyState,
) -> Result<LearnStepDto, String> {
    let questions = state.select_questions(&set, range).await?;
    info!("开始学习 {}，共 {} 道题", set.title, questions.len());

    let session = LearnSession::new(questions);
    let step = session.step(None, None);
    *state.learn.lock().await = Some(session);
    Ok(step)
}

/// 恢复宿主保存的学习进度
pub async fn resume_learn_session(
    questions: Vec<QuestionRecord>,
    saved: DrillState,
    state: &StudyState,
) -> Result<LearnStepDto, String> {
    let session = LearnSession::resume(questions, saved).map_err(|e| e.to_string())?;
    let step = session.step(None, None);
    *state.learn.lock().await = Some(session);
    Ok(step)
}

/// 点选一个选项；单选题立即判分并进入下一题，多选题返回 `None` 等待提交
pub async fn select_learn_choice(
    letter: String,
    state: &StudyState,
) -> Result<Option<LearnStepDto>, String> {
    let mut guard = state.learn.lock().await;
    let session = guard.as_mut().ok_or(NO_LEARN_SESSION)?;
    let letter = to_answer_set(&[letter])?
        .into_iter()
        .next()
        .ok_or("未选择选项")?;

    let outcome = match session.selection.as_mut() {
        Some(selection) => selection.select(letter),
        None => return Err(DrillError::SessionComplete.to_string()),
    };

    match outcome {
        Some(was_correct) => session.apply(was_correct).map(Some),
        None => Ok(None),
    }
}

/// 提交多选题
pub async fn submit_learn_answer(state: &StudyState) -> Result<LearnStepDto, String> {
    let mut guard = state.learn.lock().await;
    let session = guard.as_mut().ok_or(NO_LEARN_SESSION)?;

    let was_correct = match session.selection.as_mut() {
        Some(selection) => selection.submit(),
        None => return Err(DrillError::SessionComplete.to_string()),
    };
    session.apply(was_correct)
}

/// 简答题（翻卡自评）直接报告结果
pub async fn report_learn_result(was_correct: bool, state: &StudyState) -> Result<LearnStepDto, String> {
    let mut guard = state.learn.lock().await;
    let session = guard.as_mut().ok_or(NO_LEARN_SESSION)?;
    session.apply(was_correct)
}

/// 获取学习进度
pub async fn get_learn_progress(state: &StudyState) -> Result<Option<DrillProgress>, String> {
    let guard = state.learn.lock().await;
    Ok(guard.as_ref().map(|s| s.engine.progress()))
}

/// 重新开始当前学习
pub async fn restart_learn_session(state: &StudyState) -> Result<LearnStepDto, String> {
    let mut guard = state.learn.lock().await;
    let session = guard.as_mut().ok_or(NO_LEARN_SESSION)?;
    session.engine.restart();
    session.reset_selection();
    Ok(session.step(None, None))
}

/// 退出学习，返回最后的状态供宿主保存
pub async fn end_learn_session(state: &StudyState) -> Result<Option<DrillState>, String> {
    let session = state.learn.lock().await.take();
    Ok(session.map(|s| s.engine.state().clone()))
}

// ==================== 测验模式 ====================

/// 开始测验
pub async fn start_quiz(
    set: StudySet,
    range: Option<QuestionRange>,
    state: &StudyState,
) -> Result<QuizStepDto, String> {
    let questions = state.select_questions(&set, range).await?;
    let quiz = QuizSession::new(questions);
    let step = QuizStepDto::from_session(&quiz, None);
    *state.quiz.lock().await = Some(quiz);
    Ok(step)
}

/// 提交当前测验题的答案
pub async fn answer_quiz_question(selected: Vec<String>, state: &StudyState) -> Result<QuizStepDto, String> {
    let selected = to_answer_set(&selected)?;
    let mut guard = state.quiz.lock().await;
    let quiz = guard.as_mut().ok_or(NO_QUIZ_SESSION)?;

    let result = quiz.answer(&selected);
    Ok(QuizStepDto::from_session(quiz, result))
}

/// 进入下一道测验题
pub async fn next_quiz_question(state: &StudyState) -> Result<QuizStepDto, String> {
    let mut guard = state.quiz.lock().await;
    let quiz = guard.as_mut().ok_or(NO_QUIZ_SESSION)?;

    quiz.next();
    Ok(QuizStepDto::from_session(quiz, None))
}

/// 回到上一道测验题
pub async fn previous_quiz_question(state: &StudyState) -> Result<QuizStepDto, String> {
    let mut guard = state.quiz.lock().await;
    let quiz = guard.as_mut().ok_or(NO_QUIZ_SESSION)?;

    quiz.previous();
    Ok(QuizStepDto::from_session(quiz, None))
}

/// 测验中答错的题，供结束后回顾
pub async fn get_quiz_review(state: &StudyState) -> Result<Vec<QuestionViewDto>, String> {
    let guard = state.quiz.lock().await;
    let quiz = guard.as_ref().ok_or(NO_QUIZ_SESSION)?;

    Ok(quiz.incorrect_questions().into_iter().map(QuestionViewDto::from).collect())
}
