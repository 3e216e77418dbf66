use thiserror::Error;

/// 题目集存储错误
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Timestamp(#[from] chrono::ParseError),
    #[error("database lock poisoned")]
    LockPoisoned,
}

/// 配置读写错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// 学习模式状态机的调用约定错误，不会修改状态
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillError {
    #[error("session is complete; restart to study again")]
    SessionComplete,
    #[error("an answer was already recorded for the current question")]
    AnswerAlreadyRecorded,
    #[error("no answer recorded for the current question")]
    NoAnswerRecorded,
    #[error("invalid saved session state: {0}")]
    InvalidState(&'static str),
}
