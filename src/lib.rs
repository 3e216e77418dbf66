//! 刷题核心库：选项解析、批量导入、判分与学习模式状态机

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{ExtractorConfig, QuestionRange, StudyConfig};
pub use error::{ConfigError, DrillError, StoreError};
pub use models::{ParsedChoice, ParsedQuestion, QuestionCandidate, QuestionRecord, StudySet};
pub use services::{
    extract_questions, grade, parse_choices, AnswerSelection, BulkExtractor, DrillEngine,
    DrillPhase, Extraction,
};
