// 服务模块
// 提供核心业务逻辑服务

pub mod choice_parser;
pub mod database;
pub mod drill;
pub mod extractor;
pub mod grader;
pub mod markdown;
pub mod quiz;

pub use choice_parser::{collapse_whitespace, display_answer, parse_choices};

pub use grader::{
    correct_letters,
    grade,
    is_multi_answer,
    AnswerSelection,
    AnswerSet,
};

pub use extractor::{
    extract_questions,
    normalize_answer_run,
    BulkExtractor,
    Extraction,
};

pub use drill::{
    DrillEngine,
    DrillPhase,
    DrillProgress,
    DrillState,
};

pub use markdown::{flatten_markdown, MarkdownFlattener};

pub use quiz::QuizSession;

pub use database::DatabaseService;
