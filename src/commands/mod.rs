// 命令模块
// 提供供宿主界面调用的命令接口，错误统一转为字符串

pub mod config;
pub mod parser;
pub mod database;
pub mod study;

pub use parser::{
    parse_question,
    grade_answer,
    import_questions,
    import_markdown,
    import_questions_from_file,
    get_parser_state,
    update_parser_config,
    ParserState,
    ChoiceDto,
    QuestionViewDto,
    ImportResultDto,
};

pub use database::{
    init_database,
    create_study_set,
    get_study_sets,
    get_study_set,
    update_study_set,
    delete_study_set,
    DbState,
    QuestionInput,
    StudySetDto,
};

pub use config::{
    get_study_config,
    update_study_config,
    ConfigState,
};

pub use study::{
    start_learn_session,
    resume_learn_session,
    select_learn_choice,
    submit_learn_answer,
    report_learn_result,
    get_learn_progress,
    restart_learn_session,
    end_learn_session,
    start_quiz,
    answer_quiz_question,
    next_quiz_question,
    previous_quiz_question,
    get_quiz_review,
    LearnSession,
    StudyState,
    LearnStepDto,
    QuizStepDto,
};
