// 数据库命令模块
// 提供供前端调用的题目集增删改查命令，结构与 REST 层的请求/响应体一致

use crate::models::{QuestionRecord, StudySet};
use crate::services::database::DatabaseService;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 数据库应用状态
pub struct DbState(pub DatabaseService);

/// 题目传输对象（前端传入，新题目没有 id）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub id: Option<String>,
    pub question_text: String,
    pub correct_answer: String,
}

impl From<QuestionInput> for QuestionRecord {
    fn from(q: QuestionInput) -> Self {
        Self {
            id: q.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            question_text: q.question_text,
            correct_answer: q.correct_answer,
        }
    }
}

/// 题目集传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySetDto {
    pub id: String,
    pub title: String,
    pub questions: Vec<QuestionRecord>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<StudySet> for StudySetDto {
    fn from(set: StudySet) -> Self {
        Self {
            id: set.id,
            title: set.title,
            questions: set.questions,
            created_at: set.created_at.to_rfc3339(),
            updated_at: set.updated_at.to_rfc3339(),
        }
    }
}

fn to_records(questions: Vec<QuestionInput>) -> Vec<QuestionRecord> {
    questions.into_iter().map(Into::into).collect()
}

/// 初始化数据库
pub async fn init_database(state: &DbState) -> Result<(), String> {
    state.0.initialize().map_err(|e| e.to_string())
}

/// 创建题目集
pub async fn create_study_set(
    owner_id: String,
    title: String,
    questions: Vec<QuestionInput>,
    state: &DbState,
) -> Result<StudySetDto, String> {
    let set = state
        .0
        .create_study_set(&owner_id, &title, &to_records(questions))
        .map_err(|e| e.to_string())?;

    Ok(set.into())
}

/// 获取题目集列表
pub async fn get_study_sets(owner_id: String, state: &DbState) -> Result<Vec<StudySetDto>, String> {
    let sets = state.0.list_study_sets(&owner_id).map_err(|e| e.to_string())?;

    Ok(sets.into_iter().map(Into::into).collect())
}

/// 获取题目集
pub async fn get_study_set(
    owner_id: String,
    id: String,
    state: &DbState,
) -> Result<Option<StudySetDto>, String> {
    let set = state.0.get_study_set(&owner_id, &id).map_err(|e| e.to_string())?;

    Ok(set.map(Into::into))
}

/// 更新题目集（整体替换）
pub async fn update_study_set(
    owner_id: String,
    id: String,
    title: String,
    questions: Vec<QuestionInput>,
    state: &DbState,
) -> Result<Option<StudySetDto>, String> {
    let set = state
        .0
        .update_study_set(&owner_id, &id, &title, &to_records(questions))
        .map_err(|e| e.to_string())?;

    Ok(set.map(Into::into))
}

/// 删除题目集
pub async fn delete_study_set(owner_id: String, id: String, state: &DbState) -> Result<bool, String> {
    state.0.delete_study_set(&owner_id, &id).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DbState {
        DbState(DatabaseService::open_in_memory().unwrap())
    }

    fn input(text: &str, answer: &str) -> QuestionInput {
        QuestionInput {
            id: None,
            question_text: text.to_string(),
            correct_answer: answer.to_string(),
        }
    }

    #[tokio::test]
    async fn test_study_set_crud() {
        let state = state();
        init_database(&state).await.unwrap();

        let created = create_study_set(
            "alice".to_string(),
            "Math".to_string(),
            vec![input("2 + 2?\nA. 3\nB. 4", "B")],
            &state,
        )
        .await
        .unwrap();
        assert_eq!(created.questions.len(), 1);

        let sets = get_study_sets("alice".to_string(), &state).await.unwrap();
        assert_eq!(sets.len(), 1);

        let updated = update_study_set(
            "alice".to_string(),
            created.id.clone(),
            "Math 2".to_string(),
            vec![input("3 + 3?\nA. 6\nB. 7", "A"), input("1 + 1?\nA. 2\nB. 3", "A")],
            &state,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.questions.len(), 2);

        let fetched = get_study_set("alice".to_string(), created.id.clone(), &state)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.title, "Math 2");

        assert!(delete_study_set("alice".to_string(), created.id.clone(), &state).await.unwrap());
        assert!(get_study_set("alice".to_string(), created.id, &state).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dto_json_shape() {
        let state = state();
        let created = create_study_set("alice".to_string(), "Math".to_string(), vec![input("Q?", "A")], &state)
            .await
            .unwrap();

        let json = serde_json::to_value(&created).unwrap();
        assert!(json["createdAt"].is_string());
        assert_eq!(json["questions"][0]["questionText"], "Q?");
    }
}
