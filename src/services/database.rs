// 数据库服务模块
// 提供 SQLite 题目集存储，按用户隔离，结构与 REST 层的数据约定一致

use crate::error::StoreError;
use crate::models::{QuestionRecord, StudySet};
use crate::utils::get_database_path;
use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// 题目集表中的一行（不含题目）
struct SetRow {
    id: String,
    title: String,
    created_at: String,
    updated_at: String,
}

/// 数据库服务
pub struct DatabaseService {
    pool: Mutex<Connection>,
}

impl DatabaseService {
    /// 在默认数据目录下打开数据库
    pub fn new() -> Result<Self, StoreError> {
        Self::open(&get_database_path())
    }

    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        // 确保数据目录存在
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let service = Self {
            pool: Mutex::new(Connection::open(db_path)?),
        };
        service.initialize()?;
        info!("题库数据库已打开: {}", db_path.display());
        Ok(service)
    }

    /// 内存数据库，主要用于测试
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let service = Self {
            pool: Mutex::new(Connection::open_in_memory()?),
        };
        service.initialize()?;
        Ok(service)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.pool.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// 初始化数据库表结构
    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS study_sets (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS questions (
                id TEXT NOT NULL,
                set_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                question_text TEXT NOT NULL,
                correct_answer TEXT NOT NULL,
                PRIMARY KEY (set_id, id),
                FOREIGN KEY (set_id) REFERENCES study_sets(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_study_sets_owner ON study_sets(owner_id);
            CREATE INDEX IF NOT EXISTS idx_questions_set_position ON questions(set_id, position);
            ",
        )?;

        Ok(())
    }

    // ==================== 题目集管理 ====================

    /// 创建题目集
    pub fn create_study_set(
        &self,
        owner_id: &str,
        title: &str,
        questions: &[QuestionRecord],
    ) -> Result<StudySet, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let now_text = now.to_rfc3339();

        tx.execute(
            "INSERT INTO study_sets (id, owner_id, title, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            params![id, owner_id, title, now_text, now_text],
        )?;
        let questions = Self::insert_questions(&tx, &id, questions)?;
        tx.commit()?;

        info!("创建题目集 {} ({} 道题)", id, questions.len());
        Ok(StudySet {
            id,
            title: title.to_string(),
            questions,
            created_at: now,
            updated_at: now,
        })
    }

    /// 获取题目集；不存在或属于其他用户时返回 `None`
    pub fn get_study_set(&self, owner_id: &str, id: &str) -> Result<Option<StudySet>, StoreError> {
        let conn = self.lock()?;

        match Self::find_set_row(&conn, owner_id, id)? {
            Some(row) => Ok(Some(Self::build_set(&conn, row)?)),
            None => Ok(None),
        }
    }

    /// 列出用户的所有题目集，最近修改的在前
    pub fn list_study_sets(&self, owner_id: &str) -> Result<Vec<StudySet>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, created_at, updated_at
             FROM study_sets WHERE owner_id = ? ORDER BY updated_at DESC",
        )?;
        let rows = stmt.query_map(params![owner_id], Self::row_to_set_row)?;

        let mut set_rows = Vec::new();
        for row in rows {
            set_rows.push(row?);
        }

        set_rows
            .into_iter()
            .map(|row| Self::build_set(&conn, row))
            .collect()
    }

    /// 整体替换题目集的标题与题目
    pub fn update_study_set(
        &self,
        owner_id: &str,
        id: &str,
        title: &str,
        questions: &[QuestionRecord],
    ) -> Result<Option<StudySet>, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let Some(existing) = Self::find_set_row(&tx, owner_id, id)? else {
            debug!("更新失败，题目集不存在: {}", id);
            return Ok(None);
        };

        let now = Utc::now();
        tx.execute(
            "UPDATE study_sets SET title = ?, updated_at = ? WHERE id = ?",
            params![title, now.to_rfc3339(), id],
        )?;
        tx.execute("DELETE FROM questions WHERE set_id = ?", params![id])?;
        let questions = Self::insert_questions(&tx, id, questions)?;
        tx.commit()?;

        Ok(Some(StudySet {
            id: existing.id,
            title: title.to_string(),
            questions,
            created_at: parse_timestamp(&existing.created_at)?,
            updated_at: now,
        }))
    }

    /// 删除题目集，返回是否确实删除
    pub fn delete_study_set(&self, owner_id: &str, id: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;

        let affected = conn.execute(
            "DELETE FROM study_sets WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )?;

        Ok(affected > 0)
    }

    // ==================== 辅助方法 ====================

    /// 写入题目，保证同一题目集内 id 唯一（空 id 或重复 id 重新分配）
    fn insert_questions(
        conn: &Connection,
        set_id: &str,
        questions: &[QuestionRecord],
    ) -> Result<Vec<QuestionRecord>, StoreError> {
        let mut stmt = conn.prepare(
            "INSERT INTO questions (id, set_id, position, question_text, correct_answer)
             VALUES (?, ?, ?, ?, ?)",
        )?;
        let mut seen = HashSet::new();
        let mut stored = Vec::with_capacity(questions.len());

        for (position, question) in questions.iter().enumerate() {
            let mut record = question.clone();
            if record.id.trim().is_empty() || !seen.insert(record.id.clone()) {
                record.id = Uuid::new_v4().to_string();
                seen.insert(record.id.clone());
            }

            stmt.execute(params![
                record.id,
                set_id,
                position as i64,
                record.question_text,
                record.correct_answer,
            ])?;
            stored.push(record);
        }

        Ok(stored)
    }

    fn find_set_row(conn: &Connection, owner_id: &str, id: &str) -> Result<Option<SetRow>, StoreError> {
        let row = conn
            .query_row(
                "SELECT id, title, created_at, updated_at
                 FROM study_sets WHERE id = ? AND owner_id = ?",
                params![id, owner_id],
                Self::row_to_set_row,
            )
            .optional()?;
        Ok(row)
    }

    fn load_questions(conn: &Connection, set_id: &str) -> Result<Vec<QuestionRecord>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, question_text, correct_answer
             FROM questions WHERE set_id = ? ORDER BY position",
        )?;
        let rows = stmt.query_map(params![set_id], |row| {
            Ok(QuestionRecord {
                id: row.get(0)?,
                question_text: row.get(1)?,
                correct_answer: row.get(2)?,
            })
        })?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(row?);
        }
        Ok(questions)
    }

    fn build_set(conn: &Connection, row: SetRow) -> Result<StudySet, StoreError> {
        let questions = Self::load_questions(conn, &row.id)?;
        Ok(StudySet {
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            id: row.id,
            title: row.title,
            questions,
        })
    }

    /// 从数据库行转换为 SetRow
    fn row_to_set_row(row: &rusqlite::Row) -> Result<SetRow, rusqlite::Error> {
        Ok(SetRow {
            id: row.get(0)?,
            title: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}
