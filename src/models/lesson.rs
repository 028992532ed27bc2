use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::quiz_question::QuestionDifficulty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub duration: String,
    pub difficulty: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLesson {
    pub title: String,
    pub description: Option<String>,
    pub duration: String,
    pub difficulty: QuestionDifficulty,
    pub order_index: i32,
}

/// Fields to change on a lesson. `description: Some(None)` clears it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LessonUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub duration: Option<String>,
    pub difficulty: Option<QuestionDifficulty>,
    pub order_index: Option<i32>,
}

impl LessonUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
