use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::lesson::Lesson;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub id: i64,
    pub user_id: String,
    pub lesson_id: i64,
    pub progress: i32,
    pub completed: bool,
    pub last_accessed: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `user_progress` inner-joined with its lesson.
#[derive(Debug, Clone, FromRow)]
pub struct ProgressLessonRow {
    pub id: i64,
    pub user_id: String,
    pub lesson_id: i64,
    pub progress: i32,
    pub completed: bool,
    pub last_accessed: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub duration: String,
    pub difficulty: String,
    pub order_index: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLesson {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub duration: String,
    pub difficulty: String,
    pub order_index: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressWithLesson {
    #[serde(flatten)]
    pub progress: UserProgress,
    pub lesson: ProgressLesson,
}

impl From<ProgressLessonRow> for ProgressWithLesson {
    fn from(row: ProgressLessonRow) -> Self {
        Self {
            lesson: ProgressLesson {
                id: row.lesson_id,
                title: row.title,
                description: row.description,
                duration: row.duration,
                difficulty: row.difficulty,
                order_index: row.order_index,
            },
            progress: UserProgress {
                id: row.id,
                user_id: row.user_id,
                lesson_id: row.lesson_id,
                progress: row.progress,
                completed: row.completed,
                last_accessed: row.last_accessed,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyProgress {
    pub total: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub not_started: u32,
    pub completion_rate: u32,
}

/// The most recently opened lesson with the user's standing on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastAccessedLesson {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub progress: i32,
    pub completed: bool,
    pub last_accessed: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total_lessons: u32,
    pub completed_lessons: u32,
    pub in_progress_lessons: u32,
    pub not_started_lessons: u32,
    pub average_progress: i64,
    pub overall_completion_rate: u32,
    pub last_accessed_lesson: Option<LastAccessedLesson>,
    pub progress_by_difficulty: BTreeMap<String, DifficultyProgress>,
}
