use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::quiz_question::QuestionOptions;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub topic: String,
    pub attempts: u32,
    pub correct: u32,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyStats {
    pub difficulty: String,
    pub attempts: u32,
    pub correct: u32,
    pub accuracy: f64,
}

/// Flattened attempt + question fields shown in the recent-activity list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAttempt {
    pub id: i64,
    pub quiz_question_id: i64,
    pub question: Option<String>,
    pub options: Option<QuestionOptions>,
    pub user_answer: i32,
    pub correct_answer: Option<i32>,
    pub is_correct: bool,
    pub time_taken: i32,
    pub explanation: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_attempts: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub accuracy_rate: f64,
    pub average_time_taken: f64,
    pub total_time_practicing: i64,
    pub stats_by_topic: Vec<TopicStats>,
    pub stats_by_difficulty: Vec<DifficultyStats>,
    pub recent_attempts: Vec<RecentAttempt>,
    pub perfect_score_streak: u32,
}
