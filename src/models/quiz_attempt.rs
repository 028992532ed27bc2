use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::quiz_question::QuestionOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: i64,
    pub user_id: String,
    pub quiz_question_id: i64,
    pub user_answer: i32,
    pub is_correct: bool,
    pub time_taken: i32,
    pub created_at: DateTime<Utc>,
}

/// Attempt row left-joined with its question. Question columns are null when
/// the question row is missing.
#[derive(Debug, Clone, FromRow)]
pub struct AttemptViewRow {
    pub id: i64,
    pub user_id: String,
    pub quiz_question_id: i64,
    pub user_answer: i32,
    pub is_correct: bool,
    pub time_taken: i32,
    pub created_at: DateTime<Utc>,
    pub question: Option<String>,
    pub options: Option<sqlx::types::Json<Vec<String>>>,
    pub correct_answer: Option<i32>,
    pub explanation: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptView {
    pub attempt: QuizAttempt,
    pub question: Option<String>,
    pub options: Option<QuestionOptions>,
    pub correct_answer: Option<i32>,
    pub explanation: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

/// Options that fail the four-entry check are dropped so one bad question
/// row cannot break a whole history.
impl From<AttemptViewRow> for AttemptView {
    fn from(row: AttemptViewRow) -> Self {
        let options = row.options.and_then(|json| match QuestionOptions::try_from(json.0) {
            Ok(options) => Some(options),
            Err(e) => {
                tracing::warn!(
                    attempt_id = row.id,
                    quiz_question_id = row.quiz_question_id,
                    error = %e,
                    "Ignoring malformed question options"
                );
                None
            }
        });
        Self {
            attempt: QuizAttempt {
                id: row.id,
                user_id: row.user_id,
                quiz_question_id: row.quiz_question_id,
                user_answer: row.user_answer,
                is_correct: row.is_correct,
                time_taken: row.time_taken,
                created_at: row.created_at,
            },
            question: row.question,
            options,
            correct_answer: row.correct_answer,
            explanation: row.explanation,
            topic: row.topic,
            difficulty: row.difficulty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptQuestion {
    pub id: i64,
    pub question: String,
    pub options: QuestionOptions,
    pub correct_answer: i32,
    pub explanation: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

/// List item for a user's attempt history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptWithQuestion {
    #[serde(flatten)]
    pub attempt: QuizAttempt,
    pub question: Option<AttemptQuestion>,
}

impl From<AttemptView> for AttemptWithQuestion {
    fn from(view: AttemptView) -> Self {
        let question = match (view.question, view.options, view.correct_answer) {
            (Some(question), Some(options), Some(correct_answer)) => Some(AttemptQuestion {
                id: view.attempt.quiz_question_id,
                question,
                options,
                correct_answer,
                explanation: view.explanation,
                topic: view.topic,
                difficulty: view.difficulty,
            }),
            _ => None,
        };
        Self {
            attempt: view.attempt,
            question,
        }
    }
}
