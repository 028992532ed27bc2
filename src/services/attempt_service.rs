use sqlx::PgPool;

use crate::dto::attempt_dto::NewQuizAttempt;
use crate::error::{Error, Result};
use crate::models::quiz_attempt::{AttemptView, AttemptViewRow, AttemptWithQuestion, QuizAttempt};
use crate::models::stats::StatsSummary;
use crate::services::stats_service::StatsService;

const ATTEMPT_VIEW_QUERY: &str = r#"
    SELECT a.id, a.user_id, a.quiz_question_id, a.user_answer, a.is_correct,
           a.time_taken, a.created_at,
           q.question, q.options, q.correct_answer, q.explanation, q.topic, q.difficulty
    FROM quiz_attempts a
    LEFT JOIN quiz_questions q ON q.id = a.quiz_question_id
    WHERE a.user_id = $1
    ORDER BY a.created_at DESC, a.id DESC
"#;

#[derive(Clone)]
pub struct AttemptService {
    pool: PgPool,
}

impl AttemptService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn user_exists(&self, user_id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Records an answer for `user_id`, grading it against the stored question.
    pub async fn create(&self, user_id: &str, new: NewQuizAttempt) -> Result<QuizAttempt> {
        if !self.user_exists(user_id).await? {
            return Err(Error::not_found("USER_NOT_FOUND", "User not found"));
        }

        let correct_answer: i32 =
            sqlx::query_scalar("SELECT correct_answer FROM quiz_questions WHERE id = $1")
                .bind(new.quiz_question_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| {
                    Error::not_found("QUIZ_QUESTION_NOT_FOUND", "Quiz question not found")
                })?;

        let attempt = sqlx::query_as::<_, QuizAttempt>(
            r#"
            INSERT INTO quiz_attempts (user_id, quiz_question_id, user_answer, is_correct, time_taken)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, quiz_question_id, user_answer, is_correct, time_taken, created_at
            "#,
        )
        .bind(user_id)
        .bind(new.quiz_question_id)
        .bind(new.user_answer)
        .bind(new.user_answer == correct_answer)
        .bind(new.time_taken)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            attempt_id = attempt.id,
            quiz_question_id = attempt.quiz_question_id,
            is_correct = attempt.is_correct,
            "Quiz attempt recorded"
        );
        Ok(attempt)
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AttemptWithQuestion>> {
        let rows = sqlx::query_as::<_, AttemptViewRow>(&format!(
            "{} LIMIT $2 OFFSET $3",
            ATTEMPT_VIEW_QUERY
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AttemptWithQuestion::from(AttemptView::from(row)))
            .collect())
    }

    /// Every attempt of the user, newest first.
    pub async fn history_for_user(&self, user_id: &str) -> Result<Vec<AttemptView>> {
        let rows = sqlx::query_as::<_, AttemptViewRow>(ATTEMPT_VIEW_QUERY)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(AttemptView::from).collect())
    }

    pub async fn stats_for_user(&self, user_id: &str) -> Result<StatsSummary> {
        if !self.user_exists(user_id).await? {
            return Err(Error::not_found("USER_NOT_FOUND", "User not found"));
        }
        let history = self.history_for_user(user_id).await?;
        Ok(StatsService::summarize(&history))
    }
}
