use sqlx::types::Json;
use sqlx::PgPool;

use crate::dto::quiz_dto::QuizQuestionUpdate;
use crate::error::{Error, Result};
use crate::models::quiz_question::{NewQuizQuestion, QuizQuestion, QuizQuestionRow};

const QUESTION_COLUMNS: &str =
    "id, question, options, correct_answer, explanation, topic, difficulty, created_at";

#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub search: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

impl QuestionFilter {
    fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s))
    }

    fn topic(&self) -> Option<&str> {
        self.topic.as_deref().filter(|s| !s.is_empty())
    }

    fn difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> Result<QuizQuestion> {
        let row = sqlx::query_as::<_, QuizQuestionRow>(&format!(
            "SELECT {} FROM quiz_questions WHERE id = $1",
            QUESTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(question_not_found)?;
        Ok(row.try_into()?)
    }

    pub async fn list(
        &self,
        filter: &QuestionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuizQuestion>> {
        let rows = sqlx::query_as::<_, QuizQuestionRow>(&format!(
            r#"
            SELECT {}
            FROM quiz_questions
            WHERE ($1::text IS NULL OR question ILIKE $1)
              AND ($2::text IS NULL OR topic = $2)
              AND ($3::text IS NULL OR difficulty = $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            "#,
            QUESTION_COLUMNS
        ))
        .bind(filter.search_pattern())
        .bind(filter.topic())
        .bind(filter.difficulty())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        into_questions(rows)
    }

    pub async fn random(&self, filter: &QuestionFilter, count: i64) -> Result<Vec<QuizQuestion>> {
        let rows = sqlx::query_as::<_, QuizQuestionRow>(&format!(
            r#"
            SELECT {}
            FROM quiz_questions
            WHERE ($1::text IS NULL OR topic = $1)
              AND ($2::text IS NULL OR difficulty = $2)
            ORDER BY RANDOM()
            LIMIT $3
            "#,
            QUESTION_COLUMNS
        ))
        .bind(filter.topic())
        .bind(filter.difficulty())
        .bind(count)
        .fetch_all(&self.pool)
        .await?;
        into_questions(rows)
    }

    pub async fn create(&self, new: &NewQuizQuestion) -> Result<QuizQuestion> {
        let row = sqlx::query_as::<_, QuizQuestionRow>(&format!(
            r#"
            INSERT INTO quiz_questions (question, options, correct_answer, explanation, topic, difficulty)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        ))
        .bind(&new.question)
        .bind(Json(new.options.as_slice()))
        .bind(new.correct_answer)
        .bind(&new.explanation)
        .bind(&new.topic)
        .bind(new.difficulty.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(question_id = row.id, topic = %row.topic, "Quiz question created");
        Ok(row.try_into()?)
    }

    /// Applies the fields present in `update`; an empty update returns the
    /// stored question unchanged.
    pub async fn update(&self, id: i64, update: &QuizQuestionUpdate) -> Result<QuizQuestion> {
        if update.is_empty() {
            return self.get(id).await;
        }

        let row = sqlx::query_as::<_, QuizQuestionRow>(&format!(
            r#"
            UPDATE quiz_questions SET
                question = COALESCE($2, question),
                options = COALESCE($3, options),
                correct_answer = COALESCE($4, correct_answer),
                explanation = COALESCE($5, explanation),
                topic = COALESCE($6, topic),
                difficulty = COALESCE($7, difficulty)
            WHERE id = $1
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        ))
        .bind(id)
        .bind(update.question.as_deref())
        .bind(update.options.as_ref().map(|o| Json(o.as_slice())))
        .bind(update.correct_answer)
        .bind(update.explanation.as_deref())
        .bind(update.topic.as_deref())
        .bind(update.difficulty.map(|d| d.as_str()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(question_not_found)?;

        Ok(row.try_into()?)
    }

    pub async fn delete(&self, id: i64) -> Result<QuizQuestion> {
        let row = sqlx::query_as::<_, QuizQuestionRow>(&format!(
            "DELETE FROM quiz_questions WHERE id = $1 RETURNING {}",
            QUESTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(question_not_found)?;

        tracing::info!(question_id = id, "Quiz question deleted");
        Ok(row.try_into()?)
    }
}

fn question_not_found() -> Error {
    Error::not_found("NOT_FOUND", "Quiz question not found")
}

fn into_questions(rows: Vec<QuizQuestionRow>) -> Result<Vec<QuizQuestion>> {
    rows.into_iter()
        .map(|row| QuizQuestion::try_from(row).map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_values_are_ignored() {
        let filter = QuestionFilter {
            search: Some(String::new()),
            topic: Some("fractions".into()),
            difficulty: None,
        };
        assert_eq!(filter.search_pattern(), None);
        assert_eq!(filter.topic(), Some("fractions"));
        assert_eq!(filter.difficulty(), None);

        let filter = QuestionFilter {
            search: Some("half".into()),
            ..Default::default()
        };
        assert_eq!(filter.search_pattern().as_deref(), Some("%half%"));
    }
}
