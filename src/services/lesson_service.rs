use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::lesson::{Lesson, LessonUpdate, NewLesson};
use crate::models::quiz_question::QuestionDifficulty;

const LESSON_COLUMNS: &str =
    "id, title, description, duration, difficulty, order_index, created_at";

#[derive(Debug, Clone, Default)]
pub struct LessonFilter {
    pub search: Option<String>,
    pub difficulty: Option<QuestionDifficulty>,
}

impl LessonFilter {
    fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s))
    }
}

#[derive(Clone)]
pub struct LessonService {
    pool: PgPool,
}

impl LessonService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> Result<Lesson> {
        sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {} FROM lessons WHERE id = $1",
            LESSON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(lesson_not_found)
    }

    /// Lessons in course order.
    pub async fn list(&self, filter: &LessonFilter, limit: i64, offset: i64) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            r#"
            SELECT {}
            FROM lessons
            WHERE ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
              AND ($2::text IS NULL OR difficulty = $2)
            ORDER BY order_index ASC, id ASC
            LIMIT $3 OFFSET $4
            "#,
            LESSON_COLUMNS
        ))
        .bind(filter.search_pattern())
        .bind(filter.difficulty.map(|d| d.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(lessons)
    }

    pub async fn all(&self) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {} FROM lessons ORDER BY order_index ASC, id ASC",
            LESSON_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(lessons)
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM lessons WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, new: &NewLesson) -> Result<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            r#"
            INSERT INTO lessons (title, description, duration, difficulty, order_index)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            LESSON_COLUMNS
        ))
        .bind(&new.title)
        .bind(new.description.as_deref())
        .bind(&new.duration)
        .bind(new.difficulty.as_str())
        .bind(new.order_index)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(lesson_id = lesson.id, order_index = lesson.order_index, "Lesson created");
        Ok(lesson)
    }

    pub async fn update(&self, id: i64, update: &LessonUpdate) -> Result<Lesson> {
        if update.is_empty() {
            return self.get(id).await;
        }

        sqlx::query_as::<_, Lesson>(&format!(
            r#"
            UPDATE lessons SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                duration = COALESCE($5, duration),
                difficulty = COALESCE($6, difficulty),
                order_index = COALESCE($7, order_index)
            WHERE id = $1
            RETURNING {}
            "#,
            LESSON_COLUMNS
        ))
        .bind(id)
        .bind(update.title.as_deref())
        .bind(update.description.is_some())
        .bind(update.description.clone().flatten())
        .bind(update.duration.as_deref())
        .bind(update.difficulty.map(|d| d.as_str()))
        .bind(update.order_index)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(lesson_not_found)
    }

    pub async fn delete(&self, id: i64) -> Result<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            "DELETE FROM lessons WHERE id = $1 RETURNING {}",
            LESSON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(lesson_not_found)?;

        tracing::info!(lesson_id = id, "Lesson deleted");
        Ok(lesson)
    }
}

pub(crate) fn lesson_not_found() -> Error {
    Error::not_found("LESSON_NOT_FOUND", "Lesson not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_matches_substrings_and_ignores_blank() {
        let filter = LessonFilter {
            search: Some("fraction".into()),
            difficulty: None,
        };
        assert_eq!(filter.search_pattern().as_deref(), Some("%fraction%"));
        assert_eq!(LessonFilter::default().search_pattern(), None);
        assert_eq!(
            LessonFilter {
                search: Some(String::new()),
                ..Default::default()
            }
            .search_pattern(),
            None
        );
    }
}
