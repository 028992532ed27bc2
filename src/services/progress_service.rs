use sqlx::PgPool;

use crate::dto::progress_dto::NewProgress;
use crate::error::{Error, Result};
use crate::models::progress::{ProgressLessonRow, ProgressStats, ProgressWithLesson, UserProgress};
use crate::services::lesson_service::{lesson_not_found, LessonService};
use crate::services::stats_service::StatsService;

const PROGRESS_COLUMNS: &str =
    "id, user_id, lesson_id, progress, completed, last_accessed, created_at, updated_at";

#[derive(Clone)]
pub struct ProgressService {
    pool: PgPool,
    lessons: LessonService,
}

impl ProgressService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            lessons: LessonService::new(pool.clone()),
            pool,
        }
    }

    /// The user's progress rows with their lessons, in course order.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProgressWithLesson>> {
        let rows = sqlx::query_as::<_, ProgressLessonRow>(
            r#"
            SELECT p.id, p.user_id, p.lesson_id, p.progress, p.completed,
                   p.last_accessed, p.created_at, p.updated_at,
                   l.title, l.description, l.duration, l.difficulty, l.order_index
            FROM user_progress p
            INNER JOIN lessons l ON l.id = p.lesson_id
            WHERE p.user_id = $1
            ORDER BY l.order_index ASC, p.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ProgressWithLesson::from).collect())
    }

    /// Creates or overwrites the user's row for the lesson and stamps the
    /// access time.
    pub async fn upsert(&self, user_id: &str, new: NewProgress) -> Result<UserProgress> {
        if !self.lessons.exists(new.lesson_id).await? {
            return Err(lesson_not_found());
        }

        let result = sqlx::query_as::<_, UserProgress>(&format!(
            r#"
            INSERT INTO user_progress (user_id, lesson_id, progress, completed)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                progress = EXCLUDED.progress,
                completed = EXCLUDED.completed,
                last_accessed = NOW(),
                updated_at = NOW()
            RETURNING {}
            "#,
            PROGRESS_COLUMNS
        ))
        .bind(user_id)
        .bind(new.lesson_id)
        .bind(new.progress)
        .bind(new.completed)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(progress) => {
                tracing::info!(
                    user_id,
                    lesson_id = progress.lesson_id,
                    progress = progress.progress,
                    completed = progress.completed,
                    "Lesson progress saved"
                );
                Ok(progress)
            }
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(Error::not_found("USER_NOT_FOUND", "User not found"))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn stats_for_user(&self, user_id: &str) -> Result<ProgressStats> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(Error::not_found("USER_NOT_FOUND", "User not found"));
        }

        let lessons = self.lessons.all().await?;
        let progress = sqlx::query_as::<_, UserProgress>(&format!(
            "SELECT {} FROM user_progress WHERE user_id = $1 ORDER BY id ASC",
            PROGRESS_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(StatsService::summarize_progress(&lessons, &progress))
    }
}
