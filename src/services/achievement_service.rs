use sqlx::PgPool;

use crate::dto::achievement_dto::NewAchievement;
use crate::error::{Error, Result};
use crate::models::achievement::Achievement;

#[derive(Clone)]
pub struct AchievementService {
    pool: PgPool,
}

impl AchievementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Achievement>> {
        let achievements = sqlx::query_as::<_, Achievement>(
            r#"
            SELECT id, user_id, achievement_type, achievement_name, achievement_description, earned_at
            FROM achievements
            WHERE user_id = $1
            ORDER BY earned_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(achievements)
    }

    /// Awards an achievement once per (user, type).
    pub async fn create(&self, user_id: &str, new: &NewAchievement) -> Result<Achievement> {
        let result = sqlx::query_as::<_, Achievement>(
            r#"
            INSERT INTO achievements (user_id, achievement_type, achievement_name, achievement_description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, achievement_type, achievement_name, achievement_description, earned_at
            "#,
        )
        .bind(user_id)
        .bind(&new.achievement_type)
        .bind(&new.achievement_name)
        .bind(&new.achievement_description)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(achievement) => {
                tracing::info!(
                    user_id,
                    achievement_type = %achievement.achievement_type,
                    "Achievement earned"
                );
                Ok(achievement)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(Error::conflict(
                "DUPLICATE_ACHIEVEMENT",
                "Achievement already earned",
            )),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(Error::not_found("USER_NOT_FOUND", "User not found"))
            }
            Err(e) => Err(e.into()),
        }
    }
}
