use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: i64,
    pub user_id: String,
    pub achievement_type: String,
    pub achievement_name: String,
    pub achievement_description: String,
    pub earned_at: DateTime<Utc>,
}
