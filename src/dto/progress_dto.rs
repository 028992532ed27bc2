use serde::Deserialize;
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

use crate::dto::{loose_int, truthy};
use crate::error::{Error, Result};

pub const COMPLETE_PROGRESS: i32 = 100;

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProgressPayload {
    #[schema(value_type = Option<i64>)]
    pub lesson_id: Option<JsonValue>,
    #[schema(value_type = Option<i32>)]
    pub progress: Option<JsonValue>,
    #[schema(value_type = Option<bool>)]
    pub completed: Option<JsonValue>,
    #[serde(alias = "user_id")]
    #[schema(value_type = Option<String>)]
    pub user_id: Option<JsonValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewProgress {
    pub lesson_id: i64,
    pub progress: i32,
    pub completed: bool,
}

impl UpsertProgressPayload {
    /// Reaching 100 marks the lesson completed whatever `completed` says.
    pub fn parse(self) -> Result<NewProgress> {
        if self.user_id.is_some() {
            return Err(Error::bad_request(
                "USER_ID_NOT_ALLOWED",
                "User ID cannot be provided in request body",
            ));
        }

        let lesson_id = self
            .lesson_id
            .filter(truthy)
            .ok_or_else(|| Error::bad_request("MISSING_LESSON_ID", "Lesson ID is required"))?;
        let lesson_id = loose_int(&lesson_id)
            .ok_or_else(|| Error::bad_request("INVALID_LESSON_ID", "Valid lesson ID is required"))?;

        let progress = match &self.progress {
            None => 0,
            Some(raw) => loose_int(raw)
                .filter(|p| (0..=i64::from(COMPLETE_PROGRESS)).contains(p))
                .ok_or_else(|| {
                    Error::bad_request("INVALID_PROGRESS", "Progress must be between 0 and 100")
                })? as i32,
        };

        let completed =
            progress >= COMPLETE_PROGRESS || self.completed.as_ref().map_or(false, truthy);

        Ok(NewProgress {
            lesson_id,
            progress,
            completed,
        })
    }
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProgressQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
