use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

use crate::dto::nullable;
use crate::dto::quiz_dto::{non_blank, parse_difficulty};
use crate::error::{Error, Result};
use crate::models::lesson::{LessonUpdate, NewLesson};
use crate::models::quiz_question::QuestionDifficulty;

/// Body for creating or partially updating a lesson.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonPayload {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub duration: Option<String>,
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub order_index: Option<Option<JsonValue>>,
}

impl LessonPayload {
    pub fn into_new(self) -> Result<NewLesson> {
        let title = non_blank(self.title).ok_or_else(|| {
            Error::bad_request("MISSING_TITLE", "Title is required and cannot be empty")
        })?;
        let duration = non_blank(self.duration)
            .ok_or_else(|| Error::bad_request("MISSING_DURATION", "Duration is required"))?;
        let difficulty = match self.difficulty.as_deref() {
            None | Some("") => {
                return Err(Error::bad_request("MISSING_DIFFICULTY", "Difficulty is required"))
            }
            Some(raw) => parse_difficulty(raw)?,
        };
        let order_index = match self.order_index.flatten() {
            Some(raw) => parse_order_index(&raw)?,
            None => {
                return Err(Error::bad_request(
                    "MISSING_ORDER_INDEX",
                    "Order index is required",
                ))
            }
        };

        Ok(NewLesson {
            title,
            description: non_blank(self.description.flatten()),
            duration,
            difficulty,
            order_index,
        })
    }

    pub fn into_update(self) -> Result<LessonUpdate> {
        let mut update = LessonUpdate::default();

        if let Some(title) = self.title {
            update.title = Some(
                non_blank(Some(title))
                    .ok_or_else(|| Error::bad_request("INVALID_TITLE", "Title cannot be empty"))?,
            );
        }
        if let Some(difficulty) = self.difficulty {
            update.difficulty = Some(parse_difficulty(&difficulty)?);
        }
        if let Some(raw) = self.order_index {
            let raw = raw.ok_or_else(invalid_order_index)?;
            update.order_index = Some(parse_order_index(&raw)?);
        }
        if let Some(duration) = self.duration {
            update.duration = Some(
                non_blank(Some(duration))
                    .ok_or_else(|| Error::bad_request("INVALID_DURATION", "Duration cannot be empty"))?,
            );
        }
        if let Some(description) = self.description {
            update.description = Some(non_blank(description));
        }

        Ok(update)
    }
}

fn parse_order_index(raw: &JsonValue) -> Result<i32> {
    let index = match raw {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        _ => None,
    };
    index
        .and_then(|i| i32::try_from(i).ok())
        .ok_or_else(invalid_order_index)
}

fn invalid_order_index() -> Error {
    Error::bad_request("INVALID_ORDER_INDEX", "Order index must be a valid number")
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLessonsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
    pub difficulty: Option<String>,
}

impl ListLessonsQuery {
    pub fn difficulty(&self) -> Result<Option<QuestionDifficulty>> {
        match self.difficulty.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => parse_difficulty(raw).map(Some),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteLessonResponse<T> {
    pub message: &'static str,
    pub lesson: T,
}
