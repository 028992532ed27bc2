use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::generated_question::{DifficultyLevel, GeneratedQuestion, MathTopic};
use crate::models::quiz_question::{NewQuizQuestion, QuestionDifficulty, QuestionOptions, OPTION_COUNT};

pub const DEFAULT_GENERATE_COUNT: i64 = 10;
pub const DEFAULT_RANDOM_COUNT: i64 = 5;
pub const MAX_QUIZ_SIZE: i64 = 20;

/// Body for creating or partially updating a stored question. Fields stay
/// loosely typed so each failure maps to its own error code.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionPayload {
    pub question: Option<String>,
    #[schema(value_type = Option<Vec<String>>)]
    pub options: Option<JsonValue>,
    #[schema(value_type = Option<i32>)]
    pub correct_answer: Option<JsonValue>,
    pub explanation: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

/// Fields to change on an existing question; `None` leaves a column as is.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QuizQuestionUpdate {
    pub question: Option<String>,
    pub options: Option<QuestionOptions>,
    pub correct_answer: Option<i32>,
    pub explanation: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<QuestionDifficulty>,
}

impl QuizQuestionUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl QuizQuestionPayload {
    pub fn into_new(self) -> Result<NewQuizQuestion> {
        let question = non_blank(self.question)
            .ok_or_else(|| Error::bad_request("MISSING_QUESTION", "Question is required and cannot be empty"))?;
        let options = match &self.options {
            Some(raw) => parse_options(raw)?,
            None => return Err(Error::bad_request("INVALID_OPTIONS_FORMAT", "Options must be an array")),
        };
        let correct_answer = match &self.correct_answer {
            Some(raw) => parse_correct_answer(raw)?,
            None => return Err(invalid_correct_answer()),
        };
        let explanation = non_blank(self.explanation).ok_or_else(|| {
            Error::bad_request("MISSING_EXPLANATION", "Explanation is required and cannot be empty")
        })?;
        let topic = non_blank(self.topic)
            .ok_or_else(|| Error::bad_request("MISSING_TOPIC", "Topic is required and cannot be empty"))?;
        let difficulty = parse_difficulty(self.difficulty.as_deref().unwrap_or(""))?;

        Ok(NewQuizQuestion {
            question,
            options,
            correct_answer,
            explanation,
            topic,
            difficulty,
        })
    }

    pub fn into_update(self) -> Result<QuizQuestionUpdate> {
        let mut update = QuizQuestionUpdate::default();

        if let Some(question) = self.question {
            update.question = Some(
                non_blank(Some(question))
                    .ok_or_else(|| Error::bad_request("INVALID_QUESTION", "Question cannot be empty"))?,
            );
        }
        if let Some(raw) = &self.options {
            update.options = Some(parse_options(raw)?);
        }
        if let Some(raw) = &self.correct_answer {
            update.correct_answer = Some(parse_correct_answer(raw)?);
        }
        if let Some(explanation) = self.explanation {
            update.explanation = Some(
                non_blank(Some(explanation))
                    .ok_or_else(|| Error::bad_request("INVALID_EXPLANATION", "Explanation cannot be empty"))?,
            );
        }
        if let Some(topic) = self.topic {
            update.topic = Some(
                non_blank(Some(topic))
                    .ok_or_else(|| Error::bad_request("INVALID_TOPIC", "Topic cannot be empty"))?,
            );
        }
        if let Some(difficulty) = self.difficulty {
            update.difficulty = Some(parse_difficulty(&difficulty)?);
        }

        Ok(update)
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_options(raw: &JsonValue) -> Result<QuestionOptions> {
    let items = raw
        .as_array()
        .ok_or_else(|| Error::bad_request("INVALID_OPTIONS_FORMAT", "Options must be an array"))?;
    if items.len() != OPTION_COUNT {
        return Err(Error::bad_request(
            "INVALID_OPTIONS_LENGTH",
            "Options must contain exactly 4 strings",
        ));
    }
    let texts: Vec<String> = items
        .iter()
        .filter_map(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect();
    QuestionOptions::try_from(texts)
        .map_err(|_| Error::bad_request("INVALID_OPTIONS_CONTENT", "All options must be non-empty strings"))
}

fn parse_correct_answer(raw: &JsonValue) -> Result<i32> {
    let index = match raw {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        _ => None,
    };
    index
        .filter(|i| (0..OPTION_COUNT as i64).contains(i))
        .map(|i| i as i32)
        .ok_or_else(invalid_correct_answer)
}

fn invalid_correct_answer() -> Error {
    Error::bad_request(
        "INVALID_CORRECT_ANSWER",
        "Correct answer must be an integer between 0 and 3",
    )
}

pub(crate) fn parse_difficulty(raw: &str) -> Result<QuestionDifficulty> {
    raw.parse().map_err(|_| {
        Error::bad_request(
            "INVALID_DIFFICULTY",
            format!(
                "Difficulty must be one of: {}",
                QuestionDifficulty::ALL.map(|d| d.as_str()).join(", ")
            ),
        )
    })
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuestionsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RandomQuestionsQuery {
    pub count: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

impl RandomQuestionsQuery {
    pub fn count(&self) -> Result<i64> {
        let count = match self.count.as_deref() {
            None | Some("") => Some(DEFAULT_RANDOM_COUNT),
            Some(raw) => crate::dto::loose_int(&JsonValue::String(raw.to_string())),
        };
        count
            .filter(|c| (1..=MAX_QUIZ_SIZE).contains(c))
            .ok_or_else(|| Error::bad_request("INVALID_COUNT", "Count must be between 1 and 20"))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizPayload {
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    #[validate(range(min = 1, max = 20, message = "Count must be between 1 and 20"))]
    pub count: Option<i64>,
    #[serde(default)]
    pub progressive: bool,
}

/// A checked generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateQuizRequest {
    pub topic: MathTopic,
    pub difficulty: DifficultyLevel,
    pub count: usize,
    pub progressive: bool,
}

impl GenerateQuizPayload {
    /// A zero count falls back to the default like an absent one.
    pub fn parse(mut self) -> Result<GenerateQuizRequest> {
        if self.count == Some(0) {
            self.count = None;
        }

        let topic = self
            .topic
            .as_deref()
            .and_then(|t| t.parse::<MathTopic>().ok())
            .ok_or_else(|| {
                Error::bad_request(
                    "INVALID_TOPIC",
                    format!(
                        "Invalid topic. Must be one of: {}",
                        MathTopic::ALL.map(|t| t.as_str()).join(", ")
                    ),
                )
            })?;

        let difficulty = match self.difficulty.as_deref() {
            None | Some("") => DifficultyLevel::Medium,
            Some(raw) => raw.parse::<DifficultyLevel>().map_err(|_| {
                Error::bad_request(
                    "INVALID_DIFFICULTY",
                    format!(
                        "Invalid difficulty. Must be one of: {}",
                        DifficultyLevel::ALL.map(|d| d.as_str()).join(", ")
                    ),
                )
            })?,
        };

        self.validate()?;
        let count = self.count.unwrap_or(DEFAULT_GENERATE_COUNT) as usize;

        Ok(GenerateQuizRequest {
            topic,
            difficulty,
            count,
            progressive: self.progressive,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizResponse {
    pub questions: Vec<GeneratedQuestion>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInfoResponse {
    pub status: &'static str,
    pub endpoint: &'static str,
    pub valid_topics: Vec<MathTopic>,
    pub valid_difficulties: Vec<DifficultyLevel>,
}

impl Default for GenerateInfoResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            endpoint: "/api/quiz/generate",
            valid_topics: MathTopic::ALL.to_vec(),
            valid_difficulties: DifficultyLevel::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteQuestionResponse<T> {
    pub message: &'static str,
    pub deleted: T,
}
