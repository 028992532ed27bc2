use serde::Deserialize;
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

use crate::dto::loose_int;
use crate::error::{Error, Result};

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttemptPayload {
    #[schema(value_type = Option<i64>)]
    pub quiz_question_id: Option<JsonValue>,
    #[schema(value_type = Option<i32>)]
    pub user_answer: Option<JsonValue>,
    #[schema(value_type = Option<i32>)]
    pub time_taken: Option<JsonValue>,
    /// Owner comes from the session; a body-supplied id is refused.
    #[serde(alias = "user_id")]
    #[schema(value_type = Option<String>)]
    pub user_id: Option<JsonValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewQuizAttempt {
    pub quiz_question_id: i64,
    pub user_answer: i32,
    pub time_taken: i32,
}

impl CreateAttemptPayload {
    pub fn parse(self) -> Result<NewQuizAttempt> {
        if self.user_id.is_some() {
            return Err(Error::bad_request(
                "USER_ID_NOT_ALLOWED",
                "User ID cannot be provided in request body",
            ));
        }

        let quiz_question_id = present(self.quiz_question_id).ok_or_else(|| {
            Error::bad_request("MISSING_QUIZ_QUESTION_ID", "quizQuestionId is required")
        })?;
        let user_answer = present(self.user_answer)
            .ok_or_else(|| Error::bad_request("MISSING_USER_ANSWER", "userAnswer is required"))?;
        let time_taken = present(self.time_taken)
            .ok_or_else(|| Error::bad_request("MISSING_TIME_TAKEN", "timeTaken is required"))?;

        let user_answer = loose_int(&user_answer)
            .filter(|a| (0..=3).contains(a))
            .ok_or_else(|| {
                Error::bad_request(
                    "INVALID_USER_ANSWER",
                    "userAnswer must be an integer between 0 and 3",
                )
            })?;
        let time_taken = loose_int(&time_taken)
            .filter(|t| (0..=i64::from(i32::MAX)).contains(t))
            .ok_or_else(|| {
                Error::bad_request("INVALID_TIME_TAKEN", "timeTaken must be a positive integer")
            })?;
        let quiz_question_id = loose_int(&quiz_question_id).ok_or_else(|| {
            Error::bad_request(
                "INVALID_QUIZ_QUESTION_ID",
                "quizQuestionId must be a valid integer",
            )
        })?;

        Ok(NewQuizAttempt {
            quiz_question_id,
            user_answer: user_answer as i32,
            time_taken: time_taken as i32,
        })
    }
}

fn present(value: Option<JsonValue>) -> Option<JsonValue> {
    value.filter(|v| !v.is_null())
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAttemptsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: JsonValue) -> Result<NewQuizAttempt> {
        serde_json::from_value::<CreateAttemptPayload>(value)
            .unwrap()
            .parse()
    }

    #[test]
    fn accepts_numeric_strings_like_form_input() {
        let attempt = parse(json!({ "quizQuestionId": "12", "userAnswer": "2", "timeTaken": 9 }))
            .unwrap();
        assert_eq!(
            attempt,
            NewQuizAttempt {
                quiz_question_id: 12,
                user_answer: 2,
                time_taken: 9
            }
        );
    }

    #[test]
    fn body_user_id_is_refused_in_either_spelling() {
        for key in ["userId", "user_id"] {
            let mut body = json!({ "quizQuestionId": 1, "userAnswer": 0, "timeTaken": 5 });
            body[key] = json!("someone-else");
            assert_eq!(parse(body).unwrap_err().code(), "USER_ID_NOT_ALLOWED");
        }
    }

    #[test]
    fn missing_and_invalid_fields_are_reported_in_order() {
        let cases = [
            (json!({ "userAnswer": 0, "timeTaken": 5 }), "MISSING_QUIZ_QUESTION_ID"),
            (json!({ "quizQuestionId": 1, "timeTaken": 5 }), "MISSING_USER_ANSWER"),
            (json!({ "quizQuestionId": 1, "userAnswer": null, "timeTaken": 5 }), "MISSING_USER_ANSWER"),
            (json!({ "quizQuestionId": 1, "userAnswer": 0 }), "MISSING_TIME_TAKEN"),
            (json!({ "quizQuestionId": 1, "userAnswer": 4, "timeTaken": 5 }), "INVALID_USER_ANSWER"),
            (json!({ "quizQuestionId": 1, "userAnswer": "x", "timeTaken": 5 }), "INVALID_USER_ANSWER"),
            (json!({ "quizQuestionId": 1, "userAnswer": 1, "timeTaken": -1 }), "INVALID_TIME_TAKEN"),
            (json!({ "quizQuestionId": "abc", "userAnswer": 1, "timeTaken": 3 }), "INVALID_QUIZ_QUESTION_ID"),
        ];
        for (body, code) in cases {
            assert_eq!(parse(body.clone()).unwrap_err().code(), code, "{}", body);
        }
    }
}
