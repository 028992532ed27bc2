use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use chrono::Utc;

use crate::{
    dto::{
        quiz_dto::{GenerateInfoResponse, GenerateQuizPayload, GenerateQuizResponse},
        ApiJson,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/quiz/generate",
    responses((status = 200, description = "Generation endpoint status with valid topics and difficulties"))
)]
#[axum::debug_handler]
pub async fn generate_info() -> impl IntoResponse {
    Json(GenerateInfoResponse::default())
}

#[utoipa::path(
    post,
    path = "/api/quiz/generate",
    request_body = GenerateQuizPayload,
    responses(
        (status = 200, description = "Freshly generated questions"),
        (status = 400, description = "Invalid topic, difficulty or count"),
        (status = 429, description = "Rate limited locally or by the provider"),
        (status = 500, description = "Provider misconfigured or generation failed")
    )
)]
#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GenerateQuizPayload>,
) -> Result<impl IntoResponse> {
    let request = payload.parse()?;

    let questions = if request.progressive {
        state
            .quiz_service
            .generate_progressive(request.topic, request.count)
            .await?
    } else {
        state
            .quiz_service
            .generate(request.topic, request.difficulty, request.count)
            .await?
    };

    Ok(Json(GenerateQuizResponse {
        questions,
        generated_at: Utc::now(),
    }))
}
