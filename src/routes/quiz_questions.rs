use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        page_limit, page_offset,
        quiz_dto::{DeleteQuestionResponse, ListQuestionsQuery, QuizQuestionPayload, RandomQuestionsQuery},
        ApiJson, ApiPath, ApiQuery,
    },
    error::Result,
    services::question_service::QuestionFilter,
    AppState,
};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[utoipa::path(
    get,
    path = "/api/quiz-questions",
    params(ListQuestionsQuery),
    responses(
        (status = 200, description = "Stored quiz questions, newest first"),
        (status = 400, description = "Malformed query string")
    )
)]
#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuestionsQuery>,
) -> Result<impl IntoResponse> {
    let limit = page_limit(query.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = page_offset(query.offset);
    let filter = QuestionFilter {
        search: query.search,
        topic: query.topic,
        difficulty: query.difficulty,
    };
    let questions = state.question_service.list(&filter, limit, offset).await?;
    Ok(Json(questions))
}

#[utoipa::path(
    get,
    path = "/api/quiz-questions/random",
    params(RandomQuestionsQuery),
    responses(
        (status = 200, description = "Random sample of stored questions"),
        (status = 400, description = "Count outside 1..=20 (INVALID_COUNT)")
    )
)]
#[axum::debug_handler]
pub async fn random_questions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RandomQuestionsQuery>,
) -> Result<impl IntoResponse> {
    let count = query.count()?;
    let filter = QuestionFilter {
        search: None,
        topic: query.topic,
        difficulty: query.difficulty,
    };
    let questions = state.question_service.random(&filter, count).await?;
    Ok(Json(questions))
}

#[utoipa::path(
    get,
    path = "/api/quiz-questions/{id}",
    params(("id" = i64, Path, description = "Quiz question ID")),
    responses(
        (status = 200, description = "The quiz question"),
        (status = 404, description = "Quiz question not found")
    )
)]
#[axum::debug_handler]
pub async fn get_question(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let question = state.question_service.get(id).await?;
    Ok(Json(question))
}

#[utoipa::path(
    post,
    path = "/api/quiz-questions",
    request_body = QuizQuestionPayload,
    responses(
        (status = 201, description = "Quiz question created"),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid session")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<QuizQuestionPayload>,
) -> Result<impl IntoResponse> {
    let new = payload.into_new()?;
    let question = state.question_service.create(&new).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[utoipa::path(
    put,
    path = "/api/quiz-questions/{id}",
    params(("id" = i64, Path, description = "Quiz question ID")),
    request_body = QuizQuestionPayload,
    responses(
        (status = 200, description = "Quiz question updated"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Quiz question not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<QuizQuestionPayload>,
) -> Result<impl IntoResponse> {
    let update = payload.into_update()?;
    let question = state.question_service.update(id, &update).await?;
    Ok(Json(question))
}

#[utoipa::path(
    delete,
    path = "/api/quiz-questions/{id}",
    params(("id" = i64, Path, description = "Quiz question ID")),
    responses(
        (status = 200, description = "Quiz question deleted"),
        (status = 404, description = "Quiz question not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let deleted = state.question_service.delete(id).await?;
    Ok(Json(DeleteQuestionResponse {
        message: "Quiz question deleted successfully",
        deleted,
    }))
}
