use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        lesson_dto::{DeleteLessonResponse, LessonPayload, ListLessonsQuery},
        page_limit, page_offset, ApiJson, ApiPath, ApiQuery,
    },
    error::Result,
    services::lesson_service::LessonFilter,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/lessons",
    params(ListLessonsQuery),
    responses(
        (status = 200, description = "Lessons in course order"),
        (status = 400, description = "Unknown difficulty filter (INVALID_DIFFICULTY)")
    )
)]
#[axum::debug_handler]
pub async fn list_lessons(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListLessonsQuery>,
) -> Result<impl IntoResponse> {
    let filter = LessonFilter {
        difficulty: query.difficulty()?,
        search: query.search,
    };
    let lessons = state
        .lesson_service
        .list(
            &filter,
            page_limit(query.limit, 10, 100),
            page_offset(query.offset),
        )
        .await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    params(("id" = i64, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "The lesson"),
        (status = 404, description = "Lesson not found")
    )
)]
#[axum::debug_handler]
pub async fn get_lesson(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let lesson = state.lesson_service.get(id).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = LessonPayload,
    responses(
        (status = 201, description = "Lesson created"),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid session")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn create_lesson(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LessonPayload>,
) -> Result<impl IntoResponse> {
    let new = payload.into_new()?;
    let lesson = state.lesson_service.create(&new).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    put,
    path = "/api/lessons/{id}",
    params(("id" = i64, Path, description = "Lesson ID")),
    request_body = LessonPayload,
    responses(
        (status = 200, description = "Lesson updated"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Lesson not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_lesson(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<LessonPayload>,
) -> Result<impl IntoResponse> {
    let update = payload.into_update()?;
    let lesson = state.lesson_service.update(id, &update).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    params(("id" = i64, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson deleted"),
        (status = 404, description = "Lesson not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn delete_lesson(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let lesson = state.lesson_service.delete(id).await?;
    Ok(Json(DeleteLessonResponse {
        message: "Lesson deleted successfully",
        lesson,
    }))
}
