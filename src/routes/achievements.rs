use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        achievement_dto::{CreateAchievementPayload, ListAchievementsQuery},
        page_limit, page_offset, ApiJson, ApiQuery,
    },
    error::Result,
    middleware::auth::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/achievements",
    params(ListAchievementsQuery),
    responses(
        (status = 200, description = "The caller's achievements, most recent first"),
        (status = 401, description = "Missing or invalid session")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn list_achievements(
    State(state): State<AppState>,
    session: Session,
    ApiQuery(query): ApiQuery<ListAchievementsQuery>,
) -> Result<impl IntoResponse> {
    let achievements = state
        .achievement_service
        .list_for_user(
            &session.user_id,
            page_limit(query.limit, 50, 100),
            page_offset(query.offset),
        )
        .await?;
    Ok(Json(achievements))
}

#[utoipa::path(
    post,
    path = "/api/achievements",
    request_body = CreateAchievementPayload,
    responses(
        (status = 201, description = "Achievement awarded"),
        (status = 400, description = "Missing achievement fields"),
        (status = 409, description = "Achievement already earned")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn create_achievement(
    State(state): State<AppState>,
    session: Session,
    ApiJson(payload): ApiJson<CreateAchievementPayload>,
) -> Result<impl IntoResponse> {
    let new = payload.parse()?;
    let achievement = state
        .achievement_service
        .create(&session.user_id, &new)
        .await?;
    Ok((StatusCode::CREATED, Json(achievement)))
}
