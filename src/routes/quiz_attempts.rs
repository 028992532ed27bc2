use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        attempt_dto::{CreateAttemptPayload, ListAttemptsQuery, StatsQuery},
        page_limit, page_offset, ApiJson, ApiQuery,
    },
    error::{Error, Result},
    middleware::auth::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/quiz-attempts",
    params(ListAttemptsQuery),
    responses(
        (status = 200, description = "The caller's attempts, newest first, with their questions"),
        (status = 401, description = "Missing or invalid session")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn list_attempts(
    State(state): State<AppState>,
    session: Session,
    ApiQuery(query): ApiQuery<ListAttemptsQuery>,
) -> Result<impl IntoResponse> {
    let limit = page_limit(query.limit, 50, 100);
    let offset = page_offset(query.offset);
    let attempts = state
        .attempt_service
        .list_for_user(&session.user_id, limit, offset)
        .await?;
    Ok(Json(attempts))
}

#[utoipa::path(
    post,
    path = "/api/quiz-attempts",
    request_body = CreateAttemptPayload,
    responses(
        (status = 201, description = "Attempt recorded and graded"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "User or quiz question not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn create_attempt(
    State(state): State<AppState>,
    session: Session,
    ApiJson(payload): ApiJson<CreateAttemptPayload>,
) -> Result<impl IntoResponse> {
    let new = payload.parse()?;
    let attempt = state.attempt_service.create(&session.user_id, new).await?;
    Ok((StatusCode::CREATED, Json(attempt)))
}

#[utoipa::path(
    get,
    path = "/api/quiz-attempts/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Aggregated practice statistics"),
        (status = 400, description = "userId missing (MISSING_USER_ID)"),
        (status = 401, description = "userId does not match the session (USER_MISMATCH)"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_stats(
    State(state): State<AppState>,
    session: Session,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> Result<impl IntoResponse> {
    let user_id = query
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| Error::bad_request("MISSING_USER_ID", "userId query parameter is required"))?;

    if user_id != session.user_id {
        return Err(Error::unauthorized(
            "USER_MISMATCH",
            "Statistics are only available for the signed-in user",
        ));
    }

    let stats = state.attempt_service.stats_for_user(&user_id).await?;
    Ok(Json(stats))
}
