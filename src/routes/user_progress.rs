use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        attempt_dto::StatsQuery,
        page_limit, page_offset,
        progress_dto::{ListProgressQuery, UpsertProgressPayload},
        ApiJson, ApiQuery,
    },
    error::{Error, Result},
    middleware::auth::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/user-progress",
    params(ListProgressQuery),
    responses(
        (status = 200, description = "The caller's lesson progress with lesson details, in course order"),
        (status = 401, description = "Missing or invalid session")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn list_progress(
    State(state): State<AppState>,
    session: Session,
    ApiQuery(query): ApiQuery<ListProgressQuery>,
) -> Result<impl IntoResponse> {
    let progress = state
        .progress_service
        .list_for_user(
            &session.user_id,
            page_limit(query.limit, 50, 100),
            page_offset(query.offset),
        )
        .await?;
    Ok(Json(progress))
}

#[utoipa::path(
    post,
    path = "/api/user-progress",
    request_body = UpsertProgressPayload,
    responses(
        (status = 200, description = "Progress created or updated"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Lesson or user not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn upsert_progress(
    State(state): State<AppState>,
    session: Session,
    ApiJson(payload): ApiJson<UpsertProgressPayload>,
) -> Result<impl IntoResponse> {
    let new = payload.parse()?;
    let progress = state
        .progress_service
        .upsert(&session.user_id, new)
        .await?;
    Ok(Json(progress))
}

#[utoipa::path(
    get,
    path = "/api/user-progress/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Lesson completion statistics"),
        (status = 400, description = "userId missing (MISSING_USER_ID)"),
        (status = 401, description = "userId does not match the session (USER_MISMATCH)"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_progress_stats(
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

    let stats = state.progress_service.stats_for_user(&user_id).await?;
    Ok(Json(stats))
}
