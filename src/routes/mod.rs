pub mod achievements;
pub mod health;
pub mod lessons;
pub mod quiz;
pub mod quiz_attempts;
pub mod quiz_questions;
pub mod user_progress;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::middleware::{auth::require_session, rate_limit::rps_middleware};
use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        quiz_questions::list_questions,
        quiz_questions::random_questions,
        quiz_questions::get_question,
        quiz_questions::create_question,
        quiz_questions::update_question,
        quiz_questions::delete_question,
        quiz_attempts::list_attempts,
        quiz_attempts::create_attempt,
        quiz_attempts::get_stats,
        quiz::generate_info,
        quiz::generate_quiz,
        achievements::list_achievements,
        achievements::create_achievement,
        lessons::list_lessons,
        lessons::get_lesson,
        lessons::create_lesson,
        lessons::update_lesson,
        lessons::delete_lesson,
        user_progress::list_progress,
        user_progress::upsert_progress,
        user_progress::get_progress_stats,
    ),
    components(schemas(
        crate::dto::quiz_dto::QuizQuestionPayload,
        crate::dto::quiz_dto::GenerateQuizPayload,
        crate::dto::attempt_dto::CreateAttemptPayload,
        crate::dto::achievement_dto::CreateAchievementPayload,
        crate::dto::lesson_dto::LessonPayload,
        crate::dto::progress_dto::UpsertProgressPayload,
    )),
    modifiers(&BearerAuth),
    tags((name = "numbly", description = "Math practice quiz API"))
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/quiz-questions", get(quiz_questions::list_questions))
        .route(
            "/api/quiz-questions/random",
            get(quiz_questions::random_questions),
        )
        .route("/api/quiz-questions/:id", get(quiz_questions::get_question))
        .route("/api/quiz/generate", get(quiz::generate_info))
        .route("/api/lessons", get(lessons::list_lessons))
        .route("/api/lessons/:id", get(lessons::get_lesson));

    let generation = Router::new()
        .route("/api/quiz/generate", post(quiz::generate_quiz))
        .route_layer(axum::middleware::from_fn_with_state(
            state.generate_limiter.clone(),
            rps_middleware,
        ));

    let protected = Router::new()
        .route("/api/quiz-questions", post(quiz_questions::create_question))
        .route(
            "/api/quiz-questions/:id",
            axum::routing::put(quiz_questions::update_question)
                .delete(quiz_questions::delete_question),
        )
        .route(
            "/api/quiz-attempts",
            get(quiz_attempts::list_attempts).post(quiz_attempts::create_attempt),
        )
        .route("/api/quiz-attempts/stats", get(quiz_attempts::get_stats))
        .route(
            "/api/achievements",
            get(achievements::list_achievements).post(achievements::create_achievement),
        )
        .route("/api/lessons", post(lessons::create_lesson))
        .route(
            "/api/lessons/:id",
            axum::routing::put(lessons::update_lesson).delete(lessons::delete_lesson),
        )
        .route(
            "/api/user-progress",
            get(user_progress::list_progress).post(user_progress::upsert_progress),
        )
        .route(
            "/api/user-progress/stats",
            get(user_progress::get_progress_stats),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    public
        .merge(generation)
        .merge(protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
