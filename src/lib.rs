pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use crate::config::QuestionProvider;
use crate::error::{Error, Result};
use crate::middleware::rate_limit::RateLimiter;
use crate::services::{
    achievement_service::AchievementService,
    ai_service::{GeminiGenerator, OpenAiGenerator, QuestionGenerator},
    attempt_service::AttemptService,
    lesson_service::LessonService,
    progress_service::ProgressService,
    question_service::QuestionService,
    quiz_service::QuizService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub jwt_secret: Arc<str>,
    pub generate_limiter: RateLimiter,
    pub question_service: QuestionService,
    pub attempt_service: AttemptService,
    pub achievement_service: AchievementService,
    pub quiz_service: QuizService,
    pub lesson_service: LessonService,
    pub progress_service: ProgressService,
}

impl AppState {
    /// Wires services from the global configuration.
    pub fn new(pool: PgPool) -> Result<Self> {
        let config = crate::config::get_config();
        let timeout = Duration::from_secs(config.generation_timeout_secs);
        let http_client = Client::builder().timeout(timeout).build()?;

        let generator: Arc<dyn QuestionGenerator> = match config.question_provider {
            QuestionProvider::OpenAi => {
                let key = config
                    .openai_api_key
                    .clone()
                    .ok_or_else(|| Error::Config("OPENAI_API_KEY is not set".to_string()))?;
                Arc::new(OpenAiGenerator::new(
                    key,
                    config.openai_model.clone(),
                    http_client,
                    timeout,
                ))
            }
            QuestionProvider::Gemini => {
                let key = config
                    .gemini_api_key
                    .clone()
                    .ok_or_else(|| Error::Config("GOOGLE_GENAI_API_KEY is not set".to_string()))?;
                Arc::new(GeminiGenerator::new(
                    key,
                    config.gemini_model.clone(),
                    http_client,
                    timeout,
                ))
            }
        };
        tracing::info!(provider = generator.name(), "Question generator configured");

        Ok(Self::from_parts(
            pool,
            generator,
            &config.jwt_secret,
            config.generate_rps,
        ))
    }

    pub fn from_parts(
        pool: PgPool,
        generator: Arc<dyn QuestionGenerator>,
        jwt_secret: &str,
        generate_rps: u32,
    ) -> Self {
        Self {
            question_service: QuestionService::new(pool.clone()),
            attempt_service: AttemptService::new(pool.clone()),
            achievement_service: AchievementService::new(pool.clone()),
            lesson_service: LessonService::new(pool.clone()),
            progress_service: ProgressService::new(pool),
            quiz_service: QuizService::new(generator),
            jwt_secret: Arc::from(jwt_secret),
            generate_limiter: RateLimiter::new(generate_rps),
        }
    }
}
