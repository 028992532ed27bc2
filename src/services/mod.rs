pub mod achievement_service;
pub mod ai_service;
pub mod attempt_service;
pub mod lesson_service;
pub mod progress_service;
pub mod question_service;
pub mod quiz_service;
pub mod stats_service;
