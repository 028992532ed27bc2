use std::sync::Arc;

use crate::error::GenerationError;
use crate::models::generated_question::{DifficultyLevel, GeneratedQuestion, MathTopic};
use crate::services::ai_service::QuestionGenerator;

/// Question counts per difficulty tier for a progressive quiz.
///
/// Each tier is rounded on its own, so the total can exceed the requested
/// size (7 yields 3/3/2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPlan {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl TierPlan {
    pub fn for_total(total: usize) -> Self {
        let n = total as f64;
        Self {
            easy: (n * 0.3).ceil() as usize,
            medium: (n * 0.4).ceil() as usize,
            hard: (n * 0.3).floor() as usize,
        }
    }

    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }

    /// Tiers in the order they are requested.
    pub fn tiers(&self) -> [(DifficultyLevel, usize); 3] {
        [
            (DifficultyLevel::Easy, self.easy),
            (DifficultyLevel::Medium, self.medium),
            (DifficultyLevel::Hard, self.hard),
        ]
    }
}

/// Requests each non-empty tier in turn and concatenates the results.
/// The first failing tier aborts the whole quiz.
pub async fn compose_progressive(
    generator: &dyn QuestionGenerator,
    topic: MathTopic,
    total: usize,
) -> Result<Vec<GeneratedQuestion>, GenerationError> {
    let plan = TierPlan::for_total(total);
    let mut questions = Vec::with_capacity(plan.total());

    for (difficulty, count) in plan.tiers() {
        if count == 0 {
            continue;
        }
        let batch = generator.generate(topic, difficulty, count).await?;
        questions.extend(batch);
    }

    Ok(questions)
}

#[derive(Clone)]
pub struct QuizService {
    generator: Arc<dyn QuestionGenerator>,
}

impl QuizService {
    pub fn new(generator: Arc<dyn QuestionGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate(
        &self,
        topic: MathTopic,
        difficulty: DifficultyLevel,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        let questions = self.generator.generate(topic, difficulty, count).await?;
        tracing::info!(
            provider = self.generator.name(),
            %topic,
            %difficulty,
            generated = questions.len(),
            "Quiz generated"
        );
        Ok(questions)
    }

    pub async fn generate_progressive(
        &self,
        topic: MathTopic,
        total: usize,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        let plan = TierPlan::for_total(total);
        tracing::info!(
            provider = self.generator.name(),
            %topic,
            requested = total,
            easy = plan.easy,
            medium = plan.medium,
            hard = plan.hard,
            "Composing progressive quiz"
        );
        match compose_progressive(self.generator.as_ref(), topic, total).await {
            Ok(questions) => Ok(questions),
            Err(e) => {
                tracing::warn!(error = %e, %topic, "Progressive quiz aborted");
                Err(e)
            }
        }
    }
}
