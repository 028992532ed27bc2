use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::quiz_question::{
    NewQuizQuestion, QuestionDifficulty, QuestionOptions, QuestionShapeError, QuizQuestion,
    OPTION_COUNT,
};

const OPTION_IDS: [&str; OPTION_COUNT] = ["A", "B", "C", "D"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathTopic {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Fractions,
    Decimals,
    Mixed,
}

impl MathTopic {
    pub const ALL: [MathTopic; 7] = [
        MathTopic::Addition,
        MathTopic::Subtraction,
        MathTopic::Multiplication,
        MathTopic::Division,
        MathTopic::Fractions,
        MathTopic::Decimals,
        MathTopic::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MathTopic::Addition => "addition",
            MathTopic::Subtraction => "subtraction",
            MathTopic::Multiplication => "multiplication",
            MathTopic::Division => "division",
            MathTopic::Fractions => "fractions",
            MathTopic::Decimals => "decimals",
            MathTopic::Mixed => "mixed",
        }
    }

    /// Prompt text describing what the topic covers.
    pub fn description(&self) -> &'static str {
        match self {
            MathTopic::Addition => "Adding numbers together, sum calculations, combining quantities",
            MathTopic::Subtraction => {
                "Taking away numbers, difference calculations, comparing quantities"
            }
            MathTopic::Multiplication => {
                "Repeated addition, product calculations, scaling quantities"
            }
            MathTopic::Division => {
                "Splitting into equal parts, quotient calculations, sharing quantities"
            }
            MathTopic::Fractions => {
                "Parts of a whole, numerator and denominator, fraction operations"
            }
            MathTopic::Decimals => "Decimal numbers, place value, decimal operations",
            MathTopic::Mixed => {
                "Combination of addition, subtraction, multiplication, and division"
            }
        }
    }
}

impl fmt::Display for MathTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MathTopic {
    type Err = QuestionShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| QuestionShapeError::UnknownTopic(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
        }
    }

    pub fn descriptor(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => {
                "Basic concepts, simple calculations, single-digit or small numbers (suitable for elementary level)"
            }
            DifficultyLevel::Medium => {
                "Multi-step problems, two-digit numbers, application of concepts (suitable for middle school level)"
            }
            DifficultyLevel::Hard => {
                "Complex problems, large numbers, word problems requiring critical thinking (suitable for advanced level)"
            }
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = QuestionShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| QuestionShapeError::UnknownDifficulty(s.to_string()))
    }
}

impl From<DifficultyLevel> for QuestionDifficulty {
    fn from(level: DifficultyLevel) -> Self {
        match level {
            DifficultyLevel::Easy => QuestionDifficulty::Beginner,
            DifficultyLevel::Medium => QuestionDifficulty::Intermediate,
            DifficultyLevel::Hard => QuestionDifficulty::Advanced,
        }
    }
}

impl From<QuestionDifficulty> for DifficultyLevel {
    fn from(difficulty: QuestionDifficulty) -> Self {
        match difficulty {
            QuestionDifficulty::Beginner => DifficultyLevel::Easy,
            QuestionDifficulty::Intermediate => DifficultyLevel::Medium,
            QuestionDifficulty::Advanced => DifficultyLevel::Hard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

/// A question produced by a generation provider. Not persisted unless it is
/// converted into a [`NewQuizQuestion`] and inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub id: String,
    pub question: String,
    pub topic: MathTopic,
    pub difficulty: DifficultyLevel,
    pub options: Vec<QuizOption>,
    pub correct_answer_explanation: String,
}

impl GeneratedQuestion {
    /// Position of the single correct option.
    pub fn correct_index(&self) -> Result<usize, QuestionShapeError> {
        if self.options.len() != OPTION_COUNT {
            return Err(QuestionShapeError::OptionCount(self.options.len()));
        }
        let correct: Vec<usize> = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_correct)
            .map(|(i, _)| i)
            .collect();
        match correct.as_slice() {
            [index] => Ok(*index),
            other => Err(QuestionShapeError::CorrectCount(other.len())),
        }
    }
}

impl TryFrom<&GeneratedQuestion> for NewQuizQuestion {
    type Error = QuestionShapeError;

    fn try_from(q: &GeneratedQuestion) -> Result<Self, Self::Error> {
        let correct = q.correct_index()?;
        let texts: Vec<String> = q.options.iter().map(|o| o.text.clone()).collect();
        Ok(NewQuizQuestion {
            question: q.question.clone(),
            options: QuestionOptions::try_from(texts)?,
            correct_answer: correct as i32,
            explanation: q.correct_answer_explanation.clone(),
            topic: q.topic.as_str().to_string(),
            difficulty: q.difficulty.into(),
        })
    }
}

impl TryFrom<&QuizQuestion> for GeneratedQuestion {
    type Error = QuestionShapeError;

    fn try_from(q: &QuizQuestion) -> Result<Self, Self::Error> {
        let correct = usize::try_from(q.correct_answer)
            .ok()
            .filter(|i| *i < OPTION_COUNT)
            .ok_or(QuestionShapeError::CorrectIndex(q.correct_answer))?;
        let options = q
            .options
            .as_slice()
            .iter()
            .zip(OPTION_IDS)
            .enumerate()
            .map(|(i, (text, id))| QuizOption {
                id: id.to_string(),
                text: text.clone(),
                is_correct: i == correct,
            })
            .collect();
        Ok(GeneratedQuestion {
            id: q.id.to_string(),
            question: q.question.clone(),
            topic: q.topic.parse()?,
            difficulty: q.difficulty.into(),
            options,
            correct_answer_explanation: q.explanation.clone(),
        })
    }
}

pub fn default_option_id(index: usize) -> String {
    OPTION_IDS
        .get(index)
        .map(|s| s.to_string())
        .unwrap_or_else(|| (index + 1).to_string())
}
