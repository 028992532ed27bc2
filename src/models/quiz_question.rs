use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionShapeError {
    #[error("expected 4 options, got {0}")]
    OptionCount(usize),

    #[error("expected exactly one correct option, got {0}")]
    CorrectCount(usize),

    #[error("correct answer index {0} is out of range")]
    CorrectIndex(i32),

    #[error("unknown topic '{0}'")]
    UnknownTopic(String),

    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),
}

/// The four answer choices of a persisted question, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct QuestionOptions([String; OPTION_COUNT]);

impl QuestionOptions {
    pub fn new(options: [String; OPTION_COUNT]) -> Self {
        Self(options)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for QuestionOptions {
    type Error = QuestionShapeError;

    fn try_from(options: Vec<String>) -> Result<Self, Self::Error> {
        let len = options.len();
        let array: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|_| QuestionShapeError::OptionCount(len))?;
        Ok(Self(array))
    }
}

impl From<QuestionOptions> for Vec<String> {
    fn from(options: QuestionOptions) -> Self {
        options.0.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl QuestionDifficulty {
    pub const ALL: [QuestionDifficulty; 3] = [
        QuestionDifficulty::Beginner,
        QuestionDifficulty::Intermediate,
        QuestionDifficulty::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionDifficulty::Beginner => "Beginner",
            QuestionDifficulty::Intermediate => "Intermediate",
            QuestionDifficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for QuestionDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionDifficulty {
    type Err = QuestionShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| QuestionShapeError::UnknownDifficulty(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: i64,
    pub question: String,
    pub options: QuestionOptions,
    pub correct_answer: i32,
    pub explanation: String,
    pub topic: String,
    pub difficulty: QuestionDifficulty,
    pub created_at: DateTime<Utc>,
}

/// Raw `quiz_questions` row; converted into [`QuizQuestion`] once the
/// options column has been checked.
#[derive(Debug, Clone, FromRow)]
pub struct QuizQuestionRow {
    pub id: i64,
    pub question: String,
    pub options: sqlx::types::Json<Vec<String>>,
    pub correct_answer: i32,
    pub explanation: String,
    pub topic: String,
    pub difficulty: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<QuizQuestionRow> for QuizQuestion {
    type Error = QuestionShapeError;

    fn try_from(row: QuizQuestionRow) -> Result<Self, Self::Error> {
        let options = QuestionOptions::try_from(row.options.0)?;
        if !(0..OPTION_COUNT as i32).contains(&row.correct_answer) {
            return Err(QuestionShapeError::CorrectIndex(row.correct_answer));
        }
        Ok(Self {
            id: row.id,
            question: row.question,
            options,
            correct_answer: row.correct_answer,
            explanation: row.explanation,
            topic: row.topic,
            difficulty: row.difficulty.parse()?,
            created_at: row.created_at,
        })
    }
}

/// A validated question ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuizQuestion {
    pub question: String,
    pub options: QuestionOptions,
    pub correct_answer: i32,
    pub explanation: String,
    pub topic: String,
    pub difficulty: QuestionDifficulty,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(options: Vec<&str>, correct: i32, difficulty: &str) -> QuizQuestionRow {
        QuizQuestionRow {
            id: 7,
            question: "3 + 4 = ?".into(),
            options: sqlx::types::Json(options.into_iter().map(String::from).collect()),
            correct_answer: correct,
            explanation: "Count on from 3".into(),
            topic: "addition".into(),
            difficulty: difficulty.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn options_require_exactly_four_entries() {
        let three = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        assert_eq!(
            QuestionOptions::try_from(three),
            Err(QuestionShapeError::OptionCount(3))
        );

        let parsed: QuestionOptions = serde_json::from_str(r#"["5","6","7","8"]"#).unwrap();
        assert_eq!(parsed.get(2), Some("7"));
        assert!(serde_json::from_str::<QuestionOptions>(r#"["5","6"]"#).is_err());
    }

    #[test]
    fn options_serialize_as_plain_array() {
        let options = QuestionOptions::new(["a".into(), "b".into(), "c".into(), "d".into()]);
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!(["a", "b", "c", "d"])
        );
    }

    #[test]
    fn rows_are_checked_at_the_boundary() {
        let ok = QuizQuestion::try_from(row(vec!["6", "7", "8", "9"], 1, "Beginner")).unwrap();
        assert_eq!(ok.difficulty, QuestionDifficulty::Beginner);
        assert_eq!(ok.options.get(ok.correct_answer as usize), Some("7"));

        assert_eq!(
            QuizQuestion::try_from(row(vec!["6", "7"], 1, "Beginner")).unwrap_err(),
            QuestionShapeError::OptionCount(2)
        );
        assert_eq!(
            QuizQuestion::try_from(row(vec!["6", "7", "8", "9"], 4, "Beginner")).unwrap_err(),
            QuestionShapeError::CorrectIndex(4)
        );
        assert!(QuizQuestion::try_from(row(vec!["6", "7", "8", "9"], 0, "expert")).is_err());
    }

    #[test]
    fn question_serializes_camel_case() {
        let q = QuizQuestion::try_from(row(vec!["6", "7", "8", "9"], 1, "Advanced")).unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["correctAnswer"], 1);
        assert_eq!(json["difficulty"], "Advanced");
        assert!(json.get("createdAt").is_some());
    }
}
