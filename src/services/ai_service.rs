use crate::error::GenerationError;
use crate::models::generated_question::{
    default_option_id, DifficultyLevel, GeneratedQuestion, MathTopic, QuizOption,
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value as JsonValue;
use std::time::Duration;

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const SYSTEM_PROMPT: &str = "You are an expert math teacher creating educational quiz questions \
for students learning mathematics. Always respond with valid JSON.";

/// Produces multiple-choice questions for a topic and difficulty.
///
/// Implementations return exactly `count` questions, each with four options
/// and a single correct one, or fail without partial output.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        topic: MathTopic,
        difficulty: DifficultyLevel,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError>;

    fn name(&self) -> &'static str;
}

/// OpenAI chat completions in JSON-object response mode.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, model: String, client: Client, timeout: Duration) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: OPENAI_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn chat_openai(&self, payload: JsonValue) -> Result<JsonValue, GenerationError> {
        let res = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let res = check_status(res).await?;
        let body: JsonValue = res.json().await.map_err(transport_error)?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .and_then(|s| serde_json::from_str(s).ok())
            .ok_or_else(|| GenerationError::Service("Invalid response format from OpenAI".into()))
    }
}

#[async_trait]
impl QuestionGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        topic: MathTopic,
        difficulty: DifficultyLevel,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        tracing::info!(provider = "openai", %topic, %difficulty, count, "Generating quiz questions");

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": build_prompt(topic, difficulty, count)}
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.8,
            "max_tokens": 4000
        });

        let reply = self.chat_openai(payload).await?;
        sanitize_questions(&reply, topic, difficulty, count)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Gemini generateContent with the JSON shape described in the prompt text.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiGenerator {
    pub fn new(api_key: String, model: String, client: Client, timeout: Duration) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate_content(&self, prompt: String) -> Result<String, GenerationError> {
        let payload = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.8, "maxOutputTokens": 4000 }
        });

        let res = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let res = check_status(res).await?;
        let body: JsonValue = res.json().await.map_err(transport_error)?;

        let text: String = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::Service(
                "No response content from Gemini".into(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl QuestionGenerator for GeminiGenerator {
    async fn generate(
        &self,
        topic: MathTopic,
        difficulty: DifficultyLevel,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        tracing::info!(provider = "gemini", %topic, %difficulty, count, "Generating quiz questions");

        let text = self
            .generate_content(build_prompt(topic, difficulty, count))
            .await?;
        let reply = extract_json_object(&text).ok_or_else(|| {
            GenerationError::Service("Gemini reply did not contain a JSON object".into())
        })?;
        sanitize_questions(&reply, topic, difficulty, count)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

pub fn build_prompt(topic: MathTopic, difficulty: DifficultyLevel, count: usize) -> String {
    format!(
        r#"Generate exactly {count} unique multiple-choice math quiz questions on {topic}.

Topic focus: {focus}
Difficulty level: {level}

Requirements:
- Each question must have exactly 4 options (A, B, C, D)
- Only ONE option should be correct
- All incorrect options should be plausible (common mistakes students make)
- Questions should be clear and unambiguous
- Include step-by-step explanations that help students understand the concept
- Use whole numbers for answers to keep it simple
- Make questions engaging and appropriate for the difficulty level
- For word problems, use relatable scenarios (school, sports, shopping, etc.)
- Vary the question format (direct calculation, word problems, comparison)

Return a JSON object with this exact structure:
{{
  "questions": [
    {{
      "id": "unique-id",
      "question": "Question text",
      "topic": "{topic}",
      "difficulty": "{difficulty}",
      "options": [
        {{ "id": "A", "text": "Answer A", "isCorrect": false }},
        {{ "id": "B", "text": "Answer B", "isCorrect": true }},
        {{ "id": "C", "text": "Answer C", "isCorrect": false }},
        {{ "id": "D", "text": "Answer D", "isCorrect": false }}
      ],
      "correctAnswerExplanation": "Step-by-step explanation"
    }}
  ]
}}"#,
        count = count,
        topic = topic,
        difficulty = difficulty,
        focus = topic.description(),
        level = difficulty.descriptor(),
    )
}

async fn check_status(res: Response) -> Result<Response, GenerationError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let text = res.text().await.unwrap_or_default();
    tracing::warn!(%status, body = %text, "Question provider returned an error");
    Err(status_error(status, &text))
}

fn status_error(status: StatusCode, body: &str) -> GenerationError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::AuthInvalid,
        _ => GenerationError::Service(format!("provider returned {}: {}", status, body)),
    }
}

fn transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Service("request to question provider timed out".into())
    } else {
        GenerationError::Service(err.to_string())
    }
}

/// Pulls the outermost JSON object out of free-form model text, tolerating
/// code fences and surrounding prose.
pub fn extract_json_object(text: &str) -> Option<JsonValue> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<JsonValue>(trimmed) {
        return Some(value);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

/// Coerces a provider reply into exactly `count` well-formed questions.
pub fn sanitize_questions(
    raw: &JsonValue,
    topic: MathTopic,
    difficulty: DifficultyLevel,
    count: usize,
) -> Result<Vec<GeneratedQuestion>, GenerationError> {
    let items = raw
        .get("questions")
        .and_then(|a| a.as_array())
        .or_else(|| raw.as_array())
        .ok_or_else(|| GenerationError::Service("Invalid response format: no questions".into()))?;

    let mut questions: Vec<GeneratedQuestion> = items
        .iter()
        .filter_map(|v| coerce_question(v, topic, difficulty))
        .collect();

    if questions.len() < count {
        return Err(GenerationError::Service(format!(
            "expected {} questions, provider returned {} usable",
            count,
            questions.len()
        )));
    }
    questions.truncate(count);
    Ok(questions)
}

fn coerce_question(
    v: &JsonValue,
    topic: MathTopic,
    difficulty: DifficultyLevel,
) -> Option<GeneratedQuestion> {
    let question = v.get("question").and_then(|s| s.as_str())?.trim().to_string();
    if question.is_empty() {
        return None;
    }

    let options: Vec<QuizOption> = v
        .get("options")
        .and_then(|o| o.as_array())?
        .iter()
        .enumerate()
        .map(|(i, o)| QuizOption {
            id: o
                .get("id")
                .and_then(|s| s.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| default_option_id(i)),
            text: o
                .get("text")
                .and_then(|s| s.as_str())
                .or_else(|| o.as_str())
                .unwrap_or("")
                .trim()
                .to_string(),
            is_correct: o.get("isCorrect").and_then(|b| b.as_bool()).unwrap_or(false),
        })
        .collect();

    let id = v
        .get("id")
        .and_then(|s| s.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let candidate = GeneratedQuestion {
        id,
        question,
        topic,
        difficulty,
        options,
        correct_answer_explanation: v
            .get("correctAnswerExplanation")
            .or_else(|| v.get("explanation"))
            .and_then(|s| s.as_str())
            .unwrap_or("")
            .to_string(),
    };

    match candidate.correct_index() {
        Ok(_) if candidate.options.iter().all(|o| !o.text.is_empty()) => Some(candidate),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "Dropping malformed generated question");
            None
        }
    }
}
