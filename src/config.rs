use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionProvider {
    OpenAi,
    Gemini,
}

impl FromStr for QuestionProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(format!("unknown question provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub question_provider: QuestionProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub generation_timeout_secs: u64,
    pub generate_rps: u32,
    pub log_format: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret: get_env("JWT_SECRET")?,
            question_provider: get_env_parse_or("QUESTION_PROVIDER", QuestionProvider::OpenAi)?,
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            gemini_api_key: env::var("GOOGLE_GENAI_API_KEY").ok(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            generation_timeout_secs: get_env_parse_or("GENERATION_TIMEOUT_SECS", 30)?,
            generate_rps: get_env_parse_or("GENERATE_RPS", 5)?,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
        };
        config.check_provider_key()?;
        Ok(config)
    }

    /// The selected provider must have its API key configured.
    fn check_provider_key(&self) -> Result<()> {
        let (key, var) = match self.question_provider {
            QuestionProvider::OpenAi => (&self.openai_api_key, "OPENAI_API_KEY"),
            QuestionProvider::Gemini => (&self.gemini_api_key, "GOOGLE_GENAI_API_KEY"),
        };
        match key {
            Some(k) if !k.trim().is_empty() => Ok(()),
            _ => Err(Error::Config(format!(
                "{} must be set for the configured question provider",
                var
            ))),
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!("OpenAI".parse::<QuestionProvider>(), Ok(QuestionProvider::OpenAi));
        assert_eq!(" gemini ".parse::<QuestionProvider>(), Ok(QuestionProvider::Gemini));
        assert!("claude".parse::<QuestionProvider>().is_err());
    }
}
