//! AI generation collaborator.
//!
//! Thin wrapper around an OpenAI-compatible chat endpoint used to draft
//! example sentences and translations. Configured via [`AssistConfig`];
//! without an API key the client is simply absent and the endpoints
//! report the feature as unavailable. Some upstream models leak a
//! quoted "Thinking..." preamble into the reply, which is stripped
//! before the text reaches the editor.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AssistConfig;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Translation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationMode {
    /// Source language -> native language
    #[default]
    Normal,
    /// Native language -> source language
    Reverse,
}

impl TranslationMode {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("reverse") => Self::Reverse,
            _ => Self::Normal,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

pub struct AssistClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl AssistClient {
    /// Build a client from config; `None` when no API key is set.
    pub fn from_config(config: &AssistConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            http: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
        })
    }

    async fn chat(&self, prompt: &str, model: Option<&str>) -> Result<String, AssistError> {
        let request = ChatRequest {
            model: model.unwrap_or(&self.model),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response: ChatResponse = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        let cleaned = clean_model_response(&content);
        if cleaned.is_empty() {
            return Err(AssistError::EmptyResponse);
        }
        Ok(cleaned)
    }

    /// Draft a simple example sentence using the exact word.
    pub async fn generate_sample(
        &self,
        word: &str,
        model: Option<&str>,
    ) -> Result<String, AssistError> {
        let prompt = format!(
            "Create a simple, natural English sentence that uses the EXACT word or phrase \
             \"{word}\" (including all words as shown). You must use \"{word}\" exactly as \
             written, not variations or partial matches. Use simple language and vocabulary \
             suitable for a high school student. Keep the sentence short and easy to \
             understand. Only output the sentence, nothing else."
        );
        self.chat(&prompt, model).await
    }

    /// Draft a translation in either direction.
    pub async fn generate_translation(
        &self,
        word: &str,
        mode: TranslationMode,
        model: Option<&str>,
    ) -> Result<String, AssistError> {
        let prompt = match mode {
            TranslationMode::Reverse => format!(
                "What is the English translation for the Chinese word '{word}'? Only list \
                 the 2 most common English words or short phrases. Separate them with a \
                 Chinese comma (\u{ff0c}). Do not include any other explanations. Ensure \
                 both words begin with lowercase letters."
            ),
            TranslationMode::Normal => format!(
                "What's the Chinese translation of '{word}'? Only list the 2 most common \
                 translations and ignore others. Separate them with a Chinese comma \
                 (\u{ff0c}). Only list the translations in Chinese characters, no other \
                 explanations or phonetics are needed."
            ),
        };
        self.chat(&prompt, model).await
    }
}

/// Strip leaked "Thinking..." preambles: everything up to and including
/// the last blockquote line, plus a bare `*Thinking...*` header line.
pub fn clean_model_response(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let lines: Vec<&str> = text.lines().collect();

    let last_quote = lines
        .iter()
        .rposition(|line| line.trim_start().starts_with('>'));
    let start = last_quote.map_or(0, |i| i + 1);
    let mut remaining = &lines[start..];

    let thinking = Regex::new(r"(?i)^[\s\*]*Thinking\.\.\.[\s\*]*$").unwrap();
    if let Some(first) = remaining.first() {
        if thinking.is_match(first) {
            remaining = &remaining[1..];
        }
    }

    let mut cleaned: Vec<&str> = Vec::new();
    for line in remaining {
        if cleaned.is_empty() && line.trim().is_empty() {
            continue;
        }
        cleaned.push(line);
    }

    cleaned.join("\n").trim().to_string()
}
