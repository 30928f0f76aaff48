use crate::config::{GeneratorConfig, Provider};
use crate::error::{Result, TwingraphError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::TextGenerator;

/// Request body for the Gemini generateContent API
#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

/// Response structure from the Gemini generateContent API
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();
        Some(text)
    }
}

/// Request body for OpenAI-compatible chat completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response structure from chat completions
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}

/// HTTP text generation client
///
/// Sends one prompt per request to Gemini or an OpenAI-compatible chat API.
/// Failures (network, non-2xx status, undecodable body) are returned as
/// `TwingraphError::Generator` without retrying.
pub struct HttpGenerator {
    client: Client,
    provider: Provider,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpGenerator {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `config` - Generator section of the configuration
    /// * `api_key` - API key for the provider
    pub fn new(config: &GeneratorConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TwingraphError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            provider: config.provider.clone(),
            base_url: config.base_url().trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        match self.provider {
            Provider::Gemini => format!("{}/models/{}:generateContent", self.base_url, self.model),
            Provider::OpenAI => format!("{}/chat/completions", self.base_url),
        }
    }

    async fn gemini(&self, prompt: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TwingraphError::Generator(format!("Network error: {}", e)))?;

        let body: GeminiResponse = Self::decode(response).await?;
        body.into_text()
            .ok_or_else(|| TwingraphError::Generator("Empty response from Gemini API".to_string()))
    }

    async fn openai(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| TwingraphError::Generator(format!("Network error: {}", e)))?;

        let body: ChatResponse = Self::decode(response).await?;
        body.into_text()
            .ok_or_else(|| TwingraphError::Generator("Empty response from chat API".to_string()))
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(TwingraphError::Generator(format!(
                "API error {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TwingraphError::Generator(format!("Failed to parse response: {}", e)))
    }
}

impl TextGenerator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let text = match self.provider {
            Provider::Gemini => self.gemini(prompt).await?,
            Provider::OpenAI => self.openai(prompt).await?,
        };
        log::debug!(
            "Text generation via {:?}/{} took {:?} ({} chars)",
            self.provider,
            self.model,
            start.elapsed(),
            text.len()
        );
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: Provider, base_url: Option<&str>) -> GeneratorConfig {
        GeneratorConfig {
            provider,
            model: "test-model".to_string(),
            api_key_env: "UNUSED".to_string(),
            base_url: base_url.map(str::to_string),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_gemini_endpoint() {
        let generator = HttpGenerator::new(&config(Provider::Gemini, None), "k".to_string()).unwrap();
        assert_eq!(
            generator.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/test-model:generateContent"
        );
    }

    #[test]
    fn test_openai_endpoint_with_base_url_override() {
        let generator = HttpGenerator::new(
            &config(Provider::OpenAI, Some("http://localhost:8080/v1/")),
            "k".to_string(),
        )
        .unwrap();
        assert_eq!(generator.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_gemini_response_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"(a:A {})"},{"text":" (b:B {})"}]}}]}"#;
        let response: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().as_deref(), Some("(a:A {}) (b:B {})"));
    }

    #[test]
    fn test_gemini_response_without_candidates() {
        let response: GeminiResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert!(response.into_text().is_none());
    }

    #[test]
    fn test_chat_response_text() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Audi makes the A4."}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().as_deref(), Some("Audi makes the A4."));
    }

    #[test]
    fn test_chat_response_empty_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(response.into_text().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_generator_error() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let generator = HttpGenerator::new(
            &config(Provider::OpenAI, Some("http://127.0.0.1:9/v1")),
            "k".to_string(),
        )
        .unwrap();
        let err = generator.generate("hello").await.unwrap_err();
        assert!(matches!(err, TwingraphError::Generator(_)));
    }
}
