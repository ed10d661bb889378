use serde::Serialize;
use tracing::debug;

use crate::config::{Difficulty, ProviderConfig};
use crate::provider::response::{clean_prose, extract_candidate_text, parse_word_list};
use crate::provider::{CoachingRequest, PracticeTextRequest, ProviderError, TextProvider, prompt};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

/// Google Gemini `generateContent` over blocking HTTP.
pub struct GeminiProvider {
    #[cfg(feature = "network")]
    client: reqwest::blocking::Client,
    url: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent",
            config.endpoint.trim_end_matches('/'),
            config.model
        );

        #[cfg(feature = "network")]
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        Ok(Self {
            #[cfg(feature = "network")]
            client,
            url,
            api_key,
        })
    }

    fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        };
        debug!(url = %self.url, prompt_len = prompt.len(), "sending generateContent request");
        let raw = self.post(&body)?;
        extract_candidate_text(&raw)
    }

    #[cfg(feature = "network")]
    fn post(&self, body: &GenerateRequest<'_>) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        response
            .text()
            .map_err(|e| ProviderError::Http(e.to_string()))
    }

    #[cfg(not(feature = "network"))]
    fn post(&self, _body: &GenerateRequest<'_>) -> Result<String, ProviderError> {
        let _ = &self.api_key;
        Err(ProviderError::Offline)
    }
}

impl TextProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn practice_text(&self, request: &PracticeTextRequest) -> Result<String, ProviderError> {
        let raw = self.generate(&prompt::practice_text(request), 0.9)?;
        clean_prose(&raw)
    }

    fn coaching_tip(&self, request: &CoachingRequest) -> Result<String, ProviderError> {
        let raw = self.generate(&prompt::coaching_tip(request), 0.7)?;
        clean_prose(&raw)
    }

    fn practice_words(
        &self,
        count: usize,
        difficulty: Difficulty,
    ) -> Result<Vec<String>, ProviderError> {
        let raw = self.generate(&prompt::practice_words(count, difficulty), 1.0)?;
        parse_word_list(&raw, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_from_config() {
        let config = ProviderConfig {
            endpoint: "https://example.test/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            ..ProviderConfig::default()
        };
        let provider = GeminiProvider::new(&config, "key".to_string()).unwrap();
        assert_eq!(
            provider.url,
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: "hi" }],
            }],
            generation_config: GenerationConfig { temperature: 0.5 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }
}
