//! OpenAiEmbedder -- concrete [`Embedder`] implementation for the OpenAI
//! embeddings API (`/v1/embeddings`) and compatible endpoints.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output. The credential is resolved and threaded
//! in at construction; a missing key is a startup error in the CLI, never
//! a per-item failure here.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use scoutline_core::embedder::Embedder;
use scoutline_types::error::EmbedError;

/// The default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// OpenAI-compatible embedding provider.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiEmbedder {
    /// Create a new embedder.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "text-embedding-3-small")
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.openai.com".to_string(),
            model,
        }
    }

    /// Override the base URL (useful for testing, proxies, or
    /// OpenAI-compatible providers).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Advertised dimensionality based on model name. Advisory only;
    /// returned vectors are not validated against it.
    fn dimension_for_model(model: &str) -> usize {
        match model {
            "text-embedding-3-large" => 3072,
            "text-embedding-3-small" | "text-embedding-ada-002" => 1536,
            _ => 1536,
        }
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let request = EmbeddingsRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(self.url("/v1/embeddings"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbedError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "embedding request rejected");
            return Err(EmbedError::Api(format!("{status}: {body}")));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::MalformedResponse(e.to_string()))?;

        extract_vector(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        Self::dimension_for_model(&self.model)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Pull the first vector out of a response, rejecting absent or empty
/// data. An empty embedding is terminal for that item, not a crash.
fn extract_vector(response: EmbeddingsResponse) -> Result<Vec<f32>, EmbedError> {
    let vector = response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .unwrap_or_default();

    if vector.is_empty() {
        return Err(EmbedError::EmptyEmbedding);
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_vector_from_valid_response() {
        let json = r#"{"data": [{"embedding": [0.1, -0.2, 0.3]}]}"#;
        let response: EmbeddingsResponse = serde_json::from_str(json).unwrap();
        let vector = extract_vector(response).unwrap();
        assert_eq!(vector, vec![0.1, -0.2, 0.3]);
    }

    #[test]
    fn test_empty_embedding_is_rejected() {
        let json = r#"{"data": [{"embedding": []}]}"#;
        let response: EmbeddingsResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_vector(response),
            Err(EmbedError::EmptyEmbedding)
        ));
    }

    #[test]
    fn test_missing_data_is_rejected() {
        let json = r#"{"data": []}"#;
        let response: EmbeddingsResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_vector(response),
            Err(EmbedError::EmptyEmbedding)
        ));
    }

    #[test]
    fn test_request_payload_shape() {
        let request = EmbeddingsRequest {
            model: "text-embedding-3-small",
            input: "Sam Okafor. School: Westlake High",
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"model":"text-embedding-3-small","input":"Sam Okafor. School: Westlake High"}"#
        );
    }

    #[test]
    fn test_dimension_for_known_models() {
        assert_eq!(OpenAiEmbedder::dimension_for_model("text-embedding-3-small"), 1536);
        assert_eq!(OpenAiEmbedder::dimension_for_model("text-embedding-3-large"), 3072);
        assert_eq!(OpenAiEmbedder::dimension_for_model("something-else"), 1536);
    }
}
