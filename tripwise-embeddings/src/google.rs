use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tripwise_core::{Embedding, EmbeddingError};

use crate::EmbeddingProviderError;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Upper bound on requests per `batchEmbedContents` call.
const MAX_BATCH: usize = 100;

/// Gemini embeddings client used to index the brochure and embed lookups.
///
/// Every vector returned is checked against the configured dimension, which
/// is also sent as `outputDimensionality`.
#[derive(Clone)]
pub struct GoogleEmbedding {
    base_url: String,
    api_key: SecretString,
    model: String,
    dimension: usize,
    task_type: Option<String>,
    http: Client,
}

impl GoogleEmbedding {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        let model: String = model.into();
        let model = match model.strip_prefix("models/") {
            Some(bare) => bare.to_string(),
            None => model,
        };
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: SecretString::new(api_key.into()),
            model,
            dimension,
            task_type: None,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Gemini task hint, e.g. `RETRIEVAL_DOCUMENT` or `RETRIEVAL_QUERY`.
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{action}",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn content_request(&self, text: &str) -> EmbedRequest {
        EmbedRequest {
            model: format!("models/{}", self.model),
            content: Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
            task_type: self.task_type.clone(),
            output_dimensionality: Some(self.dimension),
        }
    }

    async fn call<B, T>(&self, action: &str, body: &B) -> Result<T, EmbeddingError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(action))
            .query(&[("key", self.api_key.expose_secret().as_str())])
            .json(body)
            .send()
            .await
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?;

        check_status(response)
            .await?
            .json::<T>()
            .await
            .map_err(|err| EmbeddingProviderError::InvalidResponse(err.to_string()).into())
    }

    fn sized(&self, vector: Vector) -> Result<Vec<f32>, EmbeddingError> {
        if vector.values.len() != self.dimension {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected embedding dimension {}, got {}",
                self.dimension,
                vector.values.len()
            ))
            .into());
        }
        Ok(vector.values)
    }

    async fn embed_group(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = BatchRequest {
            requests: texts.iter().map(|text| self.content_request(text)).collect(),
        };
        let reply: BatchReply = self.call("batchEmbedContents", &body).await?;

        if reply.embeddings.len() != texts.len() {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                reply.embeddings.len()
            ))
            .into());
        }
        reply
            .embeddings
            .into_iter()
            .map(|vector| self.sized(vector))
            .collect()
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest {
    model: String,
    content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<usize>,
}

#[derive(Serialize)]
struct BatchRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Deserialize)]
struct SingleReply {
    embedding: Vector,
}

#[derive(Deserialize)]
struct BatchReply {
    #[serde(default)]
    embeddings: Vec<Vector>,
}

#[derive(Deserialize)]
struct Vector {
    #[serde(alias = "value")]
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

async fn check_status(response: Response) -> Result<Response, EmbeddingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(EmbeddingError::RateLimited { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => format!("HTTP {status}: {body}"),
    };
    Err(EmbeddingProviderError::Request(message).into())
}

#[async_trait]
impl Embedding for GoogleEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let reply: SingleReply = self
            .call("embedContent", &self.content_request(text))
            .await?;
        self.sized(reply.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for group in texts.chunks(MAX_BATCH) {
            vectors.extend(self.embed_group(group).await?);
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
