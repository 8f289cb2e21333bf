use std::marker::PhantomData;

use async_trait::async_trait;
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::{LlmResponse, ResponseFormat, Runnable, TripwiseError};

/// Passes the response text through, trimmed.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrOutputParser;

#[async_trait]
impl Runnable<LlmResponse, String> for StrOutputParser {
    async fn invoke(&self, input: LlmResponse) -> Result<String, TripwiseError> {
        Ok(input.content.trim().to_string())
    }
}

/// A type an LLM can be asked to produce as JSON.
///
/// `validate` runs after decoding and covers the rules a JSON schema cannot
/// express, e.g. "answer is required when status is CASUAL".
pub trait StructuredOutput: DeserializeOwned + JsonSchema + Send + Sync + 'static {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Decodes and validates structured LLM output into `T`.
#[derive(Clone, Debug)]
pub struct StructuredOutputParser<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for StructuredOutputParser<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: StructuredOutput> StructuredOutputParser<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON schema for `T` with every subschema inlined, ready to hand to a provider.
    pub fn response_format(&self, name: impl Into<String>) -> Result<ResponseFormat, TripwiseError> {
        let generator = SchemaSettings::draft07()
            .with(|settings| {
                settings.inline_subschemas = true;
                settings.meta_schema = None;
            })
            .into_generator();
        let schema = generator.into_root_schema_for::<T>();
        Ok(ResponseFormat {
            name: name.into(),
            schema: serde_json::to_value(schema)?,
        })
    }

    pub fn parse(&self, content: &str) -> Result<T, TripwiseError> {
        let cleaned = strip_code_fence(content);
        if cleaned.is_empty() {
            return Err(TripwiseError::ParseFailed {
                output: content.to_string(),
                reason: "empty response".to_string(),
            });
        }

        let value: T = serde_json::from_str(cleaned).map_err(|err| TripwiseError::ParseFailed {
            output: content.to_string(),
            reason: err.to_string(),
        })?;
        value.validate().map_err(|reason| TripwiseError::ParseFailed {
            output: content.to_string(),
            reason,
        })?;
        Ok(value)
    }
}

#[async_trait]
impl<T: StructuredOutput> Runnable<LlmResponse, T> for StructuredOutputParser<T> {
    async fn invoke(&self, input: LlmResponse) -> Result<T, TripwiseError> {
        self.parse(&input.content)
    }
}

// Models sometimes wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if trimmed.starts_with("```json") {
        trimmed
            .trim_start_matches("```json")
            .trim_end_matches("```")
            .trim()
    } else if trimmed.starts_with("```") {
        trimmed
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    } else {
        trimmed
    }
}
