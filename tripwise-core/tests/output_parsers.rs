use schemars::JsonSchema;
use serde::Deserialize;
use tripwise_core::{
    LlmResponse, Runnable, StrOutputParser, StructuredOutput, StructuredOutputParser,
    TripwiseError,
};

#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
struct Verdict {
    status: String,
    answer: Option<String>,
}

impl StructuredOutput for Verdict {
    fn validate(&self) -> Result<(), String> {
        if self.status == "CASUAL" && self.answer.is_none() {
            return Err("CASUAL verdict without an answer".to_string());
        }
        Ok(())
    }
}

#[tokio::test]
async fn str_parser_trims_content() {
    let response = LlmResponse {
        content: "  Hello from the model\n".to_string(),
    };
    let output = StrOutputParser.invoke(response).await.unwrap();
    assert_eq!(output, "Hello from the model");
}

#[tokio::test]
async fn structured_parser_decodes_fenced_json() {
    let parser = StructuredOutputParser::<Verdict>::new();
    let response = LlmResponse {
        content: "```json\n{\"status\": \"CASUAL\", \"answer\": \"hi\"}\n```".to_string(),
    };
    let verdict = parser.invoke(response).await.unwrap();
    assert_eq!(
        verdict,
        Verdict {
            status: "CASUAL".to_string(),
            answer: Some("hi".to_string()),
        }
    );
}

#[test]
fn structured_parser_rejects_invalid_json() {
    let parser = StructuredOutputParser::<Verdict>::new();
    let err = parser.parse("not json").unwrap_err();
    assert!(matches!(err, TripwiseError::ParseFailed { .. }));
}

#[test]
fn structured_parser_rejects_empty_content() {
    let parser = StructuredOutputParser::<Verdict>::new();
    let err = parser.parse("   ").unwrap_err();
    match err {
        TripwiseError::ParseFailed { reason, .. } => assert_eq!(reason, "empty response"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn structured_parser_runs_type_validation() {
    let parser = StructuredOutputParser::<Verdict>::new();
    let err = parser.parse(r#"{"status": "CASUAL", "answer": null}"#).unwrap_err();
    match err {
        TripwiseError::ParseFailed { reason, .. } => {
            assert!(reason.contains("without an answer"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn response_format_inlines_schema() {
    let parser = StructuredOutputParser::<Verdict>::new();
    let format = parser.response_format("verdict").unwrap();
    assert_eq!(format.name, "verdict");
    assert_eq!(format.schema["type"], "object");
    assert!(format.schema["properties"]["status"].is_object());
    assert!(format.schema.get("$schema").is_none());
}
