mod google;

pub use google::GoogleClient;
pub use tripwise_core::{Llm, LlmRequest, LlmResponse, Message, ResponseFormat, Role};
