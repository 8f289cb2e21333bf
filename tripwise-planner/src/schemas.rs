use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tripwise_core::StructuredOutput;

use crate::DestinationInfo;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteStatus {
    Planning,
    Casual,
}

/// Intent classification returned by the router.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RouterDecision {
    /// Either 'PLANNING' or 'CASUAL'
    pub status: RouteStatus,
    /// If status is 'CASUAL', a natural reply. If 'PLANNING', null
    #[serde(default)]
    pub answer: Option<String>,
}

impl StructuredOutput for RouterDecision {
    fn validate(&self) -> Result<(), String> {
        let has_answer = self
            .answer
            .as_deref()
            .map(|answer| !answer.trim().is_empty())
            .unwrap_or(false);
        match self.status {
            RouteStatus::Casual if !has_answer => {
                Err("CASUAL decision without an answer".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl StructuredOutput for DestinationInfo {
    fn validate(&self) -> Result<(), String> {
        let named = self
            .name
            .as_deref()
            .map(|name| !name.trim().is_empty())
            .unwrap_or(false);
        if self.found && !named {
            return Err("destination marked found without a name".to_string());
        }
        Ok(())
    }
}
