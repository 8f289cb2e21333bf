use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tripwise_graph::StateSchema;

/// Package facts pulled out of the brochure. The brochure may omit any of them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DestinationSummary {
    /// Duration of the package
    #[serde(default)]
    pub package_duration: Option<String>,
    /// Price of the package
    #[serde(default)]
    pub price: Option<String>,
    /// Hotel or accommodation details
    #[serde(default)]
    pub hotel: Option<String>,
    /// Meals information
    #[serde(default)]
    pub meals: Option<String>,
    /// Highlights of the package
    #[serde(default)]
    pub highlights: Option<Vec<String>>,
    /// Local transport details
    #[serde(default)]
    pub transport: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DestinationInfo {
    /// Whether the destination was found in the context
    pub found: bool,
    /// Name of the destination
    #[serde(default)]
    pub name: Option<String>,
    /// Summary of the package details
    #[serde(default)]
    pub summary: DestinationSummary,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Approval {
    Approved,
    Rejected,
}

impl Approval {
    pub fn is_approved(self) -> bool {
        matches!(self, Approval::Approved)
    }
}

impl fmt::Display for Approval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Approval::Approved => f.write_str("approved"),
            Approval::Rejected => f.write_str("rejected"),
        }
    }
}

/// The record threaded through one user turn and checkpointed while the
/// budget waits for approval.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TripState {
    pub query: String,
    #[serde(default)]
    pub history: String,
    #[serde(default)]
    pub casual_answer: Option<String>,
    #[serde(default)]
    pub destination_info: Option<DestinationInfo>,
    #[serde(default)]
    pub flight_info: Option<String>,
    #[serde(default)]
    pub weather_info: Option<String>,
    #[serde(default)]
    pub budget_info: Option<String>,
    #[serde(default)]
    pub itinerary: Option<String>,
    #[serde(default)]
    pub approval: Option<Approval>,
}

impl StateSchema for TripState {}

impl TripState {
    pub fn new(query: impl Into<String>, history: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            history: history.into(),
            ..Self::default()
        }
    }

    pub fn destination_found(&self) -> bool {
        self.destination_info
            .as_ref()
            .map(|info| info.found)
            .unwrap_or(false)
    }
}
