#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tripwise_core::{
    LlmRequest, LlmResponse, RetryPolicy, Role, Runnable, SimilaritySearch, TripwiseError,
};
use tripwise_planner::{
    DestinationInfo, FlightLookup, PlannerConfig, PlannerContext, WeatherLookup,
};

pub const ROME_PLANNING: &str = r#"{"status":"PLANNING","answer":null}"#;
pub const ROME_FOUND: &str = r#"{
  "found": true,
  "name": "Rome",
  "summary": {
    "package_duration": "5 days",
    "price": "$1500",
    "hotel": "3-star hotel near Termini",
    "meals": "breakfast included",
    "highlights": ["Colosseum", "Vatican Museums"],
    "transport": "metro pass"
  }
}"#;
pub const NOT_FOUND: &str = r#"{"found":false,"name":null,"summary":{"package_duration":null,"price":null,"hotel":null,"meals":null,"highlights":null,"transport":null}}"#;
pub const BUDGET: &str = "For a 5-day trip to Rome the estimated budget is around $3,900. Would you like to proceed?";
pub const ITINERARY: &str = "Day 1: Colosseum. Day 2: Vatican Museums.";

/// Answers each workflow step from a script and records every request.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<HashMap<&'static str, Result<String, String>>>,
    requests: Mutex<Vec<(&'static str, LlmRequest)>>,
}

fn step_of(request: &LlmRequest) -> &'static str {
    match request.response_format.as_ref().map(|format| format.name.as_str()) {
        Some("router_decision") => "router",
        Some("destination_info") => "destination",
        _ => {
            let system = request
                .messages
                .iter()
                .find(|message| message.role == Role::System)
                .map(|message| message.content.as_str())
                .unwrap_or("");
            if system.contains("budget planner") {
                "budget"
            } else {
                "itinerary"
            }
        }
    }
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, step: &'static str, content: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(step, Ok(content.into()));
        self
    }

    pub fn fail(self, step: &'static str, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(step, Err(message.into()));
        self
    }

    pub fn set_reply(&self, step: &'static str, content: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(step, Ok(content.into()));
    }

    pub fn steps(&self) -> Vec<&'static str> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(step, _)| *step)
            .collect()
    }

    /// Concatenated message text of the latest request for `step`.
    pub fn prompt_for(&self, step: &str) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(recorded, _)| *recorded == step)
            .map(|(_, request)| {
                request
                    .messages
                    .iter()
                    .map(|message| message.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
    }

    pub fn request_for(&self, step: &str) -> Option<LlmRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(recorded, _)| *recorded == step)
            .map(|(_, request)| request.clone())
    }
}

#[async_trait]
impl Runnable<LlmRequest, LlmResponse> for ScriptedLlm {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, TripwiseError> {
        let step = step_of(&request);
        self.requests.lock().unwrap().push((step, request));
        match self.replies.lock().unwrap().get(step) {
            Some(Ok(content)) => Ok(LlmResponse {
                content: content.clone(),
            }),
            Some(Err(message)) => Err(TripwiseError::LlmProvider(message.clone())),
            None => Err(TripwiseError::LlmProvider(format!("no scripted reply for {step}"))),
        }
    }
}

pub fn rome_llm() -> ScriptedLlm {
    ScriptedLlm::new()
        .reply("router", ROME_PLANNING)
        .reply("destination", ROME_FOUND)
        .reply("budget", BUDGET)
        .reply("itinerary", ITINERARY)
}

/// Returns fixed passages and records the queries it saw.
pub struct FakeSearch {
    passages: Vec<String>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl FakeSearch {
    pub fn new(passages: &[&str]) -> Self {
        Self {
            passages: passages.iter().map(|p| p.to_string()).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SimilaritySearch for FakeSearch {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, TripwiseError> {
        self.queries.lock().unwrap().push((query.to_string(), k));
        Ok(self.passages.iter().take(k).cloned().collect())
    }
}

/// Flight or weather lookup that counts its calls.
#[derive(Clone)]
pub struct CountingLookup {
    reply: Result<&'static str, &'static str>,
    calls: Arc<AtomicUsize>,
}

impl CountingLookup {
    pub fn ok(reply: &'static str) -> Self {
        Self {
            reply: Ok(reply),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            reply: Err(message),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self) -> Result<String, TripwiseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .map(str::to_string)
            .map_err(|message| TripwiseError::ExternalService(message.to_string()))
    }
}

#[async_trait]
impl FlightLookup for CountingLookup {
    async fn lookup(&self, _destination: &DestinationInfo) -> Result<String, TripwiseError> {
        self.answer()
    }
}

#[async_trait]
impl WeatherLookup for CountingLookup {
    async fn lookup(&self, _destination: &DestinationInfo) -> Result<String, TripwiseError> {
        self.answer()
    }
}

pub fn test_config() -> PlannerConfig {
    PlannerConfig {
        retry: RetryPolicy::none(),
        ..PlannerConfig::default()
    }
}

pub struct Harness {
    pub llm: Arc<ScriptedLlm>,
    pub search: Arc<FakeSearch>,
    pub flight: CountingLookup,
    pub weather: CountingLookup,
}

impl Harness {
    pub fn new(llm: ScriptedLlm) -> Self {
        Self {
            llm: Arc::new(llm),
            search: Arc::new(FakeSearch::new(&[
                "Rome: 5 day package, $1500, 3-star hotel near Termini.",
                "Paris: 4 day package, Louvre and Seine cruise.",
                "Tokyo: 7 day package, Shibuya and Mount Fuji.",
            ])),
            flight: CountingLookup::ok("flight price is $2000."),
            weather: CountingLookup::ok("weather is rainy."),
        }
    }

    pub fn context(&self) -> PlannerContext {
        PlannerContext::new(self.llm.clone(), self.search.clone(), test_config())
            .with_flight_lookup(self.flight.clone())
            .with_weather_lookup(self.weather.clone())
    }
}
