use std::sync::Arc;

use async_trait::async_trait;
use tripwise_core::{
    LlmRequest, Runnable, StrOutputParser, StructuredOutput, StructuredOutputParser,
    TripwiseError, Value,
};
use tripwise_graph::{GraphState, StateUpdate};
use tripwise_prompt::{ChatPromptTemplate, PromptVars};

use crate::workflow::{CANCEL_MESSAGE, NOT_FOUND_MESSAGE};
use crate::{DestinationInfo, PlannerContext, RouteStatus, RouterDecision, TripState};

type NodeResult = Result<StateUpdate<TripState>, TripwiseError>;

fn vars<const N: usize>(pairs: [(&str, Value); N]) -> PromptVars {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn text(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

fn destination_value(state: &TripState) -> Result<Value, TripwiseError> {
    Ok(serde_json::to_value(&state.destination_info)?)
}

fn require_destination(state: &TripState) -> Result<&DestinationInfo, TripwiseError> {
    state
        .destination_info
        .as_ref()
        .filter(|info| info.found)
        .ok_or_else(|| {
            TripwiseError::InvalidConfig("travel lookups need a found destination".to_string())
        })
}

async fn ask_structured<T: StructuredOutput>(
    context: &PlannerContext,
    prompt: &ChatPromptTemplate,
    vars: PromptVars,
    schema_name: &str,
) -> Result<T, TripwiseError> {
    let parser = StructuredOutputParser::<T>::new();
    let request = LlmRequest::new(prompt.format_messages(&vars)?)
        .with_response_format(parser.response_format(schema_name)?);
    let response = context.llm.invoke(request).await?;
    parser.parse(&response.content)
}

async fn ask_text(
    context: &PlannerContext,
    prompt: &ChatPromptTemplate,
    vars: PromptVars,
) -> Result<String, TripwiseError> {
    let request = LlmRequest::new(prompt.format_messages(&vars)?);
    let response = context.llm.invoke(request).await?;
    StrOutputParser.invoke(response).await
}

/// Classifies the utterance; a casual reply ends the turn.
pub(crate) struct RouterNode(pub Arc<PlannerContext>);

#[async_trait]
impl Runnable<GraphState<TripState>, StateUpdate<TripState>> for RouterNode {
    async fn invoke(&self, input: GraphState<TripState>) -> NodeResult {
        let mut state = input.data;
        let decision: RouterDecision = ask_structured(
            &self.0,
            &self.0.prompts.router,
            vars([
                ("query", Value::String(state.query.clone())),
                ("history", Value::String(state.history.clone())),
            ]),
            "router_decision",
        )
        .await?;

        tracing::info!(status = ?decision.status, "routed query");
        if decision.status == RouteStatus::Casual {
            state.casual_answer = decision.answer;
        }
        Ok(StateUpdate::new(state))
    }
}

/// Looks the destination up in the brochure and extracts its package facts.
pub(crate) struct DestinationNode(pub Arc<PlannerContext>);

#[async_trait]
impl Runnable<GraphState<TripState>, StateUpdate<TripState>> for DestinationNode {
    async fn invoke(&self, input: GraphState<TripState>) -> NodeResult {
        let mut state = input.data;
        let passages = self
            .0
            .search
            .search(&state.query, self.0.config.retrieval_k)
            .await?;
        let context = passages.join("\n\n");

        let info: DestinationInfo = ask_structured(
            &self.0,
            &self.0.prompts.destination,
            vars([
                ("query", Value::String(state.query.clone())),
                ("context", Value::String(context)),
            ]),
            "destination_info",
        )
        .await?;

        tracing::info!(
            found = info.found,
            name = info.name.as_deref().unwrap_or(""),
            passages = passages.len(),
            "destination lookup"
        );
        if !info.found {
            state.casual_answer = Some(NOT_FOUND_MESSAGE.to_string());
        }
        state.destination_info = Some(info);
        Ok(StateUpdate::new(state))
    }
}

pub(crate) struct FlightNode(pub Arc<PlannerContext>);

#[async_trait]
impl Runnable<GraphState<TripState>, StateUpdate<TripState>> for FlightNode {
    async fn invoke(&self, input: GraphState<TripState>) -> NodeResult {
        let mut state = input.data;
        let destination = require_destination(&state)?;
        let flight = self
            .0
            .config
            .retry
            .run(|| self.0.flight.lookup(destination))
            .await?;
        state.flight_info = Some(flight);
        Ok(StateUpdate::new(state))
    }
}

pub(crate) struct WeatherNode(pub Arc<PlannerContext>);

#[async_trait]
impl Runnable<GraphState<TripState>, StateUpdate<TripState>> for WeatherNode {
    async fn invoke(&self, input: GraphState<TripState>) -> NodeResult {
        let mut state = input.data;
        let destination = require_destination(&state)?;
        let weather = self
            .0
            .config
            .retry
            .run(|| self.0.weather.lookup(destination))
            .await?;
        state.weather_info = Some(weather);
        Ok(StateUpdate::new(state))
    }
}

/// Produces the budget narrative the user is asked to approve.
pub(crate) struct BudgetNode(pub Arc<PlannerContext>);

#[async_trait]
impl Runnable<GraphState<TripState>, StateUpdate<TripState>> for BudgetNode {
    async fn invoke(&self, input: GraphState<TripState>) -> NodeResult {
        let mut state = input.data;
        let budget = ask_text(
            &self.0,
            &self.0.prompts.budget,
            vars([
                ("query", Value::String(state.query.clone())),
                ("destination_info", destination_value(&state)?),
                ("flight_info", text(&state.flight_info)),
                ("weather_info", text(&state.weather_info)),
            ]),
        )
        .await?;
        state.budget_info = Some(budget);
        // A fresh estimate always needs a fresh decision.
        state.approval = None;
        Ok(StateUpdate::new(state))
    }
}

pub(crate) struct ItineraryNode(pub Arc<PlannerContext>);

#[async_trait]
impl Runnable<GraphState<TripState>, StateUpdate<TripState>> for ItineraryNode {
    async fn invoke(&self, input: GraphState<TripState>) -> NodeResult {
        let mut state = input.data;
        let itinerary = ask_text(
            &self.0,
            &self.0.prompts.itinerary,
            vars([
                ("query", Value::String(state.query.clone())),
                ("history", Value::String(state.history.clone())),
                ("destination_info", destination_value(&state)?),
                ("flight_info", text(&state.flight_info)),
                ("weather_info", text(&state.weather_info)),
                ("budget_info", text(&state.budget_info)),
            ]),
        )
        .await?;
        state.itinerary = Some(itinerary);
        Ok(StateUpdate::new(state))
    }
}

/// Declined budget: close the turn politely.
pub(crate) struct CancelNode;

#[async_trait]
impl Runnable<GraphState<TripState>, StateUpdate<TripState>> for CancelNode {
    async fn invoke(&self, input: GraphState<TripState>) -> NodeResult {
        let mut state = input.data;
        state.casual_answer = Some(CANCEL_MESSAGE.to_string());
        Ok(StateUpdate::new(state))
    }
}
