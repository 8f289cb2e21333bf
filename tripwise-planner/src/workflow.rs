use std::sync::Arc;

use tripwise_graph::{
    Checkpointer, ExecutableGraph, ExecutionConfig, GraphBuilder, GraphError, GraphState, END,
};

use crate::nodes::{
    BudgetNode, CancelNode, DestinationNode, FlightNode, ItineraryNode, RouterNode, WeatherNode,
};
use crate::{Approval, PlannerContext, TripState};

pub const NOT_FOUND_MESSAGE: &str =
    "Sorry, I don't have information about that city. Could you try another?";
pub const CANCEL_MESSAGE: &str =
    "No problem, I won't build that itinerary. Let me know if you'd like to plan a different trip.";

pub mod node_names {
    pub const ROUTER: &str = "router";
    pub const DESTINATION: &str = "destination";
    pub const FLIGHT: &str = "flight";
    pub const WEATHER: &str = "weather";
    pub const BUDGET: &str = "budget";
    pub const ITINERARY: &str = "itinerary";
    pub const CANCEL: &str = "cancel";
}

use node_names::*;

fn after_router(state: &GraphState<TripState>) -> String {
    if state.data.casual_answer.is_some() {
        END.to_string()
    } else {
        DESTINATION.to_string()
    }
}

fn after_destination(state: &GraphState<TripState>) -> String {
    if state.data.destination_found() {
        FLIGHT.to_string()
    } else {
        END.to_string()
    }
}

fn after_budget(state: &GraphState<TripState>) -> String {
    match state.data.approval {
        Some(Approval::Approved) => ITINERARY.to_string(),
        _ => CANCEL.to_string(),
    }
}

/// Wires the trip workflow. The run pauses after `budget` and is resumed with
/// the user's approval decision.
pub fn build_workflow<C>(
    context: Arc<PlannerContext>,
    checkpointer: C,
) -> Result<ExecutableGraph<TripState>, GraphError>
where
    C: Checkpointer<TripState> + 'static,
{
    let max_steps = context.config.max_steps;
    GraphBuilder::new()
        .add_node(ROUTER, RouterNode(context.clone()))
        .add_node(DESTINATION, DestinationNode(context.clone()))
        .add_node(FLIGHT, FlightNode(context.clone()))
        .add_node(WEATHER, WeatherNode(context.clone()))
        .add_node(BUDGET, BudgetNode(context.clone()))
        .add_node(ITINERARY, ItineraryNode(context))
        .add_node(CANCEL, CancelNode)
        .set_entry(ROUTER)
        .add_conditional_edge(ROUTER, after_router)
        .add_conditional_edge(DESTINATION, after_destination)
        .add_edge(FLIGHT, WEATHER)
        .add_edge(WEATHER, BUDGET)
        .add_conditional_edge(BUDGET, after_budget)
        .add_edge(ITINERARY, END)
        .add_edge(CANCEL, END)
        .with_interrupt_after([BUDGET])
        .with_checkpointer(checkpointer)
        .with_config(ExecutionConfig::with_max_steps(max_steps))
        .build()
}
