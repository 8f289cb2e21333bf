//! Conversational trip planning.
//!
//! A user turn runs through a fixed state machine:
//!
//! ```text
//! router ─┬─ casual ──────────────────────────────────────────────▶ END
//!         └─ destination ─┬─ not found ───────────────────────────▶ END
//!                         └─ flight ─▶ weather ─▶ budget ─▶ (pause)
//!                                                   ├─ approved ─▶ itinerary ─▶ END
//!                                                   └─ rejected ─▶ cancel ────▶ END
//! ```
//!
//! [`TripPlanner`] drives it per thread, pausing after the budget estimate
//! until the user approves or declines.

mod approval;
mod config;
mod context;
mod corpus;
mod error;
mod memory;
mod nodes;
mod planner;
mod prompts;
mod schemas;
mod state;
mod travel;
mod workflow;

pub use approval::parse_approval;
pub use config::PlannerConfig;
pub use context::PlannerContext;
pub use corpus::index_corpus;
pub use error::PlannerError;
pub use memory::ConversationWindow;
pub use planner::{BudgetReview, PlannerReply, TripPlanner};
pub use prompts::PlannerPrompts;
pub use schemas::{RouteStatus, RouterDecision};
pub use state::{Approval, DestinationInfo, DestinationSummary, TripState};
pub use travel::{
    AviationStackFlightLookup, FlightLookup, OpenWeatherLookup, StubFlightLookup,
    StubWeatherLookup, WeatherLookup,
};
pub use workflow::{build_workflow, node_names, CANCEL_MESSAGE, NOT_FOUND_MESSAGE};
