use std::sync::Arc;

use tripwise_graph::{
    Checkpointer, ExecutableGraph, GraphOutcome, GraphState, InMemoryCheckpointer,
};

use crate::{
    build_workflow, parse_approval, Approval, ConversationWindow, DestinationInfo,
    PlannerContext, PlannerError, TripState,
};

/// What the planner paused on: the budget narrative plus the facts behind it.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetReview {
    pub budget: String,
    pub query: String,
    pub destination: Option<DestinationInfo>,
    pub flight_info: Option<String>,
    pub weather_info: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlannerReply {
    /// A direct answer: casual chat, a not-found apology or a cancellation.
    Answer(String),
    /// The budget estimate, waiting for the user's decision.
    AwaitingApproval(BudgetReview),
    Itinerary(String),
}

impl PlannerReply {
    pub fn text(&self) -> &str {
        match self {
            PlannerReply::Answer(text) | PlannerReply::Itinerary(text) => text,
            PlannerReply::AwaitingApproval(review) => &review.budget,
        }
    }

    pub fn is_awaiting_approval(&self) -> bool {
        matches!(self, PlannerReply::AwaitingApproval(_))
    }
}

/// Runs the trip workflow for many conversation threads.
///
/// A thread with a pending budget treats the next message as the approval
/// decision; any other message starts a fresh turn.
///
/// Paused budgets live in the checkpoint store and survive restarts when that
/// store is durable. The conversation window does not: it belongs to this
/// planner, so a new planner starts every thread with empty history.
pub struct TripPlanner {
    workflow: ExecutableGraph<TripState>,
    memory: ConversationWindow,
}

impl TripPlanner {
    /// Keeps paused threads in memory for the life of the planner.
    pub fn new(context: PlannerContext) -> Result<Self, PlannerError> {
        Self::with_checkpointer(context, InMemoryCheckpointer::<TripState>::new())
    }

    pub fn with_checkpointer<C>(context: PlannerContext, checkpointer: C) -> Result<Self, PlannerError>
    where
        C: Checkpointer<TripState> + 'static,
    {
        let memory = ConversationWindow::new(context.config.history_window);
        let workflow = build_workflow(Arc::new(context), checkpointer)?;
        Ok(Self { workflow, memory })
    }

    pub async fn handle_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<PlannerReply, PlannerError> {
        if self.is_awaiting_approval(thread_id).await? {
            let approval = parse_approval(text);
            return self.resume_turn(thread_id, approval, text).await;
        }
        self.start_turn(thread_id, text).await
    }

    pub async fn is_awaiting_approval(&self, thread_id: &str) -> Result<bool, PlannerError> {
        Ok(self.workflow.pending(thread_id).await?.is_some())
    }

    /// Starts a new turn with `query`, dropping any budget still waiting on the thread.
    pub async fn start_turn(&self, thread_id: &str, query: &str) -> Result<PlannerReply, PlannerError> {
        let history = self.memory.render(thread_id).await;
        let state = TripState::new(query, history);
        tracing::info!(thread_id, "starting turn");

        let outcome = self.workflow.invoke(thread_id, GraphState::new(state)).await?;
        let reply = reply_for(thread_id, outcome)?;
        self.memory.record(thread_id, query, reply.text()).await;
        Ok(reply)
    }

    /// Continues a thread paused on its budget with the user's decision.
    pub async fn resume(&self, thread_id: &str, approval: Approval) -> Result<PlannerReply, PlannerError> {
        self.resume_turn(thread_id, approval, &approval.to_string()).await
    }

    async fn resume_turn(
        &self,
        thread_id: &str,
        approval: Approval,
        user_text: &str,
    ) -> Result<PlannerReply, PlannerError> {
        tracing::info!(thread_id, %approval, "resuming turn");
        let outcome = self
            .workflow
            .resume(thread_id, |state| state.approval = Some(approval))
            .await?;
        let reply = reply_for(thread_id, outcome)?;
        self.memory.record(thread_id, user_text, reply.text()).await;
        Ok(reply)
    }
}

fn reply_for(thread_id: &str, outcome: GraphOutcome<TripState>) -> Result<PlannerReply, PlannerError> {
    let no_reply = || PlannerError::NoReply {
        thread_id: thread_id.to_string(),
    };
    match outcome {
        GraphOutcome::Interrupted(interrupt) => {
            let state = interrupt.state.data;
            let budget = state.budget_info.ok_or_else(no_reply)?;
            Ok(PlannerReply::AwaitingApproval(BudgetReview {
                budget,
                query: state.query,
                destination: state.destination_info,
                flight_info: state.flight_info,
                weather_info: state.weather_info,
            }))
        }
        GraphOutcome::Completed(state) => {
            let state = state.data;
            if let Some(itinerary) = state.itinerary {
                Ok(PlannerReply::Itinerary(itinerary))
            } else {
                state.casual_answer.map(PlannerReply::Answer).ok_or_else(no_reply)
            }
        }
    }
}
