mod support;

use support::*;
use tripwise_core::TripwiseError;
use tripwise_graph::GraphError;
use tripwise_planner::{
    Approval, PlannerError, PlannerReply, TripPlanner, CANCEL_MESSAGE, NOT_FOUND_MESSAGE,
};

#[tokio::test]
async fn greeting_is_answered_by_the_router_alone() {
    let harness = Harness::new(ScriptedLlm::new().reply(
        "router",
        r#"{"status":"CASUAL","answer":"Hello! Where would you like to travel?"}"#,
    ));
    let planner = TripPlanner::new(harness.context()).unwrap();

    let reply = planner.handle_message("t1", "hi").await.unwrap();

    assert_eq!(
        reply,
        PlannerReply::Answer("Hello! Where would you like to travel?".to_string())
    );
    assert_eq!(harness.llm.steps(), vec!["router"]);
    assert!(harness.search.queries().is_empty());
    assert_eq!(harness.flight.calls(), 0);
    assert_eq!(harness.weather.calls(), 0);
    assert!(!planner.is_awaiting_approval("t1").await.unwrap());
}

#[tokio::test]
async fn unknown_destination_ends_with_apology() {
    let harness = Harness::new(
        ScriptedLlm::new()
            .reply("router", ROME_PLANNING)
            .reply("destination", NOT_FOUND),
    );
    let planner = TripPlanner::new(harness.context()).unwrap();

    let reply = planner
        .handle_message("t1", "Plan a 5 day trip to Rome")
        .await
        .unwrap();

    assert_eq!(reply, PlannerReply::Answer(NOT_FOUND_MESSAGE.to_string()));
    assert_eq!(harness.llm.steps(), vec!["router", "destination"]);
    assert_eq!(harness.flight.calls(), 0);
    assert_eq!(harness.weather.calls(), 0);
    assert!(!planner.is_awaiting_approval("t1").await.unwrap());
}

#[tokio::test]
async fn destination_lookup_uses_raw_query_and_joined_passages() {
    let harness = Harness::new(rome_llm());
    let planner = TripPlanner::new(harness.context()).unwrap();

    planner
        .handle_message("t1", "Plan a 5 day trip to Rome")
        .await
        .unwrap();

    assert_eq!(
        harness.search.queries(),
        vec![("Plan a 5 day trip to Rome".to_string(), 3)]
    );
    let prompt = harness.llm.prompt_for("destination").unwrap();
    assert!(prompt.contains(
        "Rome: 5 day package, $1500, 3-star hotel near Termini.\n\nParis: 4 day package"
    ));
    let request = harness.llm.request_for("destination").unwrap();
    let format = request.response_format.unwrap();
    assert_eq!(format.name, "destination_info");
    assert!(format.schema["properties"]["found"].is_object());
}

#[tokio::test]
async fn budget_pauses_until_approved_then_builds_itinerary() {
    let harness = Harness::new(rome_llm());
    let planner = TripPlanner::new(harness.context()).unwrap();

    let reply = planner
        .handle_message("t1", "Plan a 5 day trip to Rome")
        .await
        .unwrap();

    let PlannerReply::AwaitingApproval(review) = reply else {
        panic!("expected the budget to wait for approval, got {reply:?}");
    };
    assert_eq!(review.budget, BUDGET);
    assert_eq!(review.query, "Plan a 5 day trip to Rome");
    assert_eq!(review.flight_info.as_deref(), Some("flight price is $2000."));
    assert_eq!(review.weather_info.as_deref(), Some("weather is rainy."));
    assert_eq!(
        review.destination.as_ref().and_then(|d| d.name.as_deref()),
        Some("Rome")
    );
    assert_eq!(harness.llm.steps(), vec!["router", "destination", "budget"]);
    assert!(planner.is_awaiting_approval("t1").await.unwrap());

    let budget_prompt = harness.llm.prompt_for("budget").unwrap();
    assert!(budget_prompt.contains("flight price is $2000."));
    assert!(budget_prompt.contains("\"name\":\"Rome\""));

    let reply = planner.handle_message("t1", "proceed").await.unwrap();

    assert_eq!(reply, PlannerReply::Itinerary(ITINERARY.to_string()));
    assert_eq!(
        harness.llm.steps(),
        vec!["router", "destination", "budget", "itinerary"]
    );
    let itinerary_prompt = harness.llm.prompt_for("itinerary").unwrap();
    assert!(itinerary_prompt.contains(BUDGET));
    assert!(itinerary_prompt.contains("weather is rainy."));
    assert!(!planner.is_awaiting_approval("t1").await.unwrap());
}

#[tokio::test]
async fn declined_budget_never_reaches_itinerary() {
    let harness = Harness::new(rome_llm());
    let planner = TripPlanner::new(harness.context()).unwrap();
    planner
        .handle_message("t1", "Plan a 5 day trip to Rome")
        .await
        .unwrap();

    let reply = planner.handle_message("t1", "no, too expensive").await.unwrap();

    assert_eq!(reply, PlannerReply::Answer(CANCEL_MESSAGE.to_string()));
    assert!(!harness.llm.steps().contains(&"itinerary"));
    assert!(!planner.is_awaiting_approval("t1").await.unwrap());
}

#[tokio::test]
async fn explicit_resume_accepts_a_decision() {
    let harness = Harness::new(rome_llm());
    let planner = TripPlanner::new(harness.context()).unwrap();
    planner
        .start_turn("t1", "Plan a 5 day trip to Rome")
        .await
        .unwrap();

    let reply = planner.resume("t1", Approval::Approved).await.unwrap();

    assert_eq!(reply, PlannerReply::Itinerary(ITINERARY.to_string()));
}

#[tokio::test]
async fn resuming_an_idle_thread_is_an_error() {
    let harness = Harness::new(rome_llm());
    let planner = TripPlanner::new(harness.context()).unwrap();

    let err = planner.resume("idle", Approval::Approved).await.unwrap_err();

    assert!(matches!(
        err,
        PlannerError::Workflow(GraphError::NotInterrupted { .. })
    ));
}

#[tokio::test]
async fn casual_answer_without_text_fails_the_turn() {
    let harness = Harness::new(ScriptedLlm::new().reply("router", r#"{"status":"CASUAL"}"#));
    let planner = TripPlanner::new(harness.context()).unwrap();

    let err = planner.handle_message("t1", "hello").await.unwrap_err();

    let (node, source) = err.node_error().expect("node failure");
    assert_eq!(node, "router");
    assert!(matches!(source, TripwiseError::ParseFailed { .. }));
    assert!(!planner.is_awaiting_approval("t1").await.unwrap());
}

#[tokio::test]
async fn unknown_router_status_fails_the_turn() {
    let harness = Harness::new(
        ScriptedLlm::new().reply("router", r#"{"status":"MAYBE","answer":"hm"}"#),
    );
    let planner = TripPlanner::new(harness.context()).unwrap();

    let err = planner.handle_message("t1", "hello").await.unwrap_err();

    assert!(matches!(
        err.node_error(),
        Some(("router", TripwiseError::ParseFailed { .. }))
    ));
    assert!(harness.search.queries().is_empty());
}

#[tokio::test]
async fn failed_lookup_aborts_without_leaving_a_pause() {
    let mut harness = Harness::new(rome_llm());
    harness.weather = CountingLookup::failing("weather service down");
    let planner = TripPlanner::new(harness.context()).unwrap();

    let err = planner
        .handle_message("t1", "Plan a 5 day trip to Rome")
        .await
        .unwrap_err();

    assert!(matches!(
        err.node_error(),
        Some(("weather", TripwiseError::ExternalService(_)))
    ));
    assert!(!harness.llm.steps().contains(&"budget"));
    assert!(!planner.is_awaiting_approval("t1").await.unwrap());
}

#[tokio::test]
async fn failed_resume_keeps_the_pending_budget() {
    let harness = Harness::new(rome_llm().fail("itinerary", "quota exceeded"));
    let planner = TripPlanner::new(harness.context()).unwrap();
    planner
        .handle_message("t1", "Plan a 5 day trip to Rome")
        .await
        .unwrap();

    let err = planner.handle_message("t1", "yes").await.unwrap_err();
    assert!(matches!(
        err.node_error(),
        Some(("itinerary", TripwiseError::LlmProvider(_)))
    ));
    assert!(planner.is_awaiting_approval("t1").await.unwrap());

    harness.llm.set_reply("itinerary", ITINERARY);
    let reply = planner.handle_message("t1", "yes").await.unwrap();
    assert_eq!(reply, PlannerReply::Itinerary(ITINERARY.to_string()));
}

#[tokio::test]
async fn history_carries_previous_turns_into_the_router() {
    let harness = Harness::new(ScriptedLlm::new().reply(
        "router",
        r#"{"status":"CASUAL","answer":"How many days would you like to stay in Rome?"}"#,
    ));
    let planner = TripPlanner::new(harness.context()).unwrap();

    planner.handle_message("t1", "I want to visit Rome").await.unwrap();
    planner.handle_message("t1", "5 days").await.unwrap();

    let prompt = harness.llm.prompt_for("router").unwrap();
    assert!(prompt.contains(
        "User: I want to visit Rome\nAssistant: How many days would you like to stay in Rome?"
    ));
    assert!(prompt.contains("5 days"));
}

#[tokio::test]
async fn threads_do_not_share_pauses_or_history() {
    let harness = Harness::new(rome_llm());
    let planner = TripPlanner::new(harness.context()).unwrap();

    planner
        .handle_message("alice", "Plan a 5 day trip to Rome")
        .await
        .unwrap();

    assert!(planner.is_awaiting_approval("alice").await.unwrap());
    assert!(!planner.is_awaiting_approval("bob").await.unwrap());

    // Bob's "yes" is a fresh query, not an approval of Alice's budget.
    let reply = planner.handle_message("bob", "yes").await.unwrap();
    assert!(reply.is_awaiting_approval());
    let router_prompt = harness.llm.prompt_for("router").unwrap();
    assert!(!router_prompt.contains("User: Plan a 5 day trip to Rome"));
}

#[tokio::test]
async fn starting_a_new_turn_drops_a_pending_budget() {
    let harness = Harness::new(rome_llm());
    let planner = TripPlanner::new(harness.context()).unwrap();
    planner
        .handle_message("t1", "Plan a 5 day trip to Rome")
        .await
        .unwrap();

    harness.llm.set_reply(
        "router",
        r#"{"status":"CASUAL","answer":"Sure, ask me anything."}"#,
    );
    let reply = planner.start_turn("t1", "actually, a question").await.unwrap();

    assert_eq!(reply, PlannerReply::Answer("Sure, ask me anything.".to_string()));
    assert!(!planner.is_awaiting_approval("t1").await.unwrap());
}
