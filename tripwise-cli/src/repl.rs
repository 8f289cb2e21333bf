use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tripwise_planner::{PlannerReply, TripPlanner};

const APPROVAL_HINT: &str = "Reply 'proceed' to build the itinerary, anything else to cancel.";

fn print_reply(reply: &PlannerReply) {
    match reply {
        PlannerReply::Answer(text) | PlannerReply::Itinerary(text) => println!("{text}\n"),
        PlannerReply::AwaitingApproval(review) => {
            println!("{}\n", review.budget);
            println!("{APPROVAL_HINT}\n");
        }
    }
}

pub async fn ask(planner: &TripPlanner, thread_id: &str, message: &str) -> Result<()> {
    let reply = planner
        .handle_message(thread_id, message)
        .await
        .context("turn failed")?;
    print_reply(&reply);
    Ok(())
}

/// Line-edited chat loop. A failed turn is reported and the loop continues.
pub async fn chat(planner: &TripPlanner, thread_id: &str) -> Result<()> {
    let mut editor = DefaultEditor::new().context("failed to initialize line editor")?;
    println!("Where would you like to go? (Ctrl+D to quit)\n");

    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(err) => return Err(err).context("failed to read input"),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }
        let _ = editor.add_history_entry(input);

        match planner.handle_message(thread_id, input).await {
            Ok(reply) => print_reply(&reply),
            Err(err) => {
                tracing::error!(error = %err, "turn failed");
                eprintln!("Sorry, something went wrong: {err}\n");
            }
        }
    }
    Ok(())
}
