use serde::{Deserialize, Serialize};
use tripwise_graph::{Checkpoint, Checkpointer, GraphState, StateSchema};

use tripwise_checkpoint_sqlite::SqliteCheckpointer;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
struct DemoState {
    count: i32,
    label: Option<String>,
}

impl StateSchema for DemoState {}

async fn memory_checkpointer() -> SqliteCheckpointer {
    SqliteCheckpointer::builder("sqlite::memory:")
        .max_connections(1)
        .build()
        .await
        .expect("sqlite checkpointer should build")
}

#[tokio::test]
async fn checkpointer_trait_round_trip_save_and_load() {
    let checkpointer = memory_checkpointer().await;

    let checkpoint = Checkpoint::new(
        "thread-1".to_string(),
        GraphState::new(DemoState {
            count: 7,
            label: Some("rome".to_string()),
        }),
        3,
        "node-a".to_string(),
    );

    checkpointer
        .save(&checkpoint)
        .await
        .expect("checkpoint should save");

    let loaded: Checkpoint<DemoState> = checkpointer
        .load("thread-1")
        .await
        .expect("checkpoint should load")
        .expect("checkpoint should exist");

    assert_eq!(loaded, checkpoint);
}

#[tokio::test]
async fn checkpointer_load_returns_latest_for_thread() {
    let checkpointer = memory_checkpointer().await;

    for count in 1..=3 {
        let checkpoint = Checkpoint::new(
            "thread-1".to_string(),
            GraphState::new(DemoState {
                count,
                label: None,
            }),
            count as u64,
            "node-a".to_string(),
        );
        checkpointer.save(&checkpoint).await.unwrap();
    }

    let loaded: Checkpoint<DemoState> = checkpointer.load("thread-1").await.unwrap().unwrap();
    assert_eq!(loaded.state.data.count, 3);

    let other: Option<Checkpoint<DemoState>> = checkpointer.load("thread-2").await.unwrap();
    assert!(other.is_none());
}

#[tokio::test]
async fn checkpointer_clear_drops_thread_history() {
    let checkpointer = memory_checkpointer().await;
    let checkpoint = Checkpoint::new(
        "thread-1".to_string(),
        GraphState::new(DemoState::default()),
        1,
        "node-a".to_string(),
    );
    checkpointer.save(&checkpoint).await.unwrap();

    Checkpointer::<DemoState>::clear(&checkpointer, "thread-1")
        .await
        .unwrap();

    let loaded: Option<Checkpoint<DemoState>> = checkpointer.load("thread-1").await.unwrap();
    assert!(loaded.is_none());

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM checkpoints")
        .fetch_one(checkpointer.pool())
        .await
        .unwrap();
    assert_eq!(rows, 0);
}
