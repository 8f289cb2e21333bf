use tripwise_core::{Document, VectorStore};
use tripwise_retrieval::{HashEmbedder, InMemoryVectorStore, Indexer, RetrievalError};

#[tokio::test]
async fn indexer_embeds_and_stores_documents() {
    let store = InMemoryVectorStore::new();
    let indexer = Indexer::new(HashEmbedder::new(8), store.clone());

    let added = indexer
        .add_documents(vec![Document::new("a", "alpha"), Document::new("b", "beta")])
        .await
        .unwrap();

    assert_eq!(added, 2);
    assert_eq!(store.count().await, 2);
}

#[tokio::test]
async fn indexer_rejects_blank_ids() {
    let indexer = Indexer::new(HashEmbedder::new(8), InMemoryVectorStore::new());

    let err = indexer
        .add_documents(vec![Document::new("  ", "alpha")])
        .await
        .unwrap_err();

    assert!(matches!(err, RetrievalError::InvalidId(_)));
}

#[tokio::test]
async fn indexer_accepts_empty_batches() {
    let indexer = Indexer::new(HashEmbedder::new(8), InMemoryVectorStore::new());

    assert_eq!(indexer.add_documents(Vec::new()).await.unwrap(), 0);
}
