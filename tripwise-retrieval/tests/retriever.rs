use tripwise_core::{Document, SimilaritySearch};
use tripwise_retrieval::{HashEmbedder, InMemoryVectorStore, Indexer, Retriever};

async fn indexed_brochure() -> Retriever<HashEmbedder, InMemoryVectorStore> {
    let embedder = HashEmbedder::new(64);
    let store = InMemoryVectorStore::new();
    let indexer = Indexer::new(embedder.clone(), store.clone());
    indexer
        .add_documents(vec![
            Document::new("rome", "Rome package: 5 days, 3 star hotel, Colosseum tour"),
            Document::new("paris", "Paris package: 4 days, Louvre and Seine cruise"),
            Document::new("tokyo", "Tokyo package: 7 days, Shibuya and Mount Fuji"),
        ])
        .await
        .unwrap();
    Retriever::new(embedder, store)
}

#[tokio::test]
async fn retriever_ranks_matching_destination_first() {
    let retriever = indexed_brochure().await;

    let results = retriever.retrieve("rome", 2).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].document.id, "rome");
}

#[tokio::test]
async fn similarity_search_returns_passage_text() {
    let retriever = indexed_brochure().await;

    let passages = retriever.search("Tokyo", 1).await.unwrap();

    assert_eq!(passages.len(), 1);
    assert!(passages[0].starts_with("Tokyo package"));
}

#[tokio::test]
async fn similarity_search_on_empty_store_returns_nothing() {
    let retriever = Retriever::new(HashEmbedder::new(8), InMemoryVectorStore::new());

    let passages = retriever.search("anything", 3).await.unwrap();

    assert!(passages.is_empty());
}
