use std::collections::HashMap;

use serde_json::json;
use tripwise_core::Document;
use tripwise_retrieval::{RecursiveCharacterTextSplitter, SplitterConfigError};

#[test]
fn recursive_splitter_respects_separator_priority() {
    let splitter = RecursiveCharacterTextSplitter::builder()
        .chunk_size(8)
        .chunk_overlap(0)
        .build()
        .unwrap();

    let text = "aa aa\n\nbb bb\n\ncc cc";
    let chunks = splitter.split_text(text);

    assert_eq!(chunks, vec!["aa aa\n\n", "bb bb\n\n", "cc cc"]);
    assert_eq!(chunks.concat(), text);
}

#[test]
fn recursive_splitter_preserves_utf8_boundaries() {
    let splitter = RecursiveCharacterTextSplitter::builder()
        .chunk_size(3)
        .chunk_overlap(0)
        .build()
        .unwrap();

    let text = "a🙂b🙂c🙂";
    let chunks = splitter.split_text(text);

    assert_eq!(chunks.concat(), text);
    assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 3));
}

#[test]
fn recursive_splitter_applies_overlap_windows() {
    let splitter = RecursiveCharacterTextSplitter::builder()
        .chunk_size(4)
        .chunk_overlap(1)
        .build()
        .unwrap();

    let chunks = splitter.split_text("abcdefghij");

    assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
}

#[test]
fn recursive_splitter_clamps_overlap_below_chunk_size() {
    let splitter = RecursiveCharacterTextSplitter::builder()
        .chunk_size(3)
        .chunk_overlap(5)
        .build()
        .unwrap();

    assert_eq!(splitter.chunk_overlap(), 2);
    assert_eq!(splitter.split_text("abcd"), vec!["abc", "bcd"]);
}

#[test]
fn recursive_splitter_rejects_zero_chunk_size() {
    let error = RecursiveCharacterTextSplitter::builder()
        .chunk_size(0)
        .build()
        .unwrap_err();

    assert_eq!(error, SplitterConfigError::ChunkSizeMustBeGreaterThanZero);
}

#[test]
fn recursive_splitter_defaults_match_corpus_indexing() {
    let splitter = RecursiveCharacterTextSplitter::builder().build().unwrap();

    assert_eq!(splitter.chunk_size(), 1000);
    assert_eq!(splitter.chunk_overlap(), 200);
    assert!(splitter.split_text("").is_empty());
}

#[test]
fn split_documents_copies_metadata_and_numbers_chunks() {
    let splitter = RecursiveCharacterTextSplitter::builder()
        .chunk_size(8)
        .chunk_overlap(0)
        .build()
        .unwrap();

    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), json!("brochure.pdf"));
    let document = Document {
        id: "brochure".to_string(),
        content: "aa aa\n\nbb bb\n\n   \n\ncc cc".to_string(),
        metadata,
        embedding: None,
    };

    let chunks = splitter.split_documents(&[document]);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].id, "brochure#0");
    assert_eq!(chunks[2].id, "brochure#2");
    assert_eq!(chunks[2].content, "cc cc");
    assert_eq!(chunks[1].metadata.get("source"), Some(&json!("brochure.pdf")));
    assert_eq!(chunks[1].metadata.get("chunk_index"), Some(&json!(1)));
}
