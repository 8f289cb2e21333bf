use std::collections::VecDeque;

use serde_json::json;
use thiserror::Error;
use tripwise_core::Document;

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitterConfigError {
    #[error("chunk_size must be greater than zero")]
    ChunkSizeMustBeGreaterThanZero,
    #[error("separator list must not be empty")]
    NoSeparators,
}

/// Splits text on the coarsest separator that occurs in it, recursing into
/// pieces that are still too long with the next separator. Separators stay
/// attached to the end of the piece they terminate. Sizes count characters.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RecursiveCharacterTextSplitterBuilder {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for RecursiveCharacterTextSplitterBuilder {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RecursiveCharacterTextSplitterBuilder {
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<RecursiveCharacterTextSplitter, SplitterConfigError> {
        if self.chunk_size == 0 {
            return Err(SplitterConfigError::ChunkSizeMustBeGreaterThanZero);
        }
        if self.separators.is_empty() {
            return Err(SplitterConfigError::NoSeparators);
        }
        Ok(RecursiveCharacterTextSplitter {
            chunk_size: self.chunk_size,
            // An overlap as large as the chunk would never advance.
            chunk_overlap: self.chunk_overlap.min(self.chunk_size - 1),
            separators: self.separators,
        })
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

impl RecursiveCharacterTextSplitter {
    pub fn builder() -> RecursiveCharacterTextSplitterBuilder {
        RecursiveCharacterTextSplitterBuilder::default()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        self.split_with(text, &self.separators)
    }

    /// Chunks every document, copying its metadata and recording `chunk_index`.
    /// Whitespace-only chunks are dropped.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        let mut output = Vec::new();
        for document in documents {
            let chunks = self
                .split_text(&document.content)
                .into_iter()
                .filter(|chunk| !chunk.trim().is_empty());
            for (index, chunk) in chunks.enumerate() {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), json!(index));
                output.push(Document {
                    id: format!("{}#{}", document.id, index),
                    content: chunk,
                    metadata,
                    embedding: None,
                });
            }
        }
        output
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let position = separators
            .iter()
            .position(|sep| sep.is_empty() || text.contains(sep.as_str()));
        let Some(position) = position else {
            return self.split_chars(text);
        };
        let separator = separators[position].as_str();
        if separator.is_empty() {
            return self.split_chars(text);
        }
        let remaining = &separators[position + 1..];

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();
        for piece in text.split_inclusive(separator) {
            if char_len(piece) <= self.chunk_size {
                fitting.push(piece);
                continue;
            }
            chunks.extend(self.merge(&fitting));
            fitting.clear();
            if remaining.is_empty() {
                chunks.extend(self.split_chars(piece));
            } else {
                chunks.extend(self.split_with(piece, remaining));
            }
        }
        chunks.extend(self.merge(&fitting));
        chunks
    }

    /// Greedily packs pieces into chunks, carrying trailing pieces worth at
    /// most `chunk_overlap` characters into the next chunk.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size && !window.is_empty() {
                chunks.push(window.iter().map(|(p, _)| *p).collect::<String>());
                while let Some(&(_, front_len)) = window.front() {
                    if total <= self.chunk_overlap && total + len <= self.chunk_size {
                        break;
                    }
                    total -= front_len;
                    window.pop_front();
                }
            }
            window.push_back((piece, len));
            total += len;
        }

        if !window.is_empty() {
            chunks.push(window.iter().map(|(p, _)| *p).collect::<String>());
        }
        chunks
    }

    fn split_chars(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0usize;
        while start < chars.len() {
            let end = usize::min(start + self.chunk_size, chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}
