use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tripwise_core::{Document, Value};

use crate::IngestionError;

fn source_metadata(path: &Path) -> HashMap<String, Value> {
    let mut metadata = HashMap::new();
    metadata.insert(
        "source".to_string(),
        Value::String(path.to_string_lossy().to_string()),
    );
    metadata
}

pub struct TextLoader {
    path: PathBuf,
}

impl TextLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> Result<Vec<Document>, IngestionError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| IngestionError::Io {
                    path: self.path.clone(),
                    source,
                })?;

        Ok(vec![Document {
            id: self.path.to_string_lossy().to_string(),
            content,
            metadata: source_metadata(&self.path),
            embedding: None,
        }])
    }
}

pub struct PdfLoader {
    path: PathBuf,
}

impl PdfLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(feature = "pdf")]
    pub async fn load(&self) -> Result<Vec<Document>, IngestionError> {
        let path = self.path.clone();
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| IngestionError::Io {
                path: path.clone(),
                source,
            })?;
        let extract_path = path.clone();
        let content = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|err| IngestionError::Extract {
                path: extract_path.clone(),
                reason: err.to_string(),
            })?
            .map_err(|err| IngestionError::Extract {
                path: extract_path,
                reason: err.to_string(),
            })?;

        Ok(vec![Document {
            id: path.to_string_lossy().to_string(),
            content,
            metadata: source_metadata(&path),
            embedding: None,
        }])
    }

    #[cfg(not(feature = "pdf"))]
    pub async fn load(&self) -> Result<Vec<Document>, IngestionError> {
        Err(IngestionError::PdfDisabled(self.path.clone()))
    }
}

/// Picks a loader by extension: `.pdf` goes through [`PdfLoader`], anything else is read as UTF-8.
pub async fn load_file(path: &Path) -> Result<Vec<Document>, IngestionError> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if is_pdf {
        PdfLoader::new(path).load().await
    } else {
        TextLoader::new(path).load().await
    }
}
