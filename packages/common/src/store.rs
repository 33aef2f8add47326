use crate::{CommonError, CommonResult};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Document persistence abstraction for loading, saving and testing
///
/// The byte format is owned by the implementation. Callers only rely on
/// the fact that both directions can fail.
pub trait DocumentStore<D> {
    /// Load a document from `path`
    fn load(&self, path: &Path) -> CommonResult<D>;

    /// Save a document to `path`
    fn save(&self, document: &D, path: &Path) -> CommonResult<()>;
}

/// Pretty-printed JSON files on disk
pub struct JsonFileStore<D> {
    _marker: PhantomData<fn() -> D>,
}

impl<D> JsonFileStore<D> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<D> Default for JsonFileStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Serialize + DeserializeOwned> DocumentStore<D> for JsonFileStore<D> {
    fn load(&self, path: &Path) -> CommonResult<D> {
        let content = std::fs::read_to_string(path)?;
        let document = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded document");
        Ok(document)
    }

    fn save(&self, document: &D, path: &Path) -> CommonResult<()> {
        let content = serde_json::to_string_pretty(document)?;
        std::fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "saved document");
        Ok(())
    }
}

/// In-memory store for testing
pub struct MemoryStore<D> {
    pub documents: Mutex<HashMap<PathBuf, D>>,
}

impl<D> MemoryStore<D> {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_document(self, path: impl Into<PathBuf>, document: D) -> Self {
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert(path.into(), document);
        }
        self
    }
}

impl<D> Default for MemoryStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone> DocumentStore<D> for MemoryStore<D> {
    fn load(&self, path: &Path) -> CommonResult<D> {
        let documents = self
            .documents
            .lock()
            .map_err(|e| CommonError::Generic(e.to_string()))?;
        documents
            .get(path)
            .cloned()
            .ok_or_else(|| CommonError::NotFound(path.to_path_buf()))
    }

    fn save(&self, document: &D, path: &Path) -> CommonResult<()> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|e| CommonError::Generic(e.to_string()))?;
        documents.insert(path.to_path_buf(), document.clone());
        Ok(())
    }
}
