//! Flat-file document store

use crate::StoreError;
use chrono::Utc;
use dokgraph_domain::traits::DocumentStore;
use dokgraph_domain::{ConnectionSet, Document, DocumentSummary, StoredDocument};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    documents: Vec<StoredDocument>,
}

/// DocumentStore keeping every record in one JSON file
///
/// Records are held in memory in insertion order. Each mutation writes the
/// full set to a sibling temporary file and renames it over the store
/// file, so the file on disk is always a complete snapshot. A mutation
/// that fails to persist leaves the in-memory state untouched.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    documents: Vec<StoredDocument>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty one if the file is absent
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let documents = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<StoreFile>(&text)?.documents
            }
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Vec::new()
        };

        debug!(path = %path.display(), documents = documents.len(), "opened json store");
        Ok(Self { path, documents })
    }

    /// Location of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write `documents` to disk, then adopt them as the current state
    fn commit(&mut self, documents: Vec<StoredDocument>) -> Result<(), StoreError> {
        let file = StoreFile { documents };
        let bytes = serde_json::to_vec_pretty(&file)?;

        let temp = self.temp_path();
        {
            let mut handle = fs::File::create(&temp)?;
            handle.write_all(&bytes)?;
            handle.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;

        self.documents = file.documents;
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|doc| doc.id == id)
    }
}

impl DocumentStore for JsonFileStore {
    type Error = StoreError;

    fn save(
        &mut self,
        id: &str,
        name: &str,
        url: &str,
        document: &Document,
        raw_markdown: &str,
    ) -> Result<StoredDocument, Self::Error> {
        let now = Utc::now();
        let mut documents = self.documents.clone();

        let record = match self.position(id) {
            Some(index) => {
                let existing = &mut documents[index];
                existing.name = name.to_string();
                existing.url = url.to_string();
                existing.updated_at = now;
                existing.raw_markdown = raw_markdown.to_string();
                existing.document = document.clone();
                existing.connections = None;
                existing.clone()
            }
            None => {
                let record = StoredDocument {
                    id: id.to_string(),
                    name: name.to_string(),
                    url: url.to_string(),
                    created_at: now,
                    updated_at: now,
                    raw_markdown: raw_markdown.to_string(),
                    document: document.clone(),
                    connections: None,
                };
                documents.push(record.clone());
                record
            }
        };

        self.commit(documents)?;
        debug!(id, name, "saved document");
        Ok(record)
    }

    fn get(&self, id: &str) -> Result<Option<StoredDocument>, Self::Error> {
        Ok(self.position(id).map(|index| self.documents[index].clone()))
    }

    fn list(&self) -> Result<Vec<DocumentSummary>, Self::Error> {
        let mut newest_first: Vec<&StoredDocument> = self.documents.iter().rev().collect();
        newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(newest_first.into_iter().map(StoredDocument::summary).collect())
    }

    fn delete(&mut self, id: &str) -> Result<bool, Self::Error> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut documents = self.documents.clone();
        documents.remove(index);
        self.commit(documents)?;
        Ok(true)
    }

    fn save_connections(
        &mut self,
        id: &str,
        connections: &ConnectionSet,
    ) -> Result<bool, Self::Error> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut documents = self.documents.clone();
        documents[index].connections = Some(connections.clone());
        documents[index].updated_at = Utc::now();
        self.commit(documents)?;
        Ok(true)
    }

    fn get_connections(&self, id: &str) -> Result<Option<ConnectionSet>, Self::Error> {
        Ok(self
            .position(id)
            .and_then(|index| self.documents[index].connections.clone()))
    }
}
