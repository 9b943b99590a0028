//! Document workflows behind the HTTP surface
//!
//! Extraction runs fetch, tree building and section parsing, then saves the
//! result under a fresh id. Analysis returns cached connections unless asked
//! to recompute, in which case the new set replaces the cache.

use crate::error::AppError;
use dokgraph_analyzer::ConnectionAnalyzer;
use dokgraph_domain::traits::{DocumentStore, ModelProvider, NodeSource};
use dokgraph_domain::{ConnectionSet, DocumentSummary, StoredDocument, Tier};
use dokgraph_fetch::{validate_share_url, FetchError};
use dokgraph_store::StoreError;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

/// Any storage backend
pub type BoxedStore = Box<dyn DocumentStore<Error = StoreError> + Send>;

/// Any outline source
pub type SharedSource = Arc<dyn NodeSource<Error = FetchError>>;

/// Orchestrates fetch, extraction, storage and analysis
pub struct DocumentService<P>
where
    P: ModelProvider,
{
    store: Mutex<BoxedStore>,
    source: SharedSource,
    analyzer: Option<ConnectionAnalyzer<P>>,
}

impl<P> DocumentService<P>
where
    P: ModelProvider + 'static,
{
    /// Create a service; without an analyzer, analysis reports as unavailable
    pub fn new(store: BoxedStore, source: SharedSource, analyzer: Option<ConnectionAnalyzer<P>>) -> Self {
        Self {
            store: Mutex::new(store),
            source,
            analyzer,
        }
    }

    /// Whether connection analysis can run
    pub fn analysis_enabled(&self) -> bool {
        self.analyzer.is_some()
    }

    fn store(&self) -> Result<MutexGuard<'_, BoxedStore>, AppError> {
        self.store
            .lock()
            .map_err(|_| AppError::Internal("document store lock poisoned".to_string()))
    }

    /// Fetch, extract and save the outline behind `url`
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] when `url` is not a shared outline link
    /// - [`AppError::Fetch`] when the outline could not be downloaded
    /// - [`AppError::Structure`] when the nodes do not form a tree
    pub async fn extract(&self, url: &str) -> Result<StoredDocument, AppError> {
        validate_share_url(url)?;

        let nodes = self.source.fetch(url).await?;
        let extraction = dokgraph_extractor::extract(&nodes)?;

        let id = Uuid::now_v7().to_string();
        let record = self.store()?.save(
            &id,
            &extraction.title,
            url,
            &extraction.document,
            &extraction.markdown,
        )?;

        info!(
            id = %record.id,
            name = %record.name,
            tier2 = record.document.items(Tier::Dok2).len(),
            tier3 = record.document.items(Tier::Dok3).len(),
            tier4 = record.document.items(Tier::Dok4).len(),
            "saved document"
        );
        Ok(record)
    }

    /// Summaries of every stored document, newest first
    pub fn list(&self) -> Result<Vec<DocumentSummary>, AppError> {
        Ok(self.store()?.list()?)
    }

    /// A stored document
    pub fn get(&self, id: &str) -> Result<StoredDocument, AppError> {
        self.store()?
            .get(id)?
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    /// Remove a stored document
    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        if self.store()?.delete(id)? {
            info!(id, "deleted document");
            Ok(())
        } else {
            Err(AppError::NotFound(id.to_string()))
        }
    }

    /// Connections of a stored document
    ///
    /// Returns the cached set when one exists and `force` is false.
    /// Otherwise infers a new set and stores it in place of the old one.
    pub async fn analyze(&self, id: &str, force: bool) -> Result<ConnectionSet, AppError> {
        let record = self.get(id)?;

        if !force {
            if let Some(cached) = record.connections {
                info!(id, connections = cached.len(), "returning cached connections");
                return Ok(cached);
            }
        }

        if !record.document.has_tier_items() {
            return Err(AppError::NothingToAnalyze);
        }

        let analyzer = self.analyzer.as_ref().ok_or_else(|| {
            AppError::AnalysisUnavailable("no model provider configured".to_string())
        })?;

        info!(
            id,
            tier2 = record.document.items(Tier::Dok2).len(),
            tier3 = record.document.items(Tier::Dok3).len(),
            tier4 = record.document.items(Tier::Dok4).len(),
            force,
            "analyzing connections"
        );
        let connections = analyzer.analyze_document(&record.document).await;

        if !self.store()?.save_connections(id, &connections)? {
            warn!(id, "document removed during analysis; connections not stored");
        }

        Ok(connections)
    }
}
