//! Catalog-driven autocomplete.
//!
//! Collects symbol entries (databases, tables, columns) published by the
//! schema browser, drops duplicate names, and installs the result as the
//! editor's completion provider. Prefix filtering is left to the editor.

use crate::editor::{CompletionProvider, EditorHost};
use crate::error::{LaunchError, Result};
use crate::persistence::{PersistencePort, AUTOCOMPLETE_COLLECTION_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How long to wait for the catalog producer before reading the stored catalog.
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_millis(5000);

/// One completion candidate.
///
/// Everything besides `name` (caption, score, meta, ...) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    pub name: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl SuggestionEntry {
    /// Creates an entry with no metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Map::new(),
        }
    }

    /// Adds a metadata field.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Ordered suggestions with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionSet {
    entries: Arc<Vec<SuggestionEntry>>,
}

impl SuggestionSet {
    /// Builds a set from a raw catalog. The first entry for each name wins and
    /// catalog order is preserved.
    pub fn from_catalog(raw: impl IntoIterator<Item = SuggestionEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries: Vec<_> = raw
            .into_iter()
            .filter(|entry| seen.insert(entry.name.clone()))
            .collect();
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn entries(&self) -> &[SuggestionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry names in order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

/// Completion provider that always returns the whole set.
pub struct SuggestionProvider {
    set: SuggestionSet,
}

impl SuggestionProvider {
    pub fn new(set: SuggestionSet) -> Self {
        Self { set }
    }
}

impl CompletionProvider for SuggestionProvider {
    fn get_completions(&self, _position: usize, _prefix: &str) -> Vec<SuggestionEntry> {
        self.set.entries().to_vec()
    }
}

/// Parses the stored catalog, a JSON array of objects with a string `name`.
///
/// Elements without a usable `name` are skipped.
pub fn parse_catalog(json: &str) -> Result<Vec<SuggestionEntry>> {
    let raw: Vec<Value> = serde_json::from_str(json)
        .map_err(|e| LaunchError::persistence(format!("Malformed autocomplete catalog: {e}")))?;

    let total = raw.len();
    let entries: Vec<SuggestionEntry> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    if entries.len() < total {
        warn!(
            skipped = total - entries.len(),
            "Ignoring catalog entries without a name"
        );
    }
    Ok(entries)
}

/// Sending half of the catalog readiness signal, held by the catalog producer.
#[derive(Debug)]
pub struct CatalogPublisher {
    tx: watch::Sender<Option<Vec<SuggestionEntry>>>,
}

impl CatalogPublisher {
    /// Publishes a complete catalog, replacing any earlier one.
    pub fn publish(&self, entries: Vec<SuggestionEntry>) {
        debug!(entries = entries.len(), "catalog published");
        self.tx.send_replace(Some(entries));
    }
}

/// Receiving half of the catalog readiness signal.
pub type CatalogReceiver = watch::Receiver<Option<Vec<SuggestionEntry>>>;

/// Creates the readiness signal between the catalog producer and the aggregator.
pub fn catalog_channel() -> (CatalogPublisher, CatalogReceiver) {
    let (tx, rx) = watch::channel(None);
    (CatalogPublisher { tx }, rx)
}

/// Builds the suggestion set once per mount and registers it with the editor.
pub struct AutocompleteAggregator {
    editor: Arc<dyn EditorHost>,
    store: Arc<dyn PersistencePort>,
    settle_timeout: Duration,
}

impl AutocompleteAggregator {
    pub fn new(editor: Arc<dyn EditorHost>, store: Arc<dyn PersistencePort>) -> Self {
        Self {
            editor,
            store,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
        }
    }

    /// Sets how long to wait for a published catalog before falling back to
    /// the stored one.
    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// Reads the catalog kept in the persistence store.
    ///
    /// A missing or malformed catalog yields an empty list.
    pub fn stored_catalog(&self) -> Vec<SuggestionEntry> {
        match self.store.get(AUTOCOMPLETE_COLLECTION_KEY) {
            Ok(Some(json)) => parse_catalog(&json).unwrap_or_else(|e| {
                warn!("{e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read autocomplete catalog: {e}");
                Vec::new()
            }
        }
    }

    /// Deduplicates `raw` and installs it as the editor's completion provider.
    pub fn install(&self, raw: Vec<SuggestionEntry>) -> SuggestionSet {
        let set = SuggestionSet::from_catalog(raw);
        info!(suggestions = set.len(), "registering completion provider");
        self.editor
            .register_completion_provider(Arc::new(SuggestionProvider::new(set.clone())));
        set
    }

    /// Waits for the catalog, then installs the suggestions.
    ///
    /// Uses the published catalog when it arrives within the settle timeout,
    /// otherwise the stored one.
    pub async fn run(self, mut catalog: CatalogReceiver) -> SuggestionSet {
        let published = tokio::time::timeout(self.settle_timeout, async {
            catalog
                .wait_for(Option::is_some)
                .await
                .map(|entries| (*entries).clone())
        })
        .await;

        let raw = match published {
            Ok(Ok(Some(entries))) => entries,
            Ok(Ok(None)) | Ok(Err(_)) => {
                debug!("catalog producer went away, using stored catalog");
                self.stored_catalog()
            }
            Err(_) => {
                debug!("no catalog published within settle timeout, using stored catalog");
                self.stored_catalog()
            }
        };

        self.install(raw)
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    pub fn mount(self, catalog: CatalogReceiver) -> JoinHandle<SuggestionSet> {
        tokio::spawn(self.run(catalog))
    }
}
