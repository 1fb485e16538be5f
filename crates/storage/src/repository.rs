use async_trait::async_trait;
use edu_core::model::{ItemError, ItemSource, ItemSourceError, SessionKind, SourceId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    InvalidSource(#[from] ItemSourceError),

    #[error(transparent)]
    InvalidItem(#[from] ItemError),
}

/// Lightweight listing entry, so callers can browse without cloning every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceListing {
    pub id: SourceId,
    pub title: String,
    pub subject: String,
    pub kind: SessionKind,
    pub item_count: usize,
}

impl SourceListing {
    #[must_use]
    pub fn from_source(source: &ItemSource) -> Self {
        Self {
            id: source.id(),
            title: source.title().to_owned(),
            subject: source.subject().to_owned(),
            kind: source.kind(),
            item_count: source.len(),
        }
    }
}

/// Repository contract for quizzes and flashcard decks.
#[async_trait]
pub trait ItemSourceRepository: Send + Sync {
    /// Persist or replace an item source.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source cannot be stored.
    async fn upsert_source(&self, source: &ItemSource) -> Result<(), StorageError>;

    /// Fetch an item source by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_source(&self, id: SourceId) -> Result<ItemSource, StorageError>;

    /// List sources ordered by ID, optionally restricted to one kind.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn list_sources(
        &self,
        kind: Option<SessionKind>,
    ) -> Result<Vec<SourceListing>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sources: Arc<Mutex<BTreeMap<SourceId, ItemSource>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemSourceRepository for InMemoryRepository {
    async fn upsert_source(&self, source: &ItemSource) -> Result<(), StorageError> {
        let mut guard = self
            .sources
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(source.id(), source.clone());
        Ok(())
    }

    async fn get_source(&self, id: SourceId) -> Result<ItemSource, StorageError> {
        let guard = self
            .sources
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_sources(
        &self,
        kind: Option<SessionKind>,
    ) -> Result<Vec<SourceListing>, StorageError> {
        let guard = self
            .sources
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .values()
            .filter(|source| kind.is_none_or(|k| source.kind() == k))
            .map(SourceListing::from_source)
            .collect())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sources: Arc<dyn ItemSourceRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            sources: Arc::new(InMemoryRepository::new()),
        }
    }

    /// In-memory storage preloaded with the bundled quizzes and decks.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a bundled source fails validation.
    pub async fn seeded() -> Result<Self, StorageError> {
        let storage = Self::in_memory();
        crate::catalog::seed(storage.sources.as_ref()).await?;
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_core::model::{CardFaces, Item, ItemId};

    fn deck(id: u64, title: &str) -> ItemSource {
        let cards = vec![Item::card(
            ItemId::new(1),
            CardFaces::new("front", "back").unwrap(),
        )];
        ItemSource::new(SourceId::new(id), title, "physics", cards).unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_existing_source() {
        let repo = InMemoryRepository::new();
        repo.upsert_source(&deck(1, "First")).await.unwrap();
        repo.upsert_source(&deck(1, "Renamed")).await.unwrap();

        let fetched = repo.get_source(SourceId::new(1)).await.unwrap();
        assert_eq!(fetched.title(), "Renamed");
    }

    #[tokio::test]
    async fn missing_source_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.get_source(SourceId::new(9)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn list_filters_by_kind_in_id_order() {
        let repo = InMemoryRepository::new();
        repo.upsert_source(&deck(3, "C")).await.unwrap();
        repo.upsert_source(&deck(2, "B")).await.unwrap();

        let cards = repo.list_sources(Some(SessionKind::Flashcard)).await.unwrap();
        let ids: Vec<_> = cards.iter().map(|l| l.id.value()).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(repo.list_sources(Some(SessionKind::Quiz)).await.unwrap().is_empty());
    }
}
