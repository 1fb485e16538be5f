use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::SourceId;
use crate::model::item::Item;
use crate::model::outcome::SessionKind;
use crate::model::session::Session;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemSourceError {
    #[error("item source title cannot be empty")]
    EmptyTitle,

    #[error("item source has no items")]
    Empty,

    #[error("questions and cards cannot share an item source")]
    MixedKinds,

    #[error("item id {0} appears more than once")]
    DuplicateItem(u64),
}

/// A named, ordered collection of questions or cards: one quiz or one deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSource {
    id: SourceId,
    title: String,
    subject: String,
    kind: SessionKind,
    items: Vec<Item>,
}

impl ItemSource {
    /// Create a validated item source.
    ///
    /// # Errors
    ///
    /// Returns `ItemSourceError` if the title is blank, there are no items,
    /// the items mix questions and cards, or an item id repeats.
    pub fn new(
        id: SourceId,
        title: impl Into<String>,
        subject: impl Into<String>,
        items: Vec<Item>,
    ) -> Result<Self, ItemSourceError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ItemSourceError::EmptyTitle);
        }
        if items.is_empty() {
            return Err(ItemSourceError::Empty);
        }
        let kind = Session::kind_of(&items).map_err(|_| ItemSourceError::MixedKinds)?;

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                return Err(ItemSourceError::DuplicateItem(item.id().value()));
            }
        }

        Ok(Self {
            id,
            title,
            subject: subject.into().trim().to_string(),
            kind,
            items,
        })
    }

    #[must_use]
    pub fn id(&self) -> SourceId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copy of the items, the snapshot a session is started from.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.clone()
    }
}
