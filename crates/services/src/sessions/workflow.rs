use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;

use edu_core::model::{SessionKind, SourceId};
use storage::ItemSourceRepository;
use storage::repository::SourceListing;

use super::runner::SessionRunner;
use crate::Clock;
use crate::error::StudyError;

/// Starts runners from the item-source repository.
#[derive(Clone)]
pub struct StudyLoopService {
    clock: Clock,
    sources: Arc<dyn ItemSourceRepository>,
    shuffle: bool,
}

impl StudyLoopService {
    #[must_use]
    pub fn new(clock: Clock, sources: Arc<dyn ItemSourceRepository>) -> Self {
        Self {
            clock,
            sources,
            shuffle: false,
        }
    }

    /// Shuffle the snapshot when a session starts. Restarts keep the shuffled order.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// List the quizzes and decks available to study.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if the repository cannot be read.
    pub async fn list_sources(
        &self,
        kind: Option<SessionKind>,
    ) -> Result<Vec<SourceListing>, StudyError> {
        Ok(self.sources.list_sources(kind).await?)
    }

    /// Load `source_id` and start a runner over a snapshot of its items.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if the source is missing, or `StudyError::Runner`
    /// if the session cannot start.
    pub async fn start_session(
        &self,
        source_id: SourceId,
    ) -> Result<(SourceListing, SessionRunner), StudyError> {
        let source = self.sources.get_source(source_id).await?;
        let mut items = source.snapshot();
        if self.shuffle {
            items.shuffle(&mut rng());
        }

        let mut runner = SessionRunner::new(self.clock);
        runner.start(items)?;
        tracing::info!(
            source = %source_id,
            title = source.title(),
            kind = %source.kind(),
            shuffled = self.shuffle,
            "study session started"
        );
        Ok((SourceListing::from_source(&source), runner))
    }
}
