use std::sync::Arc;

use edu_core::model::{Outcome, SessionKind};
use edu_core::time::fixed_now;
use services::{Clock, RunnerPhase, ScoreBand, StudyError, StudyLoopService};
use storage::catalog::{MATH_QUIZ, PHYSICS_DECK};
use storage::{Storage, StorageError};

async fn study_loop() -> StudyLoopService {
    let storage = Storage::seeded().await.unwrap();
    StudyLoopService::new(Clock::fixed(fixed_now()), Arc::clone(&storage.sources))
}

#[tokio::test]
async fn quiz_runs_to_completion_over_seeded_catalog() {
    let study = study_loop().await;
    let (listing, mut runner) = study.start_session(MATH_QUIZ).await.unwrap();
    assert_eq!(listing.kind, SessionKind::Quiz);
    assert_eq!(listing.item_count, 5);

    // Answer every question correctly except the second one.
    let mut turn = 0;
    while runner.phase() == RunnerPhase::InProgress {
        let question = runner.current_item().unwrap().as_question().unwrap();
        let correct = question.correct_index();
        let choice = if turn == 1 {
            (correct + 1) % question.options().len()
        } else {
            correct
        };
        runner.answer(choice).unwrap();
        turn += 1;
    }

    let summary = runner.summarize().unwrap();
    assert_eq!(summary.total(), 5);
    assert_eq!(summary.count(Outcome::Correct), 4);
    assert_eq!(summary.rounded_percent(), 80);
    assert_eq!(
        ScoreBand::from_percent(summary.score_percent()),
        ScoreBand::Excellent
    );
}

#[tokio::test]
async fn flashcard_deck_study_again_resets_progress() {
    let study = study_loop().await;
    let (_listing, mut runner) = study.start_session(PHYSICS_DECK).await.unwrap();
    let original: Vec<_> = runner.session().unwrap().items().to_vec();

    while runner.phase() == RunnerPhase::InProgress {
        runner.reveal().unwrap();
        runner.assess(false).unwrap();
    }
    assert_eq!(runner.summarize().unwrap().unknown(), 5);

    let session = runner.restart().unwrap();
    assert_eq!(session.position(), 0);
    assert_eq!(session.items(), original.as_slice());
}

#[tokio::test]
async fn shuffled_snapshot_keeps_every_item() {
    let study = study_loop().await.with_shuffle(true);
    let (_listing, runner) = study.start_session(MATH_QUIZ).await.unwrap();

    let mut ids: Vec<_> = runner
        .session()
        .unwrap()
        .items()
        .iter()
        .map(|item| item.id().value())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn unknown_source_is_a_storage_error() {
    let study = study_loop().await;
    let err = study
        .start_session(edu_core::model::SourceId::new(404))
        .await
        .unwrap_err();
    assert!(matches!(err, StudyError::Storage(StorageError::NotFound)));
}

#[tokio::test]
async fn listing_filters_by_kind() {
    let study = study_loop().await;
    let decks = study.list_sources(Some(SessionKind::Flashcard)).await.unwrap();
    assert_eq!(decks.len(), 3);
    let all = study.list_sources(None).await.unwrap();
    assert_eq!(all.len(), 4);
}
