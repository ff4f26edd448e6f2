//! End-to-end quiz tests: mock sources through the catalog loader into a
//! quiz session.

use std::sync::Arc;
use std::time::Duration;

use babel_core::catalog::CatalogLoader;
use babel_core::error::{QuizError, SourceError};
use babel_core::seed::builtin_seed;
use babel_core::session::{Outcome, QuizSession, QuizState};
use babel_core::traits::VocabSource;
use babel_sources::mock::MockSource;

fn spanish_source() -> Arc<MockSource> {
    Arc::new(MockSource::with_words(
        "Spanish",
        &[("El agua", "The water", ["The fire", "The earth", "The sky"])],
    ))
}

#[tokio::test]
async fn e2e_spanish_round() {
    let loader = CatalogLoader::new(vec![spanish_source()], vec![], Duration::from_secs(60));
    let catalog = loader.get_catalog().await.unwrap();

    let mut session = QuizSession::with_seed(&catalog, "Spanish", 11).unwrap();
    assert_eq!(session.state(), QuizState::AwaitingQuestion);

    session.select_language(&catalog, "Spanish").unwrap();
    let question = session.current_question().unwrap();
    assert_eq!(question.prompt(), "El agua");
    assert_eq!(question.audio_code(), Some("es"));

    let outcome = session.submit_answer("The water").unwrap();
    assert!(outcome.is_correct());
    assert_eq!(session.xp(), 10);

    session.next_question(&catalog).unwrap();
    assert_eq!(session.submit_answer("The fire").unwrap(), Outcome::Incorrect);
    assert_eq!(session.xp(), 10);
}

#[tokio::test]
async fn e2e_unavailable_source_does_not_block_quiz() {
    let down = Arc::new(MockSource::failing(
        "German",
        SourceError::unavailable("german-sheet", "connection refused"),
    ));
    let sources: Vec<Arc<dyn VocabSource>> = vec![spanish_source(), down.clone()];
    let loader = CatalogLoader::new(sources, builtin_seed().unwrap(), Duration::from_secs(60));

    let catalog = loader.get_catalog().await.unwrap();
    assert_eq!(
        catalog.languages().collect::<Vec<_>>(),
        vec!["Hebrew", "Spanish"]
    );
    assert_eq!(catalog.warnings().len(), 1);
    assert_eq!(down.call_count(), 1);

    let mut session = QuizSession::new(&catalog, "German").unwrap();
    assert!(matches!(
        session.select_language(&catalog, "German"),
        Err(QuizError::UnknownLanguage(_))
    ));
    session.select_language(&catalog, "Hebrew").unwrap();
    assert_eq!(session.state(), QuizState::AwaitingAnswer);
}

#[tokio::test(start_paused = true)]
async fn e2e_catalog_refresh_after_ttl() {
    let spanish = spanish_source();
    let loader = CatalogLoader::new(vec![spanish.clone()], vec![], Duration::from_secs(600));

    let first = loader.get_catalog().await.unwrap();
    let again = loader.get_catalog().await.unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(spanish.call_count(), 1);

    tokio::time::advance(Duration::from_secs(601)).await;
    let refreshed = loader.get_catalog().await.unwrap();
    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert_eq!(spanish.call_count(), 2);

    // A session keeps working against the catalog it was given.
    let mut session = QuizSession::with_seed(&first, "Spanish", 1).unwrap();
    session.next_question(&refreshed).unwrap();
    assert_eq!(session.current_question().unwrap().prompt(), "El agua");
}
