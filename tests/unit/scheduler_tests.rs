/*!
 * Tests for the bounded concurrent scheduler
 */

use std::sync::Arc;

use marktwai::translation::Scheduler;

use crate::common::mock_translators::{MockBehavior, MockTranslator};

fn numbered_chunks(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("chunk number {}", i)).collect()
}

#[tokio::test]
async fn test_translateChunks_shouldNeverExceedBudget() {
    let scheduler = Scheduler::new(3);
    let translator = Arc::new(MockTranslator::new(MockBehavior::Identity).with_delay_ms(20));

    let outcomes = scheduler
        .translate_chunks(&numbered_chunks(12), translator.clone(), |_, _| {})
        .await;

    assert_eq!(outcomes.len(), 12);
    assert!(
        translator.peak_in_flight() <= 3,
        "observed {} concurrent calls with budget 3",
        translator.peak_in_flight()
    );
    assert!(scheduler.peak_in_flight() <= 3);
}

#[tokio::test]
async fn test_translateChunks_shouldSaturateBudget() {
    let scheduler = Scheduler::new(4);
    let translator = Arc::new(MockTranslator::new(MockBehavior::Identity).with_delay_ms(30));

    scheduler
        .translate_chunks(&numbered_chunks(16), translator.clone(), |_, _| {})
        .await;

    // With enough work and a uniform delay the budget should fill up
    assert_eq!(translator.peak_in_flight(), 4);
}

#[tokio::test]
async fn test_translateChunks_withCompletionSkew_shouldReorderOutcomes() {
    let scheduler = Scheduler::new(8);
    // Earlier calls sleep longer, so later chunks finish first
    let translator = Arc::new(
        MockTranslator::new(MockBehavior::Identity)
            .with_delay_fn(|call| 80u64.saturating_sub(call as u64 * 10)),
    );

    let chunks = numbered_chunks(8);
    let outcomes = scheduler
        .translate_chunks(&chunks, translator, |_, _| {})
        .await;

    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.index, i);
        assert_eq!(outcome.text, chunks[i]);
    }
}

#[tokio::test]
async fn test_translateChunks_withFailingPrimary_shouldRetryEveryChunk() {
    let scheduler = Scheduler::new(2);
    let translator = Arc::new(MockTranslator::new(MockBehavior::FailPrimary));

    let outcomes = scheduler
        .translate_chunks(&numbered_chunks(5), translator.clone(), |_, _| {})
        .await;

    assert!(outcomes.iter().all(|o| o.succeeded && o.used_fallback));
    // One primary and one fallback attempt per chunk
    assert_eq!(translator.call_count(), 10);
}

#[tokio::test]
async fn test_translateChunks_withTotalFailure_shouldKeepOriginals() {
    let scheduler = Scheduler::new(2);
    let translator = Arc::new(MockTranslator::new(MockBehavior::AlwaysFail));

    let chunks = numbered_chunks(3);
    let outcomes = scheduler
        .translate_chunks(&chunks, translator, |_, _| {})
        .await;

    for (i, outcome) in outcomes.iter().enumerate() {
        assert!(!outcome.succeeded);
        assert_eq!(outcome.text, chunks[i]);
    }
}

#[tokio::test]
async fn test_translateChunks_withEmptyBatch_shouldReturnNothing() {
    let scheduler = Scheduler::new(4);
    let translator = Arc::new(MockTranslator::new(MockBehavior::Identity));

    let outcomes = scheduler.translate_chunks(&[], translator, |_, _| {}).await;

    assert!(outcomes.is_empty());
    assert_eq!(scheduler.peak_in_flight(), 0);
}
