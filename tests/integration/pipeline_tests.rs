/*!
 * End-to-end pipeline tests: isolation, splitting, scheduling, restoration
 * and validation gating working together
 */

use std::sync::Arc;

use marktwai::errors::PipelineError;
use marktwai::markdown::MarkdownSplitter;
use marktwai::translation::{DocumentPipeline, Scheduler};
use marktwai::validation::ValidationService;

use crate::common::mock_translators::{MockBehavior, MockTranslator};
use crate::common::sample_document;

fn pipeline(max_bytes: usize, budget: usize) -> DocumentPipeline {
    DocumentPipeline::with_parts(
        MarkdownSplitter::new(max_bytes, 3),
        Scheduler::new(budget),
        ValidationService::new(),
    )
}

#[tokio::test]
async fn test_runDocument_withIdentityTranslation_shouldReproduceSource() {
    let p = pipeline(10_000, 4);
    let raw = sample_document();
    let translator = Arc::new(MockTranslator::new(MockBehavior::Identity));

    let result = p.run_document("sample.md", &raw, translator, |_, _| {}).await;

    assert!(result.accepted());
    assert_eq!(result.text.as_deref(), Some(raw.as_str()));
    assert_eq!(result.failed_chunks, 0);
    assert_eq!(result.fallback_chunks, 0);
    assert!(result.report.is_some());
}

#[tokio::test]
async fn test_runDocument_multiChunkWithSkew_shouldReassembleInOrder() {
    // Small budget forces several chunks; skewed delays make later chunks
    // finish before earlier ones
    let p = pipeline(60, 8);
    let raw = sample_document();
    let translator = Arc::new(
        MockTranslator::new(MockBehavior::Identity)
            .with_delay_fn(|call| 60u64.saturating_sub(call as u64 * 10)),
    );

    let result = p.run_document("sample.md", &raw, translator, |_, _| {}).await;

    assert!(result.accepted(), "error: {:?}", result.error.map(|e| e.to_string()));
    assert_eq!(result.text.as_deref(), Some(raw.as_str()));
}

#[tokio::test]
async fn test_runDocument_withCorruptedAnchors_shouldRejectDocument() {
    let p = pipeline(10_000, 4);
    let raw = sample_document();
    let translator = Arc::new(MockTranslator::new(MockBehavior::CorruptAnchors));

    let result = p.run_document("sample.md", &raw, translator, |_, _| {}).await;

    assert!(!result.accepted());
    assert!(result.text.is_none());
    assert!(matches!(
        result.error,
        Some(PipelineError::CodeBlockRestoration { .. })
    ));
}

#[tokio::test]
async fn test_runDocument_withLostHeaders_shouldRejectDocument() {
    let p = pipeline(10_000, 4);
    let raw = sample_document();
    let translator = Arc::new(MockTranslator::new(MockBehavior::DropHeaders));

    let result = p.run_document("sample.md", &raw, translator, |_, _| {}).await;

    assert!(!result.accepted());
    assert!(matches!(
        result.error,
        Some(PipelineError::StructureValidation { .. })
    ));
    // The report survives rejection for diagnostics
    let report = result.report.unwrap();
    assert!(!report.structure_ok);
    assert!(report.translated_headers < report.source_headers);
}

#[tokio::test]
async fn test_runDocument_withTotalChunkFailure_shouldKeepSourceText() {
    // Chunks that fail both attempts keep their original text; the result
    // is a partly-translated document, not a lost one
    let p = pipeline(10_000, 4);
    let raw = sample_document();
    let translator = Arc::new(MockTranslator::new(MockBehavior::AlwaysFail));

    let result = p.run_document("sample.md", &raw, translator, |_, _| {}).await;

    assert!(result.accepted());
    assert_eq!(result.text.as_deref(), Some(raw.as_str()));
    assert!(result.failed_chunks > 0);
}

#[tokio::test]
async fn test_runDocument_withFailingPrimary_shouldCountFallbackChunks() {
    let p = pipeline(60, 4);
    let raw = sample_document();
    let translator = Arc::new(MockTranslator::new(MockBehavior::FailPrimary));

    let result = p.run_document("sample.md", &raw, translator, |_, _| {}).await;

    assert!(result.accepted());
    assert_eq!(result.failed_chunks, 0);
    assert!(result.fallback_chunks > 0);
}

#[tokio::test]
async fn test_runDocument_shouldReportMonotonicProgress() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let p = pipeline(60, 2);
    let raw = sample_document();
    let translator = Arc::new(MockTranslator::new(MockBehavior::Identity).with_delay_ms(5));
    let last_done = Arc::new(AtomicUsize::new(0));
    let last_cb = last_done.clone();

    let result = p
        .run_document("sample.md", &raw, translator, move |done, total| {
            let previous = last_cb.fetch_max(done, Ordering::SeqCst);
            assert!(done > previous, "progress went backwards");
            assert!(done <= total);
        })
        .await;

    assert!(result.accepted());
    assert!(last_done.load(Ordering::SeqCst) > 0);
}
