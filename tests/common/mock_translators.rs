/*!
 * Mock chunk translators for testing the scheduler and pipeline without a
 * live provider.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use marktwai::errors::TranslationError;
use marktwai::translation::ChunkTranslator;

/// What the mock does to each chunk
pub enum MockBehavior {
    /// Return the chunk unchanged
    Identity,

    /// Fail every primary attempt, succeed on fallback
    FailPrimary,

    /// Fail both attempts
    AlwaysFail,

    /// Lowercase anchor tokens, simulating a model that rewrites them
    CorruptAnchors,

    /// Strip ATX header markers, simulating structure loss
    DropHeaders,
}

/// Configurable mock translator with in-flight instrumentation
pub struct MockTranslator {
    behavior: MockBehavior,

    /// Per-call delay in milliseconds, from the call ordinal
    delay_fn: Option<Box<dyn Fn(usize) -> u64 + Send + Sync>>,

    calls: AtomicUsize,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay_fn: None,
            calls: AtomicUsize::new(0),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fixed delay per call
    pub fn with_delay_ms(self, delay_ms: u64) -> Self {
        self.with_delay_fn(move |_| delay_ms)
    }

    /// Delay computed from the call ordinal, for completion-skew tests
    pub fn with_delay_fn(mut self, f: impl Fn(usize) -> u64 + Send + Sync + 'static) -> Self {
        self.delay_fn = Some(Box::new(f));
        self
    }

    /// Total number of translate calls (both attempts count)
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of concurrent calls observed
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn transform(&self, text: &str) -> String {
        match self.behavior {
            MockBehavior::Identity | MockBehavior::FailPrimary => text.to_string(),
            MockBehavior::AlwaysFail => text.to_string(),
            MockBehavior::CorruptAnchors => text.replace("<<CODE_", "<<code_"),
            MockBehavior::DropHeaders => text
                .lines()
                .map(|line| line.trim_start_matches(['#', ' ']))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[async_trait]
impl ChunkTranslator for MockTranslator {
    async fn translate_chunk(
        &self,
        text: &str,
        use_fallback: bool,
    ) -> Result<String, TranslationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay_fn) = &self.delay_fn {
            tokio::time::sleep(Duration::from_millis(delay_fn(call))).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::AlwaysFail => Err(TranslationError::EmptyResponse),
            MockBehavior::FailPrimary if !use_fallback => Err(TranslationError::EmptyResponse),
            _ => Ok(self.transform(text)),
        }
    }
}
