/*!
 * Globally bounded concurrent chunk scheduling.
 *
 * This module drives chunk translation with a single global budget of
 * in-flight requests. The budget holds across documents: when several
 * documents are admitted together, their chunks share one semaphore, so
 * the provider never sees more concurrent requests than configured.
 *
 * Each chunk gets two attempts: the primary model first, then the
 * fallback model. A chunk that fails both keeps its original text in the
 * outcome so document assembly never loses content.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{error, warn};
use tokio::sync::Semaphore;

use crate::translation::ChunkTranslator;

/// Result of translating one chunk
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// Ordinal position of the chunk in the submitted slice
    pub index: usize,

    /// Translated text, or the original text when both attempts failed
    pub text: String,

    /// Whether any attempt produced a translation
    pub succeeded: bool,

    /// Whether the fallback model produced the accepted text
    pub used_fallback: bool,
}

/// Scheduler holding the global in-flight budget
pub struct Scheduler {
    /// Maximum number of chunks in flight at once
    budget: usize,

    /// Chunks currently in flight
    in_flight: Arc<AtomicUsize>,

    /// Highest in-flight count observed during the run
    peak_in_flight: Arc<AtomicUsize>,
}

impl Scheduler {
    /// Create a new scheduler with the given concurrency budget
    pub fn new(budget: usize) -> Self {
        Self {
            budget: budget.max(1),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The configured concurrency budget
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Highest number of chunks observed in flight simultaneously
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Group documents into admission waves by chunk count.
    ///
    /// Documents are admitted greedily in order until the next one would
    /// push the wave's total chunk count past the budget. A document whose
    /// chunk count alone exceeds the budget still gets its own wave; the
    /// semaphore throttles its chunks, so admitting it is safe.
    pub fn plan_admission(&self, chunk_counts: &[usize]) -> Vec<Vec<usize>> {
        let mut waves: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut used = 0usize;

        for (doc_index, &count) in chunk_counts.iter().enumerate() {
            if !current.is_empty() && used + count > self.budget {
                waves.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(doc_index);
            used += count;
        }
        if !current.is_empty() {
            waves.push(current);
        }

        waves
    }

    /// Translate a batch of chunks concurrently.
    ///
    /// Completion order is arbitrary; the returned outcomes are sorted back
    /// into submission order. The progress callback receives
    /// `(completed, total)` after each chunk settles.
    pub async fn translate_chunks(
        &self,
        chunks: &[String],
        translator: Arc<dyn ChunkTranslator>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + Sync + 'static,
    ) -> Vec<TranslationOutcome> {
        if chunks.is_empty() {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.budget));
        let total = chunks.len();
        let completed = Arc::new(AtomicUsize::new(0));

        let mut outcomes = stream::iter(chunks.iter().cloned().enumerate())
            .map(|(index, text)| {
                let translator = translator.clone();
                let semaphore = semaphore.clone();
                let completed = completed.clone();
                let progress_callback = progress_callback.clone();
                let in_flight = self.in_flight.clone();
                let peak_in_flight = self.peak_in_flight.clone();

                async move {
                    let _permit = semaphore.acquire().await.expect("semaphore closed");

                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak_in_flight.fetch_max(now, Ordering::SeqCst);

                    let outcome = Self::translate_with_fallback(&text, index, &*translator).await;

                    in_flight.fetch_sub(1, Ordering::SeqCst);

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(done, total);

                    outcome
                }
            })
            .buffer_unordered(self.budget)
            .collect::<Vec<_>>()
            .await;

        // Restore submission order regardless of completion order
        outcomes.sort_by_key(|o| o.index);
        outcomes
    }

    /// Two-stage translation: primary model, then fallback model
    async fn translate_with_fallback(
        text: &str,
        index: usize,
        translator: &dyn ChunkTranslator,
    ) -> TranslationOutcome {
        match translator.translate_chunk(text, false).await {
            Ok(translated) => TranslationOutcome {
                index,
                text: translated,
                succeeded: true,
                used_fallback: false,
            },
            Err(primary_err) => {
                warn!(
                    "Chunk {} failed on primary model, retrying with fallback: {}",
                    index, primary_err
                );

                match translator.translate_chunk(text, true).await {
                    Ok(translated) => TranslationOutcome {
                        index,
                        text: translated,
                        succeeded: true,
                        used_fallback: true,
                    },
                    Err(fallback_err) => {
                        error!(
                            "Chunk {} failed on fallback model, keeping original text: {}",
                            index, fallback_err
                        );
                        TranslationOutcome {
                            index,
                            text: text.to_string(),
                            succeeded: false,
                            used_fallback: true,
                        }
                    }
                }
            }
        }
    }
}
