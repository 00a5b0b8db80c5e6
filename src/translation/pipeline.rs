/*!
 * Per-document translation pipeline.
 *
 * For each document: isolate code regions behind anchors, split the clean
 * text into byte-budgeted chunks, translate the chunks through the
 * scheduler, join them back in order, restore the code regions, and gate
 * the result through validation. A batch run admits documents in waves so
 * the global concurrency budget holds across documents.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::app_config::Config;
use crate::errors::PipelineError;
use crate::markdown::{Chunk, CodeRegionIsolator, MarkdownSplitter, ProtectedRegion};
use crate::translation::scheduler::{Scheduler, TranslationOutcome};
use crate::translation::ChunkTranslator;
use crate::validation::{ValidationReport, ValidationService};

/// A document prepared for translation
pub struct DocumentJob {
    /// Document identifier (path or name)
    pub name: String,

    /// Original text, code regions intact
    pub raw_text: String,

    /// Text with code regions replaced by anchors
    pub clean_text: String,

    /// Extracted code regions, by anchor id
    pub regions: Vec<ProtectedRegion>,

    /// Ordered chunks of the clean text
    pub chunks: Vec<Chunk>,
}

/// Final outcome for one document
pub struct DocumentResult {
    /// Document identifier
    pub name: String,

    /// Accepted output text; `None` when the document was rejected
    pub text: Option<String>,

    /// Validation report, when validation ran
    pub report: Option<ValidationReport>,

    /// Number of chunks that kept their original text after both attempts
    pub failed_chunks: usize,

    /// Number of chunks translated by the fallback model
    pub fallback_chunks: usize,

    /// Fatal error, when the pipeline could not produce output
    pub error: Option<PipelineError>,
}

impl DocumentResult {
    /// Whether this document produced accepted output
    pub fn accepted(&self) -> bool {
        self.text.is_some()
    }
}

/// Summary of a batch run
pub struct BatchSummary {
    /// Number of documents submitted
    pub total: usize,

    /// Number of documents accepted
    pub succeeded: usize,

    /// Number of documents rejected or failed
    pub failed: usize,

    /// Wall-clock time for the whole batch
    pub elapsed: Duration,
}

/// Pipeline wiring the splitter, scheduler and validators together
pub struct DocumentPipeline {
    splitter: MarkdownSplitter,
    scheduler: Scheduler,
    validation: ValidationService,
}

impl DocumentPipeline {
    /// Create a pipeline from the application configuration
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            MarkdownSplitter::new(
                config.splitting.max_bytes_per_chunk,
                config.splitting.header_split_level,
            ),
            Scheduler::new(config.splitting.concurrent_chunks),
            ValidationService::new(),
        )
    }

    /// Create a pipeline from explicit components
    pub fn with_parts(
        splitter: MarkdownSplitter,
        scheduler: Scheduler,
        validation: ValidationService,
    ) -> Self {
        Self {
            splitter,
            scheduler,
            validation,
        }
    }

    /// The scheduler driving this pipeline
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Prepare a document: isolate code regions and split into chunks
    pub fn prepare(&self, name: &str, raw_text: &str) -> DocumentJob {
        let (clean_text, regions) = CodeRegionIsolator::extract(raw_text);
        let chunks = self.splitter.split(&clean_text);

        info!(
            "Prepared '{}': {} bytes, {} code regions, {} chunks",
            name,
            raw_text.len(),
            regions.len(),
            chunks.len()
        );

        DocumentJob {
            name: name.to_string(),
            raw_text: raw_text.to_string(),
            clean_text,
            regions,
            chunks,
        }
    }

    /// Join translated chunks back into one clean text, in chunk order.
    ///
    /// Providers habitually trim or pad trailing newlines; each chunk's
    /// trailing newline run is normalized back to what the source chunk
    /// had, so a heading ending one chunk never fuses with the text
    /// starting the next.
    pub fn join_translated(job: &DocumentJob, outcomes: &[TranslationOutcome]) -> String {
        let mut joined = String::with_capacity(job.clean_text.len());

        for (chunk, outcome) in job.chunks.iter().zip(outcomes.iter()) {
            joined.push_str(&normalize_tail(&chunk.content, &outcome.text));
        }

        joined
    }

    /// Restore code regions and validate the assembled document.
    ///
    /// Validation compares against the raw source: masking makes fenced
    /// code invisible to the validators, so restored regions cannot skew
    /// the counts.
    pub fn assemble(
        &self,
        job: &DocumentJob,
        translated_clean: &str,
    ) -> Result<(String, ValidationReport), PipelineError> {
        let final_text = CodeRegionIsolator::restore(translated_clean, &job.regions)
            .map_err(|failure| PipelineError::CodeBlockRestoration {
                document: job.name.clone(),
                reason: failure.to_string(),
            })?;

        let report = self.validation.validate_document(&job.raw_text, &final_text);
        Ok((final_text, report))
    }

    /// Run the full pipeline for a single document
    pub async fn run_document(
        &self,
        name: &str,
        raw_text: &str,
        translator: Arc<dyn ChunkTranslator>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + Sync + 'static,
    ) -> DocumentResult {
        let job = self.prepare(name, raw_text);
        let chunk_texts: Vec<String> = job.chunks.iter().map(|c| c.content.clone()).collect();

        let outcomes = self
            .scheduler
            .translate_chunks(&chunk_texts, translator, progress_callback)
            .await;

        self.finish_document(&job, &outcomes)
    }

    /// Run a batch of documents with cross-document admission.
    ///
    /// Documents are grouped into waves whose combined chunk counts fit
    /// the budget; within a wave all chunks share one bounded stream. The
    /// progress callback receives `(completed, total)` over all chunks of
    /// the batch.
    pub async fn run_batch(
        &self,
        documents: Vec<(String, String)>,
        translator: Arc<dyn ChunkTranslator>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + Sync + 'static,
    ) -> (Vec<DocumentResult>, BatchSummary) {
        let start_time = Instant::now();

        let jobs: Vec<DocumentJob> = documents
            .into_iter()
            .map(|(name, raw)| self.prepare(&name, &raw))
            .collect();

        let chunk_counts: Vec<usize> = jobs.iter().map(|j| j.chunks.len()).collect();
        let grand_total: usize = chunk_counts.iter().sum();
        let waves = self.scheduler.plan_admission(&chunk_counts);

        info!(
            "Batch of {} documents, {} chunks, {} admission waves (budget {})",
            jobs.len(),
            grand_total,
            waves.len(),
            self.scheduler.budget()
        );

        let mut results: Vec<Option<DocumentResult>> = jobs.iter().map(|_| None).collect();
        let mut completed_before = 0usize;

        for wave in waves {
            // Flatten the wave's chunks into one stream so the budget
            // holds across its documents
            let mut flat: Vec<String> = Vec::new();
            let mut spans: Vec<(usize, std::ops::Range<usize>)> = Vec::new();
            for &doc_index in &wave {
                let begin = flat.len();
                flat.extend(jobs[doc_index].chunks.iter().map(|c| c.content.clone()));
                spans.push((doc_index, begin..flat.len()));
            }

            let offset = completed_before;
            let progress = progress_callback.clone();
            let outcomes = self
                .scheduler
                .translate_chunks(&flat, translator.clone(), move |done, _| {
                    progress(offset + done, grand_total)
                })
                .await;
            completed_before += flat.len();

            for (doc_index, span) in spans {
                // Re-index the document's slice of the flat outcome array
                let doc_outcomes: Vec<TranslationOutcome> = outcomes[span]
                    .iter()
                    .enumerate()
                    .map(|(i, o)| TranslationOutcome {
                        index: i,
                        ..o.clone()
                    })
                    .collect();

                results[doc_index] = Some(self.finish_document(&jobs[doc_index], &doc_outcomes));
            }
        }

        let results: Vec<DocumentResult> = results.into_iter().flatten().collect();
        let succeeded = results.iter().filter(|r| r.accepted()).count();
        let summary = BatchSummary {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            elapsed: start_time.elapsed(),
        };

        (results, summary)
    }

    /// Join, restore and gate one translated document
    fn finish_document(&self, job: &DocumentJob, outcomes: &[TranslationOutcome]) -> DocumentResult {
        let failed_chunks = outcomes.iter().filter(|o| !o.succeeded).count();
        let fallback_chunks = outcomes
            .iter()
            .filter(|o| o.succeeded && o.used_fallback)
            .count();

        if failed_chunks > 0 {
            warn!(
                "'{}': {} of {} chunks kept their original text",
                job.name,
                failed_chunks,
                outcomes.len()
            );
        }

        let translated_clean = Self::join_translated(job, outcomes);

        match self.assemble(job, &translated_clean) {
            Ok((final_text, report)) => {
                if report.passed() {
                    DocumentResult {
                        name: job.name.clone(),
                        text: Some(final_text),
                        report: Some(report),
                        failed_chunks,
                        fallback_chunks,
                        error: None,
                    }
                } else {
                    let error = if report.structure_ok {
                        PipelineError::LinkValidation {
                            document: job.name.clone(),
                            reason: report.issues.join("; "),
                        }
                    } else {
                        PipelineError::StructureValidation {
                            document: job.name.clone(),
                            source_count: report.source_headers,
                            translated_count: report.translated_headers,
                        }
                    };
                    DocumentResult {
                        name: job.name.clone(),
                        text: None,
                        report: Some(report),
                        failed_chunks,
                        fallback_chunks,
                        error: Some(error),
                    }
                }
            }
            Err(error) => DocumentResult {
                name: job.name.clone(),
                text: None,
                report: None,
                failed_chunks,
                fallback_chunks,
                error: Some(error),
            },
        }
    }
}

/// Replace the translated text's trailing newline run with the original's
fn normalize_tail(original: &str, translated: &str) -> String {
    let body = translated.trim_end_matches(['\n', '\r']);
    let tail_start = original.trim_end_matches(['\n', '\r']).len();
    let mut out = String::with_capacity(body.len() + (original.len() - tail_start));
    out.push_str(body);
    out.push_str(&original[tail_start..]);
    out
}
