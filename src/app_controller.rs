use anyhow::{anyhow, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::translation::{ChunkTranslator, DocumentPipeline, DocumentResult, TranslationService};

// @module: Application controller for Markdown document translation

/// Opt-in marker: only documents carrying this comment are picked up in
/// folder mode
pub const TRANSLATE_MARKER: &str = "<!-- marktwai:translate -->";

/// Stamp added to accepted output so a later run never re-translates it
pub const TRANSLATED_MARKER: &str = "<!-- marktwai:translated -->";

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Run the main workflow for a single Markdown file
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        if !FileManager::is_markdown(&input_file) {
            return Err(anyhow!("Input file is not a Markdown document: {:?}", input_file));
        }

        FileManager::ensure_dir(&output_dir)?;

        let output_path = FileManager::generate_output_path(
            &input_file,
            &output_dir,
            &self.config.target_language,
        );
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, translation already exists (use -f to force overwrite)");
            return Ok(());
        }

        let raw_text = FileManager::read_to_string(&input_file)?;
        if raw_text.contains(TRANSLATED_MARKER) {
            warn!("Skipping file, it is itself a translation output");
            return Ok(());
        }
        // Single-file mode translates regardless of the opt-in marker
        if !raw_text.contains(TRANSLATE_MARKER) {
            warn!(
                "File does not carry the '{}' marker; translating anyway in single-file mode",
                TRANSLATE_MARKER
            );
        }

        let pipeline = DocumentPipeline::new(&self.config);
        let translator: Arc<dyn ChunkTranslator> =
            Arc::new(TranslationService::new(&self.config));

        let name = input_file.to_string_lossy().to_string();
        let multi_progress = MultiProgress::new();
        let job_chunks = pipeline.prepare(&name, &raw_text).chunks.len();
        let progress_bar = Self::chunk_progress_bar(&multi_progress, job_chunks as u64);

        let pb = progress_bar.clone();
        let result = pipeline
            .run_document(&name, &raw_text, translator, move |done, _| {
                pb.set_position(done as u64)
            })
            .await;
        progress_bar.finish_and_clear();

        let issues_log = output_dir.join("marktwai.issues.log");
        self.deliver(&result, &input_file, &output_dir, &issues_log)?;

        info!(
            "Translation completed in {}",
            Self::format_duration(start_time.elapsed())
        );
        Ok(())
    }

    /// Run the workflow in folder mode, translating all marked Markdown
    /// documents in a directory tree.
    ///
    /// All eligible documents go through one batch run, so the concurrency
    /// budget is shared across documents rather than per file.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let mut markdown_files = FileManager::find_files(&input_dir, "md")?;
        markdown_files.extend(FileManager::find_files(&input_dir, "markdown")?);

        if markdown_files.is_empty() {
            return Err(anyhow!("No Markdown files found in directory: {:?}", input_dir));
        }

        // Collect the eligible documents
        let mut documents: Vec<(String, String)> = Vec::new();
        let mut paths: Vec<PathBuf> = Vec::new();
        let mut skip_count = 0usize;

        for path in markdown_files {
            if self.is_translation_output(&path) {
                continue;
            }

            let output_path = FileManager::generate_output_path(
                &path,
                path.parent().unwrap_or(&input_dir),
                &self.config.target_language,
            );
            if output_path.exists() && !force_overwrite {
                skip_count += 1;
                continue;
            }

            let content = FileManager::read_to_string(&path)?;
            if content.contains(TRANSLATED_MARKER) || !content.contains(TRANSLATE_MARKER) {
                skip_count += 1;
                continue;
            }

            documents.push((path.to_string_lossy().to_string(), content));
            paths.push(path);
        }

        if documents.is_empty() {
            info!("No documents to translate ({} skipped)", skip_count);
            return Ok(());
        }

        let pipeline = DocumentPipeline::new(&self.config);
        let translator: Arc<dyn ChunkTranslator> =
            Arc::new(TranslationService::new(&self.config));

        let total_chunks: u64 = documents
            .iter()
            .map(|(name, raw)| pipeline.prepare(name, raw).chunks.len() as u64)
            .sum();

        let multi_progress = MultiProgress::new();
        let progress_bar = Self::chunk_progress_bar(&multi_progress, total_chunks);
        progress_bar.set_message(format!("Translating {} documents", documents.len()));

        let pb = progress_bar.clone();
        let (results, summary) = pipeline
            .run_batch(documents, translator, move |done, _| {
                pb.set_position(done as u64)
            })
            .await;
        progress_bar.finish_with_message("Folder processing complete");

        // Deliver outputs and collect per-document failures
        let issues_log = input_dir.join("marktwai.issues.log");
        let mut error_count = 0usize;

        for (result, path) in results.iter().zip(paths.iter()) {
            let output_dir = path.parent().unwrap_or(&input_dir).to_path_buf();
            if let Err(e) = self.deliver(result, path, &output_dir, &issues_log) {
                error!("Error processing file {:?}: {}", path, e);
                error_count += 1;
            }
        }

        let summary_message = format!(
            "Folder processing completed: {} translated, {} skipped, {} rejected",
            summary.succeeded,
            skip_count,
            summary.failed.max(error_count)
        );
        info!("{}", summary_message);

        if let Err(e) = FileManager::append_to_log_file(
            &issues_log,
            &format!(
                "{} - Duration: {}",
                summary_message,
                Self::format_duration(start_time.elapsed())
            ),
        ) {
            warn!("Failed to write folder logs to file: {}", e);
        }

        Ok(())
    }

    /// Write one document's output, or record why it was rejected
    fn deliver(
        &self,
        result: &DocumentResult,
        input_file: &Path,
        output_dir: &Path,
        issues_log: &Path,
    ) -> Result<()> {
        let output_path = FileManager::generate_output_path(
            input_file,
            output_dir,
            &self.config.target_language,
        );

        match &result.text {
            Some(text) => {
                let mut content = String::with_capacity(TRANSLATED_MARKER.len() + 1 + text.len());
                content.push_str(TRANSLATED_MARKER);
                content.push('\n');
                content.push_str(text);
                FileManager::write_to_file(&output_path, &content)?;

                if result.failed_chunks > 0 {
                    FileManager::append_to_log_file(
                        issues_log,
                        &format!(
                            "{}: accepted with {} untranslated chunks",
                            result.name, result.failed_chunks
                        ),
                    )?;
                }
                info!("Wrote {:?}", output_path);
                Ok(())
            }
            None => {
                let reason = result
                    .error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unknown failure".to_string());

                FileManager::append_to_log_file(issues_log, &format!("{}: {}", result.name, reason))?;
                if let Some(report) = &result.report {
                    for issue in &report.issues {
                        FileManager::append_to_log_file(
                            issues_log,
                            &format!("{}:   {}", result.name, issue),
                        )?;
                    }
                }

                Err(anyhow!("Document rejected: {}", reason))
            }
        }
    }

    /// Whether a path looks like one of our own translation outputs
    fn is_translation_output(&self, path: &Path) -> bool {
        path.file_stem()
            .map(|stem| {
                stem.to_string_lossy()
                    .ends_with(&format!(".{}", self.config.target_language))
            })
            .unwrap_or(false)
    }

    /// Chunk-level progress bar in the shared multi-progress display
    fn chunk_progress_bar(multi_progress: &MultiProgress, total: u64) -> ProgressBar {
        let progress_bar = multi_progress.add(ProgressBar::new(total));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    /// Human-readable duration
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
