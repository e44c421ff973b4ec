use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::checker::{display_name, DialogueClassifier, IgnorePolicy, MistakeCollector, MistakeReport};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::grammar::{GrammarEngine, LanguageTool};
use crate::presentation::{render_unknown_words, ReportRenderer};
use crate::subtitle_processor::SubtitleDocument;

// @module: Application controller for subtitle checking

/// What a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Mistake table per file
    #[default]
    Report,
    /// Distinct misspelled words over all files
    UnknownWords,
}

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Files checked successfully
    pub files_processed: usize,
    /// Files skipped because they could not be read, parsed or written
    pub files_failed: usize,
    /// Mistakes reported over all files
    pub mistakes: usize,
    /// Words collected in unknown-words mode
    pub unknown_words: BTreeSet<String>,
}

/// Main application controller for subtitle grammar checking
pub struct Controller {
    // @field: App configuration
    config: Config,
    policy: IgnorePolicy,
    classifier: DialogueClassifier,
    renderer: ReportRenderer,
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        let policy = config.ignore_policy()?;
        let classifier = config.dialogue_classifier();

        Ok(Self {
            config,
            policy,
            classifier,
            renderer: ReportRenderer::for_terminal(),
            show_progress: true,
        })
    }

    /// Use a specific renderer instead of one sized to the terminal
    pub fn with_renderer(mut self, renderer: ReportRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Show or hide the per-file progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Ignore policy built from the configuration
    pub fn policy(&self) -> &IgnorePolicy {
        &self.policy
    }

    /// Check a file or a directory of files against a LanguageTool server
    ///
    /// The server is started once for all files and shut down before returning.
    pub async fn run(&self, input: &Path, mode: Mode) -> Result<RunSummary, AppError> {
        let files = self.resolve_files(input)?;
        if files.is_empty() {
            warn!("No .ass files found in {:?}", input);
            return Ok(RunSummary::default());
        }

        info!("Setting up LanguageTool ({})...", self.config.language);
        let mut engine = LanguageTool::start(&self.config.engine, &self.config.language).await?;
        info!("LanguageTool ready, checking as {}", engine.language());

        let mut stdout = std::io::stdout();
        self.run_with_engine(&mut engine, &files, mode, &mut stdout).await
    }

    /// List the files to check; a missing input is a usage error
    pub fn resolve_files(&self, input: &Path) -> Result<Vec<PathBuf>, AppError> {
        FileManager::resolve_input(input)
            .map_err(|e| AppError::File(format!("{:#}", e)))?
            .ok_or_else(|| {
                AppError::Usage(format!("Given input is not an existing file or folder: {:?}", input))
            })
    }

    /// Process `files` with an already started engine, then shut it down
    ///
    /// The engine is released whatever the outcome; output goes to `out`.
    pub async fn run_with_engine<E: GrammarEngine, W: Write>(
        &self,
        engine: &mut E,
        files: &[PathBuf],
        mode: Mode,
        out: &mut W,
    ) -> Result<RunSummary, AppError> {
        let result = self.process_files(&*engine, files, mode, out).await;

        if let Err(e) = engine.shutdown().await {
            warn!("{}", e);
        }

        result
    }

    async fn process_files<W: Write>(
        &self,
        engine: &dyn GrammarEngine,
        files: &[PathBuf],
        mode: Mode,
        out: &mut W,
    ) -> Result<RunSummary, AppError> {
        let collector = MistakeCollector::new(engine, &self.policy, &self.classifier);
        let mut summary = RunSummary::default();

        for file in files {
            debug!("Processing {:?}", file);
            let outcome = match mode {
                Mode::Report => match self.check_file(&collector, file).await {
                    Ok(report) => {
                        summary.mistakes += report.mistake_count();
                        self.write_report(&report, out)
                    }
                    Err(e) => Err(e),
                },
                Mode::UnknownWords => self.collect_unknown_words(&collector, file, &mut summary.unknown_words).await,
            };

            match outcome {
                Ok(()) => summary.files_processed += 1,
                Err(e) => match e.failed_file() {
                    Some(failed) => {
                        error!("Skipping {:?}: {}", failed, e);
                        summary.files_failed += 1;
                    }
                    None => return Err(e),
                },
            }
        }

        if mode == Mode::UnknownWords {
            let line = render_unknown_words(&summary.unknown_words);
            if !line.is_empty() {
                writeln!(out, "{}", line)?;
            }
        }

        info!(
            "Finished: {} file(s) checked, {} skipped",
            summary.files_processed, summary.files_failed
        );
        Ok(summary)
    }

    /// Sort, persist and check one file
    pub async fn check_file(
        &self,
        collector: &MistakeCollector<'_>,
        path: &Path,
    ) -> Result<MistakeReport, AppError> {
        let mut document = SubtitleDocument::load(path)?;

        // Line numbers must match the file as the user will open it
        document.sort_events_by_start();
        document.save(path)?;

        let progress = self.progress_bar(document.events.len() as u64, path);
        let report = collector.subtitle_mistakes(&document, progress.as_ref()).await;
        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(report?)
    }

    async fn collect_unknown_words(
        &self,
        collector: &MistakeCollector<'_>,
        path: &Path,
        words: &mut BTreeSet<String>,
    ) -> Result<(), AppError> {
        let document = SubtitleDocument::load(path)?;
        let before = words.len();
        collector.unknown_words(&document, words).await?;
        debug!("{} new unknown word(s) in {:?}", words.len() - before, path);
        Ok(())
    }

    fn write_report<W: Write>(&self, report: &MistakeReport, out: &mut W) -> Result<(), AppError> {
        if report.is_empty() {
            info!("No mistakes found in {}", display_name(&report.source_file));
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out)?;
        writeln!(out, "{}", display_name(&report.source_file))?;
        write!(out, "{}", self.renderer.render_report(report))?;
        out.flush()?;
        Ok(())
    }

    fn progress_bar(&self, len: u64, path: &Path) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let progress_bar = ProgressBar::new(len);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message(display_name(path));
        Some(progress_bar)
    }
}
