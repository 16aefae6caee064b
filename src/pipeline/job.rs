use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde_json::{Map, Value};

use crate::catalog::{SourceCatalog, SourceEntry};
use crate::oracle::{TranslationOracle, TranslationOutcome};
use crate::progress::ConsoleProgress;
use crate::quality::check_placeholders;
use crate::store::{snapshot_backup, write_locale_file};
use crate::textutil::is_blank;

use super::config::{LanguageSpec, RunConfig};
use super::context::build_context_window;
use super::request::TranslationRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobResult {
    pub code: String,
    pub name: String,
    pub success: bool,
    pub error_count: usize,
    pub state: JobState,
}

impl JobResult {
    pub fn failed(lang: &LanguageSpec, error_count: usize) -> Self {
        Self {
            code: lang.code.clone(),
            name: lang.name.clone(),
            success: false,
            error_count,
            state: JobState::Failed,
        }
    }
}

/// Each oracle call starts at least `interval` after the previous one returned.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_end: Option<Instant>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_end: None,
        }
    }

    pub fn wait(&self) {
        if let Some(end) = self.last_end {
            let idle = end.elapsed();
            if idle < self.interval {
                thread::sleep(self.interval - idle);
            }
        }
    }

    pub fn finished(&mut self) {
        self.last_end = Some(Instant::now());
    }
}

pub struct LanguageJob<'a> {
    lang: &'a LanguageSpec,
    catalog: &'a SourceCatalog,
    cfg: &'a RunConfig,
    oracle: &'a dyn TranslationOracle,
    progress: ConsoleProgress,
    output: PathBuf,
    translated: Map<String, Value>,
    error_count: usize,
    state: JobState,
    limiter: RateLimiter,
}

impl<'a> LanguageJob<'a> {
    pub fn new(
        lang: &'a LanguageSpec,
        catalog: &'a SourceCatalog,
        cfg: &'a RunConfig,
        oracle: &'a dyn TranslationOracle,
        progress: ConsoleProgress,
    ) -> Self {
        Self {
            lang,
            catalog,
            cfg,
            oracle,
            progress,
            output: cfg.layout.file_for(&lang.code),
            translated: Map::new(),
            error_count: 0,
            state: JobState::Pending,
            limiter: RateLimiter::new(cfg.request_delay),
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn run(mut self) -> JobResult {
        if let Err(e) = self.start() {
            self.progress.info(format!(
                "Failed to prepare {} ({}): {e:#}",
                self.lang.name, self.lang.code
            ));
            self.state = JobState::Failed;
            return self.result();
        }

        self.translate_items();
        self.merge_untouched();

        match write_locale_file(&self.output, &self.translated) {
            Ok(()) => {
                self.state = JobState::Completed;
                if self.error_count > 0 {
                    self.progress.info(format!(
                        "Completed {} with {} errors",
                        self.lang.name, self.error_count
                    ));
                } else {
                    self.progress.info(format!("Completed {}", self.lang.name));
                }
            }
            Err(e) => {
                self.state = JobState::Failed;
                self.progress
                    .info(format!("Failed to write {} file: {e:#}", self.lang.name));
            }
        }
        self.result()
    }

    fn result(&self) -> JobResult {
        JobResult {
            code: self.lang.code.clone(),
            name: self.lang.name.clone(),
            success: self.state == JobState::Completed,
            error_count: self.error_count,
            state: self.state,
        }
    }

    fn start(&mut self) -> anyhow::Result<()> {
        self.state = JobState::Running;
        let dir = self.cfg.layout.dir_for(&self.lang.code);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create output dir: {}", dir.display()))?;
        if self.cfg.backup {
            if let Some(backup) = snapshot_backup(&self.output)? {
                self.progress
                    .debug(format!("  [{}] backup: {}", self.lang.code, backup.display()));
            }
        }
        Ok(())
    }

    fn translate_items(&mut self) {
        let (catalog, lang) = (self.catalog, self.lang);
        let all = catalog.entries();
        let take = self.cfg.key_limit().unwrap_or(all.len()).min(all.len());
        let items = &all[..take];
        let total = items.len();
        let code = &lang.code;

        self.progress
            .info(format!("Starting {} ({code}) - {total} keys", lang.name));
        for (i, entry) in items.iter().enumerate() {
            self.progress
                .info(format!("  [{code}] [{}/{total}] {}", i + 1, entry.key));
            let value = match self.translate_entry(all, entry) {
                Ok(text) => text,
                Err(e) => {
                    self.progress.info(format!(
                        "    [{code}] translation failed for '{}': {e:#}; using original text",
                        entry.key
                    ));
                    self.error_count += 1;
                    entry.text.clone()
                }
            };
            self.translated
                .insert(entry.key.clone(), Value::String(value));
        }
    }

    fn translate_entry(
        &mut self,
        all: &[SourceEntry],
        entry: &SourceEntry,
    ) -> anyhow::Result<String> {
        if is_blank(&entry.text) {
            return Ok(entry.text.clone());
        }
        let window = build_context_window(all, entry.position, self.cfg.context_window);
        let request = TranslationRequest::build(&entry.text, &self.lang.name, &window);

        self.limiter.wait();
        let outcome = self.oracle.translate(&request, &self.cfg.model);
        self.limiter.finished();
        match outcome {
            TranslationOutcome::Success(text) => {
                check_placeholders(&entry.text, &text)?;
                self.progress
                    .debug(format!("    [{}] {} -> {text}", self.lang.code, entry.key));
                Ok(text)
            }
            TranslationOutcome::Failure(reason) => Err(reason.into()),
        }
    }

    /// Full runs back-fill every source key that was not processed. Test-mode
    /// runs deliberately write only the processed subset.
    fn merge_untouched(&mut self) {
        if self.cfg.test_mode {
            let skipped = self.catalog.len().saturating_sub(self.translated.len());
            if skipped > 0 {
                self.progress.info(format!(
                    "  [{}] test mode: {skipped} unprocessed keys left out of the output",
                    self.lang.code
                ));
            }
            return;
        }
        let catalog = self.catalog;
        for entry in catalog.entries() {
            if !self.translated.contains_key(&entry.key) {
                self.translated
                    .insert(entry.key.clone(), Value::String(entry.text.clone()));
            }
        }
    }
}
