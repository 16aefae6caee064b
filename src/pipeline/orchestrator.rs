use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::catalog::SourceCatalog;
use crate::oracle::TranslationOracle;
use crate::progress::ConsoleProgress;

use super::config::{LanguageSpec, RunConfig};
use super::job::{JobResult, LanguageJob};

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub results: Vec<JobResult>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn total_errors(&self) -> usize {
        self.results.iter().map(|r| r.error_count).sum()
    }

    pub fn result_for(&self, code: &str) -> Option<&JobResult> {
        self.results.iter().find(|r| r.code == code)
    }
}

/// Runs one [`LanguageJob`] per language on at most `cfg.threads` workers.
pub struct Orchestrator<'a> {
    catalog: &'a SourceCatalog,
    cfg: &'a RunConfig,
    oracle: &'a dyn TranslationOracle,
    progress: ConsoleProgress,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        catalog: &'a SourceCatalog,
        cfg: &'a RunConfig,
        oracle: &'a dyn TranslationOracle,
        progress: ConsoleProgress,
    ) -> Self {
        Self {
            catalog,
            cfg,
            oracle,
            progress,
        }
    }

    pub fn run(&self, languages: &[LanguageSpec]) -> RunSummary {
        let t0 = Instant::now();
        let total = languages.len();
        let workers = self.cfg.threads.max(1).min(total);
        let queue: Mutex<VecDeque<&LanguageSpec>> = Mutex::new(languages.iter().collect());
        let (tx, rx) = mpsc::channel::<JobResult>();
        let mut results = Vec::with_capacity(total);

        thread::scope(|s| {
            for _ in 0..workers {
                let tx = tx.clone();
                let queue = &queue;
                s.spawn(move || loop {
                    let next = queue
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .pop_front();
                    let Some(lang) = next else {
                        break;
                    };
                    if tx.send(self.run_job(lang)).is_err() {
                        break;
                    }
                });
            }
            drop(tx);

            for result in rx {
                results.push(result);
                self.progress.progress("Languages finished", results.len(), total);
            }
        });

        RunSummary {
            results,
            elapsed: t0.elapsed(),
        }
    }

    fn run_job(&self, lang: &LanguageSpec) -> JobResult {
        let job = LanguageJob::new(
            lang,
            self.catalog,
            self.cfg,
            self.oracle,
            self.progress.clone(),
        );
        match panic::catch_unwind(AssertUnwindSafe(|| job.run())) {
            Ok(result) => result,
            Err(_) => {
                self.progress
                    .info(format!("Job for {} ({}) panicked", lang.name, lang.code));
                JobResult::failed(lang, 0)
            }
        }
    }
}
