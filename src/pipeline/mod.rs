mod config;
mod context;
mod job;
mod orchestrator;
mod prompts;
mod request;
#[cfg(test)]
mod testing;
mod validate;

pub use config::{
    init_default_config, LanguageSpec, RunConfig, RunOverrides, DEFAULT_MODEL, TEST_MODE_KEYS,
};
pub use context::{build_context_window, ContextWindow};
pub use job::{JobResult, JobState, LanguageJob, RateLimiter};
pub use orchestrator::{Orchestrator, RunSummary};
pub use prompts::SYSTEM_PROMPT;
pub use request::{TranslationRequest, MAX_CONTEXT_LINES};
pub use validate::{validate, LanguageReport, LanguageStatus, ValidationMode, ValidationReport};
