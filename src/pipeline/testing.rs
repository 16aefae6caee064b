use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::AppConfig;
use crate::oracle::{ModelConfig, TranslationOracle, TranslationOutcome};

use super::config::{RunConfig, RunOverrides};
use super::request::TranslationRequest;

type Responder = Box<dyn Fn(&TranslationRequest) -> TranslationOutcome + Send + Sync>;

/// In-process oracle that answers through a closure and records every request.
pub(crate) struct ScriptedOracle {
    responder: Responder,
    calls: Mutex<Vec<TranslationRequest>>,
}

impl ScriptedOracle {
    pub(crate) fn new(
        responder: impl Fn(&TranslationRequest) -> TranslationOutcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers `"[<language>] <text>"`.
    pub(crate) fn prefixing() -> Self {
        Self::new(|req| {
            TranslationOutcome::Success(format!(
                "[{}] {}",
                req.target_language, req.text_to_translate
            ))
        })
    }

    pub(crate) fn calls(&self) -> Vec<TranslationRequest> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn keys_for(&self, language: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|r| r.target_language == language)
            .map(|r| r.current_key)
            .collect()
    }

    pub(crate) fn request_for(&self, language: &str, key: &str) -> Option<TranslationRequest> {
        self.calls()
            .into_iter()
            .find(|r| r.target_language == language && r.current_key == key)
    }
}

impl TranslationOracle for ScriptedOracle {
    fn translate(&self, request: &TranslationRequest, _model: &ModelConfig) -> TranslationOutcome {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());
        (self.responder)(request)
    }
}

pub(crate) fn run_config(locales_dir: &Path, test_mode: bool) -> RunConfig {
    let overrides = RunOverrides {
        locales_dir: Some(locales_dir.to_path_buf()),
        test_mode,
        ..RunOverrides::default()
    };
    let mut cfg = RunConfig::from_app_config(&AppConfig::default(), None, overrides)
        .expect("default run config");
    cfg.request_delay = Duration::ZERO;
    cfg
}
