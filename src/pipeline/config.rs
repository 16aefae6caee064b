use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};

use crate::config::{
    default_languages, find_default_config, load_config, AppConfig, CONFIG_ENV_VAR,
    CONFIG_FILE_NAME,
};
use crate::oracle::{CommandOracle, ModelConfig, DEFAULT_TIMEOUT};
use crate::pipeline::prompts::SYSTEM_PROMPT;
use crate::store::LocaleLayout;

pub const DEFAULT_MODEL: &str = "claude-opus-4-1-20250805";
pub const DEFAULT_ORACLE_COMMAND: &str = "claude";
pub const DEFAULT_THREADS: usize = 4;
pub const DEFAULT_CONTEXT_WINDOW: usize = 20;
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(700);
pub const DEFAULT_LOCALES_DIR: &str = "src/files/locales";
pub const DEFAULT_SOURCE_LOCALE: &str = "en-US";
pub const DEFAULT_FILE_NAME: &str = "main.json";

/// Keys processed per language in test mode.
pub const TEST_MODE_KEYS: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageSpec {
    pub code: String,
    pub name: String,
}

impl LanguageSpec {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunOverrides {
    pub config_path: Option<PathBuf>,
    pub test_mode: bool,
    pub model: Option<String>,
    pub threads: Option<usize>,
    pub no_backup: bool,
    pub languages: Option<Vec<String>>,
    pub context_window: Option<usize>,
    pub verbose: bool,
    pub locales_dir: Option<PathBuf>,
    pub oracle_command: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub config_path: Option<PathBuf>,
    pub layout: LocaleLayout,
    pub source_path: PathBuf,

    pub oracle_command: String,
    pub oracle_args: Vec<String>,
    pub oracle_timeout: Duration,
    pub request_delay: Duration,
    pub model: ModelConfig,

    pub test_mode: bool,
    pub threads: usize,
    pub backup: bool,
    pub context_window: usize,
    pub verbose: bool,

    pub languages: Vec<LanguageSpec>,
    pub ignored_languages: Vec<String>,
}

impl RunConfig {
    /// Locates the config file (`--config`, then `$LOCALE_TRANSLATOR_CONFIG`,
    /// then an upward search for `locale-translator.toml`) and resolves it.
    pub fn resolve(overrides: RunOverrides) -> anyhow::Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let cfg_path = locate_config(overrides.config_path.clone(), from_env)?;
        let file_cfg = match cfg_path.as_deref() {
            Some(p) => load_config(p)?,
            None => AppConfig::default(),
        };
        Self::from_app_config(&file_cfg, cfg_path.as_deref(), overrides)
    }

    pub fn from_app_config(
        file_cfg: &AppConfig,
        config_path: Option<&Path>,
        overrides: RunOverrides,
    ) -> anyhow::Result<Self> {
        let config_dir = config_path
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let locales_dir = match (overrides.locales_dir, file_cfg.paths.locales_dir.clone()) {
            (Some(p), _) => p,
            (None, Some(p)) if p.is_relative() => config_dir.join(p),
            (None, Some(p)) => p,
            (None, None) => PathBuf::from(DEFAULT_LOCALES_DIR),
        };
        let file_name = non_empty(file_cfg.paths.file_name.clone())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        let source_locale = non_empty(file_cfg.paths.source_locale.clone())
            .unwrap_or_else(|| DEFAULT_SOURCE_LOCALE.to_string());
        let layout = LocaleLayout::new(locales_dir, file_name);
        let source_path = layout.file_for(&source_locale);

        let oracle_command = non_empty(overrides.oracle_command)
            .or_else(|| non_empty(file_cfg.oracle.command.clone()))
            .unwrap_or_else(|| DEFAULT_ORACLE_COMMAND.to_string());
        let oracle_args = file_cfg.oracle.args.clone().unwrap_or_default();
        let oracle_timeout = file_cfg
            .oracle
            .timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let request_delay = file_cfg
            .oracle
            .request_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REQUEST_DELAY);
        let model = ModelConfig {
            model: non_empty(overrides.model)
                .or_else(|| non_empty(file_cfg.oracle.model.clone()))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            system_prompt: SYSTEM_PROMPT.to_string(),
        };

        let test_mode = overrides.test_mode || file_cfg.run.test_mode.unwrap_or(false);
        let threads = overrides
            .threads
            .or(file_cfg.run.threads)
            .unwrap_or(DEFAULT_THREADS)
            .max(1);
        let backup = !overrides.no_backup && file_cfg.run.backup.unwrap_or(true);
        let context_window = overrides
            .context_window
            .or(file_cfg.run.context_window)
            .unwrap_or(DEFAULT_CONTEXT_WINDOW);
        let verbose = overrides.verbose || file_cfg.run.verbose.unwrap_or(false);

        let table = if file_cfg.languages.is_empty() {
            default_languages()
        } else {
            file_cfg.languages.clone()
        };
        let requested = overrides.languages.or_else(|| file_cfg.run.languages.clone());
        let (languages, ignored_languages) = match requested {
            None => (
                table
                    .iter()
                    .map(|(code, name)| LanguageSpec::new(code, name))
                    .collect::<Vec<_>>(),
                Vec::new(),
            ),
            Some(codes) => {
                let selected = table
                    .iter()
                    .filter(|(code, _)| codes.iter().any(|c| c == *code))
                    .map(|(code, name)| LanguageSpec::new(code, name))
                    .collect::<Vec<_>>();
                let ignored = codes
                    .iter()
                    .filter(|c| !table.contains_key(c.as_str()))
                    .cloned()
                    .collect();
                (selected, ignored)
            }
        };
        if languages.is_empty() {
            return Err(anyhow!(
                "no valid languages found in: {:?} (available: {:?})",
                ignored_languages,
                table.keys().collect::<Vec<_>>()
            ));
        }

        Ok(Self {
            config_path: config_path.map(Path::to_path_buf),
            layout,
            source_path,
            oracle_command,
            oracle_args,
            oracle_timeout,
            request_delay,
            model,
            test_mode,
            threads,
            backup,
            context_window,
            verbose,
            languages,
            ignored_languages,
        })
    }

    pub fn oracle(&self) -> CommandOracle {
        CommandOracle::new(self.oracle_command.clone())
            .with_args(self.oracle_args.iter().cloned())
            .with_timeout(self.oracle_timeout)
    }

    pub fn key_limit(&self) -> Option<usize> {
        self.test_mode.then_some(TEST_MODE_KEYS)
    }
}

/// An explicitly named file (flag or env var) must exist; only the upward
/// search may come back empty.
fn locate_config(
    explicit: Option<PathBuf>,
    from_env: Option<PathBuf>,
) -> anyhow::Result<Option<PathBuf>> {
    let named = match (explicit, from_env) {
        (Some(p), _) => Some((p, "--config")),
        (None, Some(p)) => Some((p, CONFIG_ENV_VAR)),
        (None, None) => None,
    };
    match named {
        Some((p, _)) if p.is_file() => Ok(Some(p)),
        Some((p, source)) => Err(anyhow!("config file not found ({source}): {}", p.display())),
        None => Ok(find_default_config(CONFIG_FILE_NAME)),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create config dir: {}", dir.display()))?;
    let cfg_path = dir.join(CONFIG_FILE_NAME);
    if cfg_path.exists() && !force {
        return Ok(cfg_path);
    }
    std::fs::write(&cfg_path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("write config: {}", cfg_path.display()))?;
    Ok(cfg_path)
}

const DEFAULT_CONFIG_TOML: &str = r#"[paths]
# Relative to this file.
locales_dir = "src/files/locales"
source_locale = "en-US"
file_name = "main.json"

[oracle]
command = "claude"
# args = ["--some-wrapper-flag"]
model = "claude-opus-4-1-20250805"
timeout_secs = 60
# Minimum gap between two oracle calls of the same language.
request_delay_ms = 700

[run]
test_mode = false
threads = 4
backup = true
context_window = 20
verbose = false
# languages = ["es-ES", "ko-KR"]

[languages]
ar-SA = "Arabic"
bn-BD = "Bengali"
es-ES = "Spanish"
ht-HT = "Haitian Creole"
ko-KR = "Korean"
ru-RU = "Russian"
ur-PK = "Urdu"
zh-CN = "Chinese (Simplified)"
"#;
