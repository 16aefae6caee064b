use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "locale-translator.toml";
pub const CONFIG_ENV_VAR: &str = "LOCALE_TRANSLATOR_CONFIG";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub oracle: OracleSection,
    #[serde(default)]
    pub run: RunSection,
    /// Target language table: locale code -> language name given to the oracle.
    /// Replaces the built-in table when non-empty.
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PathsSection {
    /// Directory holding one sub-directory per locale code. Relative paths
    /// resolve against the config file's directory.
    #[serde(default)]
    pub locales_dir: Option<PathBuf>,
    #[serde(default)]
    pub source_locale: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct OracleSection {
    #[serde(default)]
    pub command: Option<String>,
    /// Extra leading arguments, e.g. a wrapper script path.
    #[serde(default)]
    pub args: Option<Vec<String>>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub request_delay_ms: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct RunSection {
    #[serde(default)]
    pub test_mode: Option<bool>,
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub backup: Option<bool>,
    #[serde(default)]
    pub context_window: Option<usize>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub verbose: Option<bool>,
}

pub fn default_languages() -> BTreeMap<String, String> {
    [
        ("ar-SA", "Arabic"),
        ("bn-BD", "Bengali"),
        ("es-ES", "Spanish"),
        ("ht-HT", "Haitian Creole"),
        ("ko-KR", "Korean"),
        ("ru-RU", "Russian"),
        ("ur-PK", "Urdu"),
        ("zh-CN", "Chinese (Simplified)"),
    ]
    .into_iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

pub fn find_file_upwards(start_dir: &Path, filename: &str, max_levels: usize) -> Option<PathBuf> {
    let mut dir = start_dir;
    for _ in 0..=max_levels {
        let candidate = dir.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
    None
}

pub fn find_default_config(filename: &str) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, filename, 8) {
            return Some(p);
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, filename, 10) {
                return Some(p);
            }
        }
    }
    None
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&text)
        .with_context(|| format!("parse config toml: {}", path.display()))?;
    Ok(cfg)
}
