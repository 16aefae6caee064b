use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde_json::{Map, Value};

pub const BACKUP_SUFFIX: &str = ".backup";

#[derive(Clone, Debug)]
pub struct LocaleLayout {
    pub root: PathBuf,
    pub file_name: String,
}

impl LocaleLayout {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    pub fn dir_for(&self, code: &str) -> PathBuf {
        self.root.join(code)
    }

    pub fn file_for(&self, code: &str) -> PathBuf {
        self.dir_for(code).join(&self.file_name)
    }
}

/// `main.json` -> `main.json.backup`, in the same directory.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}

/// Copies the current content of `path` to its backup path. Returns `None`
/// when there is nothing to back up.
pub fn snapshot_backup(path: &Path) -> anyhow::Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }
    let backup = backup_path_for(path);
    let bytes = std::fs::read(path).with_context(|| format!("read: {}", path.display()))?;
    std::fs::write(&backup, bytes)
        .with_context(|| format!("write backup: {}", backup.display()))?;
    Ok(Some(backup))
}

pub fn write_locale_file(path: &Path, data: &Map<String, Value>) -> anyhow::Result<()> {
    let mut json = serde_json::to_string_pretty(data).context("serialize locale")?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("write locale: {}", path.display()))?;
    Ok(())
}

pub fn read_locale_file(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read: {}", path.display()))?;
    let value: Value = serde_json::from_str(text.trim_start_matches('\u{FEFF}'))
        .with_context(|| format!("parse json: {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow!("expected a JSON object: {}", path.display())),
    }
}
