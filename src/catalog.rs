use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEntry {
    pub key: String,
    pub text: String,
    pub position: usize,
}

#[derive(Clone, Debug)]
pub struct SourceCatalog {
    path: PathBuf,
    entries: Vec<SourceEntry>,
}

impl SourceCatalog {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            return Err(anyhow!("source file not found: {}", path.display()));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read source: {}", path.display()))?;
        let map: Map<String, Value> = serde_json::from_str(text.trim_start_matches('\u{FEFF}'))
            .with_context(|| format!("parse source json: {}", path.display()))?;
        let mut catalog = Self::from_map(map)?;
        catalog.path = path.to_path_buf();
        Ok(catalog)
    }

    pub fn from_map(map: Map<String, Value>) -> anyhow::Result<Self> {
        let mut entries = Vec::with_capacity(map.len());
        for (position, (key, value)) in map.into_iter().enumerate() {
            let text = match value {
                Value::String(s) => s,
                other => {
                    return Err(anyhow!(
                        "source value for {key:?} must be a string, got {}",
                        json_kind(&other)
                    ))
                }
            };
            entries.push(SourceEntry {
                key,
                text,
                position,
            });
        }
        Ok(Self {
            path: PathBuf::new(),
            entries,
        })
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(position, (key, text))| SourceEntry {
                key: key.into(),
                text: text.into(),
                position,
            })
            .collect();
        Self {
            path: PathBuf::new(),
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self, limit: Option<usize>) -> Vec<String> {
        let take = limit.unwrap_or(self.entries.len());
        self.entries
            .iter()
            .take(take)
            .map(|e| e.key.clone())
            .collect()
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
