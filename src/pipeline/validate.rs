use std::collections::HashSet;
use std::fmt;

use crate::store::{read_locale_file, LocaleLayout};

use super::config::LanguageSpec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    Exact,
    Subset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LanguageStatus {
    Ok { keys: usize },
    FileMissing,
    KeyMismatch { missing: usize, extra: usize },
    ReadError(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageReport {
    pub code: String,
    pub status: LanguageStatus,
}

impl fmt::Display for LanguageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = &self.code;
        match &self.status {
            LanguageStatus::Ok { keys } => write!(f, "{code}: all {keys} keys present"),
            LanguageStatus::FileMissing => write!(f, "{code}: file missing"),
            LanguageStatus::KeyMismatch { missing, extra } => {
                let mut parts = Vec::new();
                if *missing > 0 {
                    parts.push(format!("missing {missing} keys"));
                }
                if *extra > 0 {
                    parts.push(format!("{extra} extra keys"));
                }
                write!(f, "{code}: {}", parts.join(", "))
            }
            LanguageStatus::ReadError(e) => write!(f, "{code}: error reading file - {e}"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    pub languages: Vec<LanguageReport>,
}

impl ValidationReport {
    pub fn all_ok(&self) -> bool {
        self.languages
            .iter()
            .all(|l| matches!(l.status, LanguageStatus::Ok { .. }))
    }
}

pub fn validate(
    expected_keys: &[String],
    languages: &[LanguageSpec],
    layout: &LocaleLayout,
    mode: ValidationMode,
) -> ValidationReport {
    let expected: HashSet<&str> = expected_keys.iter().map(String::as_str).collect();
    let languages = languages
        .iter()
        .map(|lang| LanguageReport {
            code: lang.code.clone(),
            status: check_language(&expected, layout, &lang.code, mode),
        })
        .collect();
    ValidationReport { languages }
}

fn check_language(
    expected: &HashSet<&str>,
    layout: &LocaleLayout,
    code: &str,
    mode: ValidationMode,
) -> LanguageStatus {
    let path = layout.file_for(code);
    if !path.exists() {
        return LanguageStatus::FileMissing;
    }
    let data = match read_locale_file(&path) {
        Ok(d) => d,
        Err(e) => return LanguageStatus::ReadError(format!("{e:#}")),
    };
    let actual: HashSet<&str> = data.keys().map(String::as_str).collect();
    let missing = expected.difference(&actual).count();
    let extra = match mode {
        ValidationMode::Exact => actual.difference(expected).count(),
        ValidationMode::Subset => 0,
    };
    if missing == 0 && extra == 0 {
        LanguageStatus::Ok {
            keys: expected.len(),
        }
    } else {
        LanguageStatus::KeyMismatch { missing, extra }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value};

    use super::{validate, LanguageStatus, ValidationMode};
    use crate::pipeline::config::LanguageSpec;
    use crate::store::{write_locale_file, LocaleLayout};

    fn write(layout: &LocaleLayout, code: &str, keys: &[&str]) {
        std::fs::create_dir_all(layout.dir_for(code)).expect("mkdir");
        let data: Map<String, Value> = keys
            .iter()
            .map(|k| (k.to_string(), Value::String(format!("t-{k}"))))
            .collect();
        write_locale_file(&layout.file_for(code), &data).expect("write");
    }

    fn expected(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn reports_each_status() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = LocaleLayout::new(dir.path(), "main.json");
        write(&layout, "ok-OK", &["a", "b", "c"]);
        write(&layout, "mi-MI", &["a", "b"]);
        write(&layout, "ex-EX", &["a", "b", "c", "d"]);
        std::fs::create_dir_all(layout.dir_for("br-BR")).expect("mkdir");
        std::fs::write(layout.file_for("br-BR"), "{ not json").expect("write");
        let langs: Vec<LanguageSpec> = ["ok-OK", "mi-MI", "ex-EX", "br-BR", "no-NO"]
            .iter()
            .map(|c| LanguageSpec::new(*c, *c))
            .collect();

        let report = validate(&expected(&["a", "b", "c"]), &langs, &layout, ValidationMode::Exact);
        let statuses: Vec<&LanguageStatus> = report.languages.iter().map(|l| &l.status).collect();

        assert_eq!(statuses[0], &LanguageStatus::Ok { keys: 3 });
        assert_eq!(statuses[1], &LanguageStatus::KeyMismatch { missing: 1, extra: 0 });
        assert_eq!(statuses[2], &LanguageStatus::KeyMismatch { missing: 0, extra: 1 });
        assert!(matches!(statuses[3], LanguageStatus::ReadError(_)));
        assert_eq!(statuses[4], &LanguageStatus::FileMissing);
        assert!(!report.all_ok());
        assert_eq!(report.languages[2].to_string(), "ex-EX: 1 extra keys");
        assert_eq!(report.languages[4].to_string(), "no-NO: file missing");
    }

    #[test]
    fn subset_mode_tolerates_extra_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = LocaleLayout::new(dir.path(), "main.json");
        write(&layout, "es-ES", &["a", "b", "z"]);
        write(&layout, "ko-KR", &["a"]);
        let langs = vec![LanguageSpec::new("es-ES", "Spanish"), LanguageSpec::new("ko-KR", "Korean")];

        let report = validate(&expected(&["a", "b"]), &langs, &layout, ValidationMode::Subset);

        assert_eq!(report.languages[0].status, LanguageStatus::Ok { keys: 2 });
        assert_eq!(
            report.languages[1].status,
            LanguageStatus::KeyMismatch { missing: 1, extra: 0 }
        );
        assert_eq!(report.languages[1].to_string(), "ko-KR: missing 1 keys");
    }

    #[test]
    fn validation_does_not_touch_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = LocaleLayout::new(dir.path(), "main.json");
        write(&layout, "es-ES", &["a"]);
        let before = std::fs::read(layout.file_for("es-ES")).expect("read");

        let langs = vec![LanguageSpec::new("es-ES", "Spanish")];
        let _ = validate(&expected(&["a", "b"]), &langs, &layout, ValidationMode::Exact);

        assert_eq!(std::fs::read(layout.file_for("es-ES")).expect("read"), before);
        assert_eq!(std::fs::read_dir(layout.dir_for("es-ES")).expect("dir").count(), 1);
    }
}
