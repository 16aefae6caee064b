#![cfg(unix)]

use std::path::Path;
use std::time::Duration;

use locale_translator::catalog::SourceCatalog;
use locale_translator::config::AppConfig;
use locale_translator::pipeline::{
    validate, LanguageStatus, Orchestrator, RunConfig, RunOverrides, ValidationMode,
};
use locale_translator::progress::ConsoleProgress;
use locale_translator::store::{backup_path_for, read_locale_file};

// Echoes `text_to_translate` back with the target language as a prefix and
// fails for the key named `broken`.
const ORACLE_SCRIPT: &str = r#"#!/bin/sh
input=$(cat)
case "$input" in
  *'"current_key": "broken"'*) echo "refused" >&2; exit 1 ;;
esac
lang=$(printf '%s\n' "$input" | sed -n 's/^  "target_language": "\(.*\)",$/\1/p')
text=$(printf '%s\n' "$input" | sed -n 's/^  "text_to_translate": "\(.*\)",$/\1/p')
printf '"%s: %s"\n' "$lang" "$text"
"#;

fn seed_source(root: &Path, pairs: &[(&str, &str)]) {
    let dir = root.join("en-US");
    std::fs::create_dir_all(&dir).expect("mkdir");
    let map: serde_json::Map<String, serde_json::Value> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    std::fs::write(
        dir.join("main.json"),
        serde_json::to_string_pretty(&map).expect("json"),
    )
    .expect("write source");
}

fn config(root: &Path, script: &Path, test_mode: bool) -> RunConfig {
    let mut app = AppConfig::default();
    app.oracle.command = Some("sh".into());
    app.oracle.args = Some(vec![script.display().to_string()]);
    app.oracle.request_delay_ms = Some(0);
    app.oracle.timeout_secs = Some(10);
    let overrides = RunOverrides {
        locales_dir: Some(root.to_path_buf()),
        languages: Some(vec!["es-ES".into(), "ko-KR".into(), "zh-CN".into()]),
        threads: Some(2),
        test_mode,
        ..RunOverrides::default()
    };
    RunConfig::from_app_config(&app, None, overrides).expect("run config")
}

#[test]
fn full_run_translates_backs_up_and_validates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("locales");
    let script = dir.path().join("oracle.sh");
    std::fs::write(&script, ORACLE_SCRIPT).expect("script");
    seed_source(
        &root,
        &[("title", "Welcome"), ("broken", "Keep me"), ("save", "Save")],
    );

    let cfg = config(&root, &script, false);
    assert_eq!(cfg.oracle_timeout, Duration::from_secs(10));
    let catalog = SourceCatalog::load(&cfg.source_path).expect("catalog");

    // A previous Korean file must survive as a backup.
    std::fs::create_dir_all(cfg.layout.dir_for("ko-KR")).expect("mkdir");
    std::fs::write(cfg.layout.file_for("ko-KR"), "{\"title\": \"old\"}").expect("seed");

    let oracle = cfg.oracle();
    let summary = Orchestrator::new(&catalog, &cfg, &oracle, ConsoleProgress::new(false, false))
        .run(&cfg.languages);

    assert_eq!(summary.successful(), 3);
    assert_eq!(summary.total_errors(), 3);

    let es = read_locale_file(&cfg.layout.file_for("es-ES")).expect("es output");
    assert_eq!(es["title"], "Spanish: Welcome");
    assert_eq!(es["broken"], "Keep me");
    assert_eq!(es["save"], "Spanish: Save");

    let backup =
        std::fs::read_to_string(backup_path_for(&cfg.layout.file_for("ko-KR"))).expect("backup");
    assert_eq!(backup, "{\"title\": \"old\"}");

    let report = validate(
        &catalog.keys(None),
        &cfg.languages,
        &cfg.layout,
        ValidationMode::Exact,
    );
    assert!(report.all_ok(), "{:?}", report.languages);
}

#[test]
fn test_mode_writes_only_the_processed_prefix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("locales");
    let script = dir.path().join("oracle.sh");
    std::fs::write(&script, ORACLE_SCRIPT).expect("script");
    let pairs: Vec<(String, String)> = (1..=15)
        .map(|i| (format!("key{i:02}"), format!("Text {i}")))
        .collect();
    let borrowed: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    seed_source(&root, &borrowed);

    let cfg = config(&root, &script, true);
    let catalog = SourceCatalog::load(&cfg.source_path).expect("catalog");
    let oracle = cfg.oracle();
    let summary = Orchestrator::new(&catalog, &cfg, &oracle, ConsoleProgress::new(false, false))
        .run(&cfg.languages);
    assert_eq!(summary.successful(), 3);

    let zh = read_locale_file(&cfg.layout.file_for("zh-CN")).expect("zh output");
    assert_eq!(zh.len(), 10);
    assert_eq!(zh["key10"], "Chinese (Simplified): Text 10");
    assert!(!zh.contains_key("key11"));

    let subset = validate(
        &catalog.keys(cfg.key_limit()),
        &cfg.languages,
        &cfg.layout,
        ValidationMode::Subset,
    );
    assert!(subset.all_ok());

    let full = validate(
        &catalog.keys(None),
        &cfg.languages,
        &cfg.layout,
        ValidationMode::Exact,
    );
    assert!(full
        .languages
        .iter()
        .all(|l| l.status == LanguageStatus::KeyMismatch { missing: 5, extra: 0 }));
}
