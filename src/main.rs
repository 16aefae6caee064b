use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use locale_translator::catalog::SourceCatalog;
use locale_translator::pipeline::{
    init_default_config, validate, Orchestrator, RunConfig, RunOverrides, ValidationMode,
    TEST_MODE_KEYS,
};
use locale_translator::progress::ConsoleProgress;

#[derive(Parser, Debug)]
#[command(name = "locale-translator")]
#[command(about = "Translate locale files with surrounding-key context via an LLM CLI", long_about = None)]
struct Args {
    /// Write a default locale-translator.toml, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write the config file to (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite an existing config file when used with --init-config
    #[arg(long)]
    force: bool,

    /// Config file path (default: search for locale-translator.toml upwards)
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Test mode: only translate the first 10 keys
    #[arg(long)]
    test: bool,

    /// Model identifier passed to the oracle (default: claude-opus-4-1-20250805)
    #[arg(long)]
    model: Option<String>,

    /// Number of languages translated concurrently (default: 4)
    #[arg(long)]
    threads: Option<usize>,

    /// Skip backing up existing output files
    #[arg(long)]
    no_backup: bool,

    /// Only translate these language codes (e.g. es-ES ko-KR)
    #[arg(long, num_args = 1.., value_name = "CODE")]
    languages: Option<Vec<String>>,

    /// Keys before/after the current one sent as context (default: 20)
    #[arg(long)]
    context_window: Option<usize>,

    /// Print diagnostic lines (backups, raw translations)
    #[arg(long)]
    verbose: bool,

    /// Locales root containing one directory per locale code
    #[arg(long, value_name = "DIR")]
    locales_dir: Option<PathBuf>,

    /// Oracle CLI program (default: claude)
    #[arg(long, value_name = "PROGRAM")]
    oracle: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init_config {
        let dir = args
            .init_config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let cfg_path = init_default_config(&dir, args.force).context("init default config")?;
        eprintln!("Wrote config: {}", cfg_path.display());
        return Ok(());
    }

    let cfg = RunConfig::resolve(RunOverrides {
        config_path: args.config,
        test_mode: args.test,
        model: args.model,
        threads: args.threads,
        no_backup: args.no_backup,
        languages: args.languages,
        context_window: args.context_window,
        verbose: args.verbose,
        locales_dir: args.locales_dir,
        oracle_command: args.oracle,
    })
    .context("build config")?;
    let progress = ConsoleProgress::new(true, cfg.verbose);

    let oracle = cfg.oracle();
    let version = oracle
        .probe()
        .with_context(|| format!("oracle CLI unavailable: {}", oracle.program()))?;
    progress.info(format!("Oracle CLI found: {version}"));

    let catalog = SourceCatalog::load(&cfg.source_path)?;

    if !cfg.ignored_languages.is_empty() {
        progress.info(format!(
            "Ignoring unknown languages: {:?}",
            cfg.ignored_languages
        ));
    }
    print_banner(&progress, &cfg, &catalog);

    let summary = Orchestrator::new(&catalog, &cfg, &oracle, progress.clone()).run(&cfg.languages);

    progress.info(format!(
        "Translation summary ({:.1}s)",
        summary.elapsed.as_secs_f64()
    ));
    for r in &summary.results {
        let status = if r.success { "ok" } else { "FAILED" };
        let errors = if r.error_count > 0 {
            format!(" ({} errors)", r.error_count)
        } else {
            String::new()
        };
        progress.info(format!("  [{status}] {}: {}{errors}", r.code, r.name));
    }
    progress.info(format!(
        "Results: {}/{} languages completed",
        summary.successful(),
        cfg.languages.len()
    ));
    if summary.total_errors() > 0 {
        progress.info(format!("Total errors: {}", summary.total_errors()));
    }

    progress.info("Validating translation files...");
    let mode = if cfg.test_mode {
        ValidationMode::Subset
    } else {
        ValidationMode::Exact
    };
    let report = validate(
        &catalog.keys(cfg.key_limit()),
        &cfg.languages,
        &cfg.layout,
        mode,
    );
    for lang in &report.languages {
        progress.info(format!("  {lang}"));
    }

    progress.info("Translation complete");
    if cfg.test_mode {
        progress.info("Run without --test to translate all keys");
    }
    Ok(())
}

fn print_banner(progress: &ConsoleProgress, cfg: &RunConfig, catalog: &SourceCatalog) {
    progress.info(format!(
        "Source: {} ({} keys)",
        catalog.path().display(),
        catalog.len()
    ));
    if let Some(p) = cfg.config_path.as_ref() {
        progress.info(format!("Config: {}", p.display()));
    }
    progress.info(format!("Model: {}", cfg.model.model));
    progress.info(format!("Threads: {}", cfg.threads));
    progress.info(format!("Context window: +/-{} keys", cfg.context_window));
    progress.info(format!(
        "Test mode: {}",
        if cfg.test_mode {
            format!("yes ({TEST_MODE_KEYS} keys)")
        } else {
            "no (all keys)".to_string()
        }
    ));
    let codes: Vec<&str> = cfg.languages.iter().map(|l| l.code.as_str()).collect();
    progress.info(format!("Languages: {}", codes.join(", ")));
    progress.info(format!("Backup: {}", if cfg.backup { "yes" } else { "no" }));
    if cfg.test_mode {
        progress.info(format!(
            "TEST MODE: only translating the first {TEST_MODE_KEYS} keys"
        ));
    }
}
