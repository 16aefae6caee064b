use anyhow::anyhow;
use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*[A-Za-z_][A-Za-z0-9_.\-]*\s*\}\}").expect("placeholder regex"));

pub fn placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Every placeholder in `source` must appear in `translated` exactly as
/// written, at least as many times. Order may change with word order.
pub fn check_placeholders(source: &str, translated: &str) -> anyhow::Result<()> {
    let mut wanted = placeholders(source);
    if wanted.is_empty() {
        return Ok(());
    }
    wanted.sort_unstable();
    wanted.dedup();
    for tok in wanted {
        let src_count = source.matches(tok).count();
        let tgt_count = translated.matches(tok).count();
        if tgt_count < src_count {
            return Err(anyhow!(
                "placeholder_missing:{tok} (source {src_count}, output {tgt_count})"
            ));
        }
    }
    Ok(())
}
