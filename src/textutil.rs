use serde_json::Value;

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// `None` for empty, `null` or `none` output.
pub fn unwrap_oracle_output(raw: &str) -> Option<String> {
    let out = raw.trim();
    if out.is_empty() || out.eq_ignore_ascii_case("null") || out.eq_ignore_ascii_case("none") {
        return None;
    }
    let out = out.trim_matches('"').trim_matches('\'');
    if out.starts_with('{') && out.ends_with('}') {
        if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(out) {
            if let Some(Value::String(t)) = obj.get("translation") {
                return Some(t.clone()).filter(|t| !t.is_empty());
            }
        }
    }
    if out.is_empty() {
        return None;
    }
    Some(out.to_string())
}
