use crate::catalog::SourceEntry;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextWindow {
    /// Oldest first; the last line is the item right before the current one.
    pub before: Vec<String>,
    pub after: Vec<String>,
    pub current_key: String,
    /// 1-based `"i/total"`.
    pub position: String,
}

/// Context is always drawn from the full item list, never a truncated one.
pub fn build_context_window(
    items: &[SourceEntry],
    index: usize,
    window_size: usize,
) -> ContextWindow {
    let total = items.len();
    let Some(current) = items.get(index) else {
        return ContextWindow {
            position: format!("{}/{total}", index.saturating_add(1)),
            ..ContextWindow::default()
        };
    };

    let start = index.saturating_sub(window_size);
    let end = index.saturating_add(window_size).saturating_add(1).min(total);

    ContextWindow {
        before: items[start..index].iter().map(context_line).collect(),
        after: items[index + 1..end].iter().map(context_line).collect(),
        current_key: current.key.clone(),
        position: format!("{}/{total}", index + 1),
    }
}

fn context_line(entry: &SourceEntry) -> String {
    format!("{}: {}", entry.key, entry.text)
}
