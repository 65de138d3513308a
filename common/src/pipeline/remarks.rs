use chrono::NaiveDateTime;

/// Appends one `[YYYY-MM-DD HH:MM] author: text` line to a remark log.
pub fn append_remark(existing: Option<&str>, at: NaiveDateTime, author: &str, text: &str) -> String {
    let entry = format!("[{}] {}: {}", at.format("%Y-%m-%d %H:%M"), author, text.trim());
    match existing.map(str::trim_end).filter(|s| !s.is_empty()) {
        Some(log) => format!("{}\n{}", log, entry),
        None => entry,
    }
}
