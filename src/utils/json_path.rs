use serde_json::Value;

/// Resolve a dot path ("overview.totalPosts") or JSON pointer ("/overview/totalPosts")
pub fn lookup<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    if path == "$" || path == "." {
        return Some(json);
    }

    let pointer = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path.replace('.', "/"))
    };

    // Fallback: keys that themselves contain dots
    json.pointer(&pointer).or_else(|| json.get(path))
}

/// Render a value for log output, without quotes around plain strings
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncate text to at most `max` characters, marking the cut
pub fn snippet(text: &str, max: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
