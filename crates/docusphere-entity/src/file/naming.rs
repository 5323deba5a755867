//! File naming rules.

/// The extension of `name` (without the dot), if it has one.
///
/// Dot-files such as `.env` and names ending in a dot have no extension.
pub fn extension(name: &str) -> Option<&str> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Apply a rename request while keeping the current extension.
///
/// `report.pdf` renamed to `summary` becomes `summary.pdf`; a requested name
/// that already ends with the extension is kept as is.
pub fn rename_keeping_extension(current: &str, requested: &str) -> String {
    let requested = requested.trim();
    match extension(current) {
        Some(ext) => {
            let suffix = format!(".{ext}");
            let lower = requested.to_lowercase();
            if lower.ends_with(&suffix.to_lowercase()) && lower.len() > suffix.len() {
                requested.to_string()
            } else {
                format!("{requested}{suffix}")
            }
        }
        None => requested.to_string(),
    }
}

/// Split a comma separated tag list, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
