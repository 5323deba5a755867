//! Materialized path helpers.
//!
//! Root folders have the path `/name`; every other folder has its parent's
//! path followed by `/name`.

/// Path of a folder named `name` under a parent with `parent_path`.
pub fn child_path(parent_path: Option<&str>, name: &str) -> String {
    match parent_path {
        Some(parent) => format!("{}/{}", parent.trim_end_matches('/'), name),
        None => format!("/{name}"),
    }
}

/// Rewrite `path` so that the `old_prefix` ancestor becomes `new_prefix`.
///
/// Returns `None` when `path` is not below `old_prefix`. An empty
/// `new_prefix` lifts the subtree to the root.
pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(old_prefix)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    Some(format!("{new_prefix}{rest}"))
}

/// The path of the parent of `path` (empty for root folders).
pub fn parent_prefix(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((parent, _)) => parent,
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_path() {
        assert_eq!(child_path(None, "Docs"), "/Docs");
        assert_eq!(child_path(Some("/Docs"), "2024"), "/Docs/2024");
        assert_eq!(child_path(Some("/Docs/"), "2024"), "/Docs/2024");
    }

    #[test]
    fn test_rebase() {
        assert_eq!(
            rebase("/Docs/2024/Q1", "/Docs", "/Archive").as_deref(),
            Some("/Archive/2024/Q1")
        );
        assert_eq!(rebase("/Docs/2024", "/Docs/2024", "").as_deref(), Some(""));
        assert_eq!(rebase("/Docs/2024/Q1", "/Docs/2024", "").as_deref(), Some("/Q1"));
        assert_eq!(rebase("/Documents", "/Docs", "/Archive"), None);
    }

    #[test]
    fn test_parent_prefix() {
        assert_eq!(parent_prefix("/Docs/2024"), "/Docs");
        assert_eq!(parent_prefix("/Docs"), "");
    }
}
