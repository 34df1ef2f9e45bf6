//! Active-route highlighting.

/// Whether a sidebar item should be highlighted for the current path.
///
/// True on an exact match or when `current_path` lies below `item_path` on a
/// segment boundary: `/admin/loans/7` is under `/admin/loans`, but
/// `/admin/loansx` is not. Query strings, fragments and trailing slashes are
/// ignored.
pub fn is_active(current_path: &str, item_path: &str) -> bool {
    let current = segments(current_path);
    let item = segments(item_path);

    current.len() >= item.len() && current.iter().zip(&item).all(|(c, i)| c == i)
}

fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(is_active("/admin/loans", "/admin/loans"));
    }

    #[test]
    fn descendant_matches() {
        assert!(is_active("/admin/loans/7", "/admin/loans"));
        assert!(is_active("/admin/loans/7/edit", "/admin/loans"));
    }

    #[test]
    fn sibling_with_shared_prefix_does_not_match() {
        assert!(!is_active("/admin/loansx", "/admin/loans"));
        assert!(!is_active("/admin/loans-archive/1", "/admin/loans"));
    }

    #[test]
    fn ancestor_does_not_match() {
        assert!(!is_active("/admin", "/admin/loans"));
    }

    #[test]
    fn trailing_slash_and_query_are_ignored() {
        assert!(is_active("/admin/loans/", "/admin/loans"));
        assert!(is_active("/admin/loans?page=2", "/admin/loans"));
        assert!(is_active("/admin/loans#top", "/admin/loans/"));
    }

    #[test]
    fn unrelated_paths() {
        assert!(!is_active("/admin/users", "/admin/loans"));
        assert!(!is_active("/", "/admin/loans"));
    }
}
