//! crates/page_builder_core/src/images.rs
//!
//! Pure helper turning a backend-relative image path into an absolute URL
//! for display. No state, no I/O.

/// Joins `path` onto `base` without doubling or dropping slashes. Paths that
/// are already absolute URLs pass through untouched.
pub fn resolve_image_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::resolve_image_url;

    #[test]
    fn joins_relative_paths_against_the_base() {
        assert_eq!(
            resolve_image_url("https://cdn.example.com", "/img/a.png"),
            "https://cdn.example.com/img/a.png"
        );
    }

    #[test]
    fn never_doubles_the_separator() {
        assert_eq!(
            resolve_image_url("https://cdn.example.com/", "/img/a.png"),
            "https://cdn.example.com/img/a.png"
        );
        assert_eq!(
            resolve_image_url("https://cdn.example.com", "img/a.png"),
            "https://cdn.example.com/img/a.png"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            resolve_image_url("https://cdn.example.com", "https://other.example.com/b.png"),
            "https://other.example.com/b.png"
        );
    }
}
