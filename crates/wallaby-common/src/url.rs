//! URL resolution utilities.
//!
//! Elements created during a parse inherit the session's base URI so that
//! relative URLs in attributes (`href`, `src`, form `action`) can be made
//! absolute later. Resolution follows the common-case rules of the
//! [URL Standard](https://url.spec.whatwg.org/) without implementing the
//! full parsing algorithm.

/// Returns true when `href` already carries a URL scheme.
///
/// [URL Standard § 4.3](https://url.spec.whatwg.org/#url-parsing)
/// "An absolute-URL string is a URL-scheme string, followed by U+003A (:),
/// followed by a scheme-specific part."
#[must_use]
pub fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolve a potentially relative URL against a base URL.
///
/// STEP 1: If url is an absolute URL, return url.
///
/// STEP 2: Otherwise, resolve url relative to base.
///
/// NOTE: This is a simplified implementation. Full URL resolution requires
/// implementing the URL Standard's URL parsing algorithm.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    // STEP 1: Check if href is already absolute.
    if has_scheme(href) {
        return href.to_string();
    }

    // STEP 2: Resolve relative URL against base.
    let Some(base) = base_url else {
        return href.to_string();
    };

    if href.starts_with("//") {
        // Protocol-relative URL - prepend scheme from base
        base.split_once(':').map_or_else(
            || format!("http:{href}"),
            |(scheme, _)| format!("{scheme}:{href}"),
        )
    } else if href.starts_with('/') {
        // Absolute path - join with the base's origin
        base.find("://").map_or_else(
            || href.to_string(),
            |scheme_end| {
                let after_scheme = &base[scheme_end + 3..];
                after_scheme.find('/').map_or_else(
                    // No path in base, just append
                    || format!("{base}{href}"),
                    |path_start| {
                        let origin = &base[..scheme_end + 3 + path_start];
                        format!("{origin}{href}")
                    },
                )
            },
        )
    } else {
        // Relative path - join with base directory
        //
        // TODO(url-resolution): normalize `.` and `..` path segments.
        let base_dir = base.rsplit_once('/').map_or(base, |(dir, _)| dir);
        format!("{base_dir}/{href}")
    }
}

#[cfg(test)]
mod tests {
    use super::{has_scheme, resolve_url};

    #[test]
    fn absolute_urls_pass_through() {
        assert!(has_scheme("https://example.com/a"));
        assert!(has_scheme("data:text/plain,hi"));
        assert!(!has_scheme("/rooted/path"));
        assert!(!has_scheme("relative/path"));
        assert_eq!(
            resolve_url("https://example.com/a", Some("https://other.com/")),
            "https://example.com/a"
        );
    }

    #[test]
    fn relative_paths_join_with_base_directory() {
        assert_eq!(
            resolve_url("login", Some("https://example.com/account/index.html")),
            "https://example.com/account/login"
        );
    }

    #[test]
    fn rooted_paths_join_with_origin() {
        assert_eq!(
            resolve_url("/submit", Some("https://example.com/deep/page.html")),
            "https://example.com/submit"
        );
    }

    #[test]
    fn protocol_relative_takes_base_scheme() {
        assert_eq!(
            resolve_url("//cdn.example.com/x", Some("https://example.com/")),
            "https://cdn.example.com/x"
        );
    }

    #[test]
    fn missing_base_returns_href_unchanged() {
        assert_eq!(resolve_url("form.cgi", None), "form.cgi");
    }
}
