use crate::source::PackageSource;

/// `username/repository` -> `repository`
#[must_use]
pub fn basename(name: &str) -> &str {
    match name.split_once('/') {
        Some((_, rest)) => rest,
        None => name,
    }
}

/// `boost/bind` -> `boost-bind`
#[must_use]
pub fn slash_to_hyphen(name: &str) -> String {
    name.replace('/', "-")
}

/// One tag component: a run of digits, or `*` in the final position.
#[derive(Debug, PartialEq, Eq)]
enum TagToken {
    Digits(String),
    Star,
}

/// Scan a tag of the form `v?DIGITS((.|_)DIGITS)*` with a trailing `*`
/// allowed, at most three components. Returns the components in order, or
/// `None` when the tag does not fit the grammar.
fn scan_tag_components(tag: &str) -> Option<Vec<TagToken>> {
    let rest = tag.strip_prefix('v').unwrap_or(tag);
    if rest.is_empty() {
        return None;
    }

    let mut components = Vec::new();
    for part in rest.split(['.', '_']) {
        if part == "*" {
            components.push(TagToken::Star);
        } else if !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()) {
            components.push(TagToken::Digits(part.to_string()));
        } else {
            return None;
        }
    }

    if components.len() > 3 {
        return None;
    }
    // `*` is only admitted as the final component.
    if components
        .iter()
        .rev()
        .skip(1)
        .any(|t| matches!(t, TagToken::Star))
    {
        return None;
    }

    Some(components)
}

/// Numeric tag -> (major, minor, patch) strings, reproducing the greedy
/// group assignment of the reference pattern
/// `^(v?)(?:(\d+)(\.|_))?(?:(\d+)(\.|_))?(\*|\d+)$`:
/// a two-component tag binds major and patch and leaves minor empty.
fn parse_numeric_tag(tag: &str) -> Option<(String, String, String)> {
    let mut components = scan_tag_components(tag)?;

    let text = |token: TagToken| match token {
        TagToken::Digits(digits) => digits,
        TagToken::Star => "*".to_string(),
    };

    let last = text(components.pop()?);
    let mut leading = components.into_iter().map(text);
    match (leading.next(), leading.next()) {
        (None, _) => Some((String::new(), String::new(), last)),
        (Some(first), None) => Some((first, String::new(), last)),
        (Some(first), Some(second)) => Some((first, second, last)),
    }
}

/// `opencv/opencv` + `3.4.2` -> `opencv-3.4.2`
/// `curl/curl` + `7_61_0` -> `curl-7.61.0`
/// `curl/curl` + `curl-7_61_0` -> `curl-7_61_0` (verbatim fallback)
fn to_cache_git(name: &str, tag: &str) -> String {
    let prefix = basename(name);

    match parse_numeric_tag(tag) {
        Some((major, minor, patch)) => format!("{prefix}-{major}.{minor}.{patch}"),
        None => tag.to_string(),
    }
}

/// `boost/config` + `1.66.0` -> `boost-config-1.66.0`
fn to_cache_registry(name: &str, version: &str) -> String {
    let name = slash_to_hyphen(name);
    format!("{name}-{version}")
}

/// Canonical shared-cache directory name for one package version.
#[must_use]
pub fn to_cache_key(source: PackageSource, name: &str, version: &str) -> String {
    match source {
        PackageSource::Registry => to_cache_registry(name, version),
        PackageSource::Git => to_cache_git(name, version),
    }
}

/// `opencv-3.4.2` -> `opencv`
#[must_use]
pub fn cache_key_to_current_key(cache_key: &str) -> &str {
    match cache_key.rfind('-') {
        Some(pos) => &cache_key[..pos],
        None => cache_key,
    }
}

/// Canonical `deps` directory name for a package, version-agnostic.
#[must_use]
pub fn to_current_key(source: PackageSource, name: &str, version: &str) -> String {
    match source {
        PackageSource::Registry => slash_to_hyphen(name),
        PackageSource::Git => {
            let cache_key = to_cache_git(name, version);
            cache_key_to_current_key(&cache_key).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PackageSource::{Git, Registry};

    #[test]
    fn test_basename() {
        assert_eq!(basename("boost/bind"), "bind");
        assert_eq!(basename("boost"), "boost");
    }

    #[test]
    fn test_slash_to_hyphen() {
        assert_eq!(slash_to_hyphen("boost/bind"), "boost-bind");
    }

    #[test]
    fn test_cache_key_git_dotted_tag() {
        assert_eq!(to_cache_key(Git, "opencv/opencv", "3.4.2"), "opencv-3.4.2");
    }

    #[test]
    fn test_cache_key_git_underscore_tag() {
        assert_eq!(to_cache_key(Git, "curl/curl", "7_61_0"), "curl-7.61.0");
    }

    #[test]
    fn test_cache_key_git_v_prefixed_tag() {
        assert_eq!(
            to_cache_key(Git, "matken11235/logger_slack_backend", "v0.1.0"),
            "logger_slack_backend-0.1.0"
        );
    }

    #[test]
    fn test_cache_key_git_raw_fallback() {
        // Non-numeric refs pass through verbatim and unprefixed.
        assert_eq!(
            to_cache_key(Git, "curl/curl", "curl-7_61_0"),
            "curl-7_61_0"
        );
        assert_eq!(to_cache_key(Git, "curl/curl", "master"), "master");
        assert_eq!(to_cache_key(Git, "curl/curl", "1.2.3.4"), "1.2.3.4");
    }

    #[test]
    fn test_cache_key_git_partial_tags() {
        // Two components bind major and patch; minor stays empty.
        assert_eq!(to_cache_key(Git, "curl/curl", "7_61"), "curl-7..61");
        assert_eq!(to_cache_key(Git, "curl/curl", "61"), "curl-..61");
        assert_eq!(to_cache_key(Git, "curl/curl", "1.*"), "curl-1..*");
    }

    #[test]
    fn test_cache_key_registry() {
        assert_eq!(
            to_cache_key(Registry, "boost/config", "1.66.0"),
            "boost-config-1.66.0"
        );
    }

    #[test]
    fn test_cache_key_to_current_key() {
        assert_eq!(cache_key_to_current_key("opencv-3.4.2"), "opencv");
        assert_eq!(
            cache_key_to_current_key("boost-config-1.66.0"),
            "boost-config"
        );
        assert_eq!(cache_key_to_current_key("master"), "master");
    }

    #[test]
    fn test_current_key_matches_cache_key_derivation() {
        let cases = [
            ("opencv/opencv", "3.4.2"),
            ("curl/curl", "7_61_0"),
            ("curl/curl", "curl-7_61_0"),
            ("matken11235/logger_slack_backend", "v0.1.0"),
            ("boost", "1.66.0"),
            ("curl/curl", "master"),
        ];
        for (name, version) in cases {
            let via_cache = cache_key_to_current_key(&to_cache_key(Git, name, version)).to_string();
            assert_eq!(via_cache, to_current_key(Git, name, version));
        }
    }

    #[test]
    fn test_cache_key_idempotent() {
        let first = to_cache_key(Git, "curl/curl", "7_61_0");
        let second = to_cache_key(Git, "curl/curl", "7_61_0");
        assert_eq!(first, second);
    }

    #[test]
    fn test_current_key_registry_ignores_version() {
        assert_eq!(to_current_key(Registry, "boost/config", "1.66.0"), "boost-config");
    }
}
