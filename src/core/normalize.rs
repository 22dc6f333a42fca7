//! Dependency name normalization
//!
//! Maps raw `BuildRequires` tokens to package-name candidates that can be
//! looked up directly in a batch.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Suffix carried by header sub-packages of a base package
pub const DEVEL_SUFFIX: &str = "-devel";

fn package_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._+-]*").expect("name pattern is valid"))
}

/// Leading package-name run of a token
///
/// Strips anything after the name, e.g. `foo>=1.2` becomes `foo` and
/// `pkgconfig(glib-2.0)` becomes `pkgconfig`. Returns `None` for tokens that
/// do not start with a letter, such as `>=` or `1.2.3`.
pub fn extract_name(token: &str) -> Option<&str> {
    package_name_regex()
        .find(token)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}

/// Canonical name for a dependency: the name with any `-devel` suffix removed
pub fn canonical_name(name: &str) -> &str {
    match name.strip_suffix(DEVEL_SUFFIX) {
        Some(base) if !base.is_empty() => base,
        _ => name,
    }
}

/// Normalize raw dependency tokens
///
/// Tokens without a leading name are dropped and duplicates collapse to
/// their first occurrence.
pub fn normalize_dependencies<'a, I>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for token in tokens {
        let Some(name) = extract_name(token) else {
            continue;
        };
        let canonical = canonical_name(name);
        if seen.insert(canonical.to_string()) {
            result.push(canonical.to_string());
        }
    }

    result
}
