//! Directive line scanning
//!
//! First pass over expanded descriptor text: every line of the shape
//! `<Key>:<value>` with a recognized key becomes a [`Directive`]. Per-key
//! rules (scalar vs. list) are applied afterwards by [`crate::core::descriptor`].

use std::sync::OnceLock;

use regex::Regex;

/// Directive keys the parser cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKey {
    /// Package name, exactly one per descriptor
    Name,
    /// Build-time dependencies, repeatable
    BuildRequires,
    /// Architectures the package must not be built on
    ExcludeArch,
    /// Architectures the package may only be built on
    ExclusiveArch,
}

impl DirectiveKey {
    /// All recognized keys
    pub const ALL: [DirectiveKey; 4] = [
        DirectiveKey::Name,
        DirectiveKey::BuildRequires,
        DirectiveKey::ExcludeArch,
        DirectiveKey::ExclusiveArch,
    ];

    /// Key as written in the descriptor
    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveKey::Name => "Name",
            DirectiveKey::BuildRequires => "BuildRequires",
            DirectiveKey::ExcludeArch => "ExcludeArch",
            DirectiveKey::ExclusiveArch => "ExclusiveArch",
        }
    }

    /// Look up a key by its exact (case-sensitive) spelling
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl std::fmt::Display for DirectiveKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recognized directive line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Which directive this is
    pub key: DirectiveKey,
    /// Raw value after the colon, surrounding whitespace trimmed
    pub value: String,
}

fn directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z][A-Za-z0-9]*):(.*)$").expect("directive pattern is valid")
    })
}

/// Scan text for recognized directive lines, in document order
pub fn scan(text: &str) -> Vec<Directive> {
    let re = directive_regex();

    text.lines()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            let key = DirectiveKey::from_key(caps.get(1)?.as_str())?;
            let value = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            Some(Directive { key, value })
        })
        .collect()
}

/// Values of every occurrence of `key`, in document order
pub fn values_of(directives: &[Directive], key: DirectiveKey) -> impl Iterator<Item = &str> {
    directives
        .iter()
        .filter(move |d| d.key == key)
        .map(|d| d.value.as_str())
}

/// Split a list-valued directive on commas and whitespace, dropping empties
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}
