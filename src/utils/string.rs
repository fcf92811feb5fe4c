//! Helpers for user-facing messages

/// English plural of `noun` for `count` items
///
/// Covers the nouns the status lines use: `module` becomes `modules`,
/// `dependency` becomes `dependencies`.
pub fn pluralize(noun: &str, count: usize) -> String {
    if count == 1 {
        return noun.to_string();
    }

    match noun.strip_suffix('y') {
        Some(stem) if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) => format!("{stem}ies"),
        _ => format!("{noun}s"),
    }
}
