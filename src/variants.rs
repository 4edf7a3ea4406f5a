//! Spelling variants of a base username.

use std::collections::HashSet;

/// Characters treated as word boundaries inside a username.
pub const SEPARATORS: [char; 3] = ['.', '-', '_'];

/// Minimum length (in characters) for splitting a separator-free name in half.
const MIN_SPLIT_LEN: usize = 4;

/// Generate the ordered, deduplicated spelling variants of `base`.
///
/// The name is split on `.`, `-` and `_`. A name without separators is split
/// at its midpoint when it is at least four characters long, otherwise it is
/// left whole. The parts are then re-joined concatenated, dotted, dashed and
/// underscored. The original always comes first and appears exactly once.
///
/// ```
/// use kosinter::variants::generate_variants;
///
/// assert_eq!(
///     generate_variants("john_doe"),
///     ["john_doe", "johndoe", "john.doe", "john-doe"],
/// );
/// assert_eq!(generate_variants("x"), ["x"]);
/// ```
#[must_use]
pub fn generate_variants(base: &str) -> Vec<String> {
    let parts = split_parts(base);

    let candidates = [
        base.to_string(),
        parts.concat(),
        parts.join("."),
        parts.join("-"),
        parts.join("_"),
    ];

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| !c.is_empty() && seen.insert(c.clone()))
        .collect()
}

fn split_parts(base: &str) -> Vec<&str> {
    if base.contains(SEPARATORS) {
        return base.split(SEPARATORS).collect();
    }

    let len = base.chars().count();
    if len < MIN_SPLIT_LEN {
        return vec![base];
    }

    // Split on a char boundary, not a byte offset.
    let mid = base
        .char_indices()
        .nth(len / 2)
        .map_or(base.len(), |(idx, _)| idx);
    let (head, tail) = base.split_at(mid);
    vec![head, tail]
}
