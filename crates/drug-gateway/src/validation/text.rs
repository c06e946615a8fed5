//! Free-text normalization for search terms.

/// Longest normalized query sent to the search backend, in characters.
pub const MAX_QUERY_CHARS: usize = 100;

/// Raw queries longer than this are rejected instead of truncated.
pub const MAX_RAW_QUERY_CHARS: usize = 1000;

/// Characters the search backend cannot handle.
pub(crate) const UNSAFE_CHARS: &[char] = &['<', '>', '"', '\'', ';', '\\', '{', '}', '[', ']', '%', '*'];

/// Normalize a free-text search term.
///
/// Strips unsafe and control characters, collapses whitespace runs into a
/// single space, trims, and caps the result at [`MAX_QUERY_CHARS`].
/// Idempotent: `normalize_query(&normalize_query(x)) == normalize_query(x)`.
///
/// # Examples
///
/// ```
/// use drug_gateway::validation::normalize_query;
///
/// assert_eq!(normalize_query("  para<cetamol \t 500 "), "paracetamol 500");
/// ```
pub fn normalize_query(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !UNSAFE_CHARS.contains(c))
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    // Capping can leave a trailing space behind
    let capped: String = collapsed.chars().take(MAX_QUERY_CHARS).collect();
    capped.trim_end().to_string()
}
