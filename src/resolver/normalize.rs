use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold text into the form used for fuzzy matching.
///
/// Diacritics are removed (NFKD, then combining marks dropped), anything that
/// is not alphanumeric, whitespace or `-` is stripped, and whitespace runs are
/// collapsed to a single space. Case is preserved.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized and case-folded, for accent/case-insensitive comparisons.
pub fn fold(text: &str) -> String {
    normalize(text).to_lowercase()
}
