//! String utilities
//!
//! Character-boundary safe truncation and secret masking.

/// Safely truncate a string at a character boundary
///
/// # Example
/// ```
/// use reliability_assistant::utils::truncate_str;
///
/// assert_eq!(truncate_str("Насос ЦНС", 5), "Насос");
/// assert_eq!(truncate_str("pump", 100), "pump");
/// ```
pub fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate and append `suffix` only when something was cut
///
/// # Example
/// ```
/// use reliability_assistant::utils::truncate_with_suffix;
///
/// assert_eq!(truncate_with_suffix("Hello, World!", 5, "..."), "Hello...");
/// assert_eq!(truncate_with_suffix("Hi", 5, "..."), "Hi");
/// ```
pub fn truncate_with_suffix(s: &str, max_chars: usize, suffix: &str) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}{}", truncate_str(s, max_chars), suffix)
    }
}

/// Mask a secret for logging: first and last four characters survive
///
/// Secrets of eight characters or fewer are masked completely.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 8 {
        return "****".to_string();
    }

    let head: String = secret.chars().take(4).collect();
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}…{}", head, tail)
}
