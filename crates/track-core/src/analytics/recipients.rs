//! Recipient field parsing
//!
//! The recipient column is free text. In practice it holds one address or a
//! comma-separated list copied straight out of a compose window, so the
//! aggregator normalizes it here and nowhere else.

/// Split a raw recipient field into individual addresses
///
/// Splits on commas, trims surrounding whitespace, lowercases, and drops
/// empty segments. Order is preserved; duplicates are kept (the caller
/// aggregates into a map anyway).
pub fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect()
}
