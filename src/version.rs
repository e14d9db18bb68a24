// src/version.rs

//! Loose version comparison
//!
//! Mod versions rarely follow strict SemVer (`v` prefixes, `-beta` suffixes,
//! build metadata), so this comparator tokenizes instead of parsing: split on
//! runs of non-alphanumeric characters, then compare token by token,
//! numerically when both tokens are plain integers and lexicographically
//! otherwise. Missing trailing tokens count as "0", so "1.2" == "1.2.0".

use std::cmp::Ordering;

/// Compare two version strings.
///
/// Total order over arbitrary strings: `compare(a, b) == compare(b, a).reverse()`
/// and `compare(a, a) == Ordering::Equal`. An empty string compares as all
/// zeros and therefore sorts below any non-zero numeric version.
pub fn compare(a: &str, b: &str) -> Ordering {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    let len = tokens_a.len().max(tokens_b.len());
    for i in 0..len {
        let va = tokens_a.get(i).copied().unwrap_or("0");
        let vb = tokens_b.get(i).copied().unwrap_or("0");

        let ordering = match (va.parse::<u64>(), vb.parse::<u64>()) {
            // Both tokens are plain integers: 10 > 9
            (Ok(na), Ok(nb)) => na.cmp(&nb),
            // Otherwise fall back to code-point order
            _ => va.cmp(vb),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

/// Split a version string into comparison tokens, dropping empty runs.
fn tokenize(version: &str) -> Vec<&str> {
    version
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect()
}
