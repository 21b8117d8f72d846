use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deduplicates `urls`, then derives a filename base that is stable across runs and independent
/// of input ordering.
///
/// Two crawls over the same URL set always produce the same base name, which is what lets a
/// rerun resume automatically without the caller naming an output file.
pub fn derive_name(urls: &[String]) -> String {
    let mut unique: Vec<&str> = urls.iter().map(String::as_str).collect();
    unique.sort_unstable();
    unique.dedup();

    let mut hasher = DefaultHasher::new();
    for url in &unique {
        url.hash(&mut hasher);
    }

    format!("{:016x}", hasher.finish())
}

/// Deduplicates `urls`, preserving the order of first occurrence.
pub fn dedupe_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    urls.into_iter().filter(|url| seen.insert(url.clone())).collect()
}
