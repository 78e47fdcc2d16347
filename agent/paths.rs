//! Enumeration of the choice-path key space.

/// All 2^k fixed-width binary strings of length `k`, zero-padded, in
/// increasing numeric order. Seeds the prediction table so that every path —
/// including those no simulated agent ever takes — has a bucket.
///
/// `k` is bounded by memory (2^k keys); the survey configuration uses k = 9.
pub fn enumerate_paths(k: usize) -> Vec<String> {
    assert!(k < usize::BITS as usize, "path space of 2^{k} keys cannot be enumerated");
    if k == 0 {
        // A survey with no decision columns has exactly one (empty) path.
        return vec![String::new()];
    }
    (0..1usize << k).map(|i| format!("{i:0k$b}")).collect()
}
