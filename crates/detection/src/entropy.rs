use std::collections::HashMap;

/// Shannon entropy (bits) over the character multiset of `s`.
///
/// Empty input is 0 (empty sum), as is any single-symbol string. Counted
/// per `char`, not per byte, to stay consistent with the training pipeline.
pub fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<char, u64> = HashMap::new();
    let mut total = 0u64;
    for ch in s.chars() {
        *counts.entry(ch).or_insert(0) += 1;
        total += 1;
    }

    let n = total as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / n;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(shannon_entropy(""), 0.0);
    }

    #[test]
    fn uniform_repeat_is_zero() {
        assert!(shannon_entropy("aaaa").abs() < 1e-12);
    }

    #[test]
    fn two_distinct_chars_is_one_bit() {
        assert!((shannon_entropy("ab") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invariant_under_permutation() {
        let a = shannon_entropy("google");
        let b = shannon_entropy("elgoog");
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn random_looking_label_scores_higher_than_word() {
        assert!(shannon_entropy("1cb8a5f36f") > shannon_entropy("google"));
    }
}
