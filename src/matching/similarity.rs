use super::TokenSet;

/// Jaccard index `|A∩B| / |A∪B|`; two empty sets score `0.0`.
pub fn jaccard(left: &TokenSet, right: &TokenSet) -> f64 {
    let intersection = left.intersection(right).count();
    let union = left.len() + right.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::jaccard;
    use crate::matching::TokenSet;

    fn set(tokens: &[&str]) -> TokenSet {
        tokens.iter().map(|token| token.to_string()).collect()
    }

    #[test]
    fn test_jaccard_identical_sets_score_one() {
        let tokens = set(&["witcher", "3", "wild", "hunt"]);
        assert!((jaccard(&tokens, &tokens) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_disjoint_sets_score_zero() {
        assert_eq!(jaccard(&set(&["halo"]), &set(&["doom"])), 0.0);
    }

    #[test]
    fn test_jaccard_empty_sets_score_zero() {
        assert_eq!(jaccard(&set(&[]), &set(&[])), 0.0);
        assert_eq!(jaccard(&set(&["halo"]), &set(&[])), 0.0);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        let score = jaccard(&set(&["spider", "man"]), &set(&["spider", "man", "miles"]));
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&score));
    }
}
