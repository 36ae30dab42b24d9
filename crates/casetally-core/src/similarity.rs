use crate::features::vectorize;

/// Normalised feature overlap between `query` and `target`, in `[0, 1]`.
///
/// Both strings are lowercased and vectorized. For every feature of the query
/// the smaller of the two counts is added to the overlap, and the overlap is
/// divided by the larger of the two total weights. Two empty strings score
/// 0.0.
pub fn similarity(query: &str, target: &str) -> f64 {
    let query_v = vectorize(&query.to_lowercase());
    let target_v = vectorize(&target.to_lowercase());

    let overlap: usize = query_v
        .iter()
        .map(|(feature, &count)| count.min(target_v.get(feature)))
        .sum();

    let denominator = query_v.total_weight().max(target_v.total_weight());
    if denominator == 0 {
        return 0.0;
    }
    overlap as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        for s in ["a", "salta", "Santiago del Estero", "neuquén"] {
            assert_eq!(similarity(s, s), 1.0, "input {s:?}");
        }
    }

    #[test]
    fn test_case_is_ignored() {
        assert_eq!(similarity("SALTA", "salta"), 1.0);
    }

    #[test]
    fn test_both_empty_is_zero() {
        assert_eq!(similarity("", ""), 0.0);
    }

    #[test]
    fn test_one_empty_is_zero() {
        assert_eq!(similarity("", "salta"), 0.0);
        assert_eq!(similarity("salta", ""), 0.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(similarity("xyz", "abc"), 0.0);
    }

    #[test]
    fn test_normalised_by_larger_vector() {
        // "ab" is fully contained in "abc": overlap 3, totals 3 and 5.
        assert!((similarity("ab", "abc") - 0.6).abs() < 1e-12);
        assert!((similarity("abc", "ab") - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_bounded() {
        let pairs = [
            ("la rioja", "rioja"),
            ("san luis", "san juan"),
            ("aaaa", "a"),
            ("tierra del fuego", "fuego"),
            ("pcia", "provincia de buenos aires"),
        ];
        for (a, b) in pairs {
            let s = similarity(a, b);
            assert!((0.0..=1.0).contains(&s), "{a:?} vs {b:?} scored {s}");
        }
    }

    #[test]
    fn test_closer_string_scores_higher() {
        assert!(similarity("san juan", "san juan") > similarity("san juan", "san luis"));
        assert!(similarity("cordoba", "cordoba") > similarity("cordoba", "corrientes"));
    }
}
