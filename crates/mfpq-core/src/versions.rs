//! Ordering for dotted application version strings.
//!
//! Versions have no fixed scheme in the index, so the comparison is
//! deliberately loose: numeric where possible, lexical where not.

use std::cmp::Ordering;

/// Compare two dotted version strings.
///
/// Rules, applied segment by segment after splitting on `'.'`:
/// - both segments parse as integers: compare numerically, so
///   `"1.9" < "1.10"`;
/// - otherwise: compare the segments lexically;
/// - all shared segments equal: the string with fewer segments is less,
///   so `"1.0" < "1.0.1"`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(nx), Ok(ny)) => nx.cmp(&ny),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_segments_compare_numerically() {
        assert_eq!(compare_versions("1.9", "1.10"), Ordering::Less);
        assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
        assert_eq!(compare_versions("2.0", "10.0"), Ordering::Less);
    }

    #[test]
    fn test_equal_versions() {
        assert_eq!(compare_versions("1.0", "1.0"), Ordering::Equal);
        assert_eq!(compare_versions("", ""), Ordering::Equal);
    }

    #[test]
    fn test_shorter_is_less_on_shared_prefix() {
        assert_eq!(compare_versions("1.0", "1.0.1"), Ordering::Less);
        assert_eq!(compare_versions("1.0.1", "1.0"), Ordering::Greater);
        assert_eq!(compare_versions("1", "1.0"), Ordering::Less);
    }

    #[test]
    fn test_first_differing_segment_decides() {
        assert_eq!(compare_versions("2.0.9", "1.9.100"), Ordering::Greater);
    }

    #[test]
    fn test_non_numeric_segments_compare_lexically() {
        assert_eq!(compare_versions("1.0a", "1.0b"), Ordering::Less);
        // "10" vs "beta" is a mixed pair, so lexical: '1' sorts before 'b'.
        assert_eq!(compare_versions("1.10", "1.beta"), Ordering::Less);
    }

    #[test]
    fn test_leading_zeros_are_numeric() {
        assert_eq!(compare_versions("1.02", "1.2"), Ordering::Equal);
        assert_eq!(compare_versions("1.010", "1.9"), Ordering::Greater);
    }
}
