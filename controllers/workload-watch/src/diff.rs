//! Compact line diff between two canonical forms.

use similar::{ChangeTag, TextDiff};

/// Zero-context unified diff without headers or hunk markers.
///
/// Only changed lines are returned, each prefixed with `-` or `+`, joined by
/// `\n`. An empty `old` yields every line of `new` as an addition, and the
/// reverse for an empty `new`. Identical inputs yield an empty string.
pub fn compact_diff(old: &str, new: &str) -> String {
    // Compare newline-free lines so a final line without `\n` still matches
    // the same line once something is appended after it.
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let diff = TextDiff::from_slices(&old_lines, &new_lines);

    diff.iter_all_changes()
        .filter_map(|change| {
            let sign = match change.tag() {
                ChangeTag::Delete => '-',
                ChangeTag::Insert => '+',
                ChangeTag::Equal => return None,
            };
            Some(format!("{}{}", sign, change.value()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_old_is_pure_addition() {
        let diff = compact_diff("", "name: api\nreplicas: 3");
        assert_eq!(diff, "+name: api\n+replicas: 3");
    }

    #[test]
    fn test_empty_new_is_pure_removal() {
        let diff = compact_diff("name: api\nreplicas: 3", "");
        assert_eq!(diff, "-name: api\n-replicas: 3");
    }

    #[test]
    fn test_identical_inputs_yield_empty_diff() {
        assert_eq!(compact_diff("a\nb\nc", "a\nb\nc"), "");
    }

    #[test]
    fn test_single_line_change_has_no_context() {
        let old = "name: api\nnamespace: default\nreplicas: 3\nselector: {}";
        let new = "name: api\nnamespace: default\nreplicas: 5\nselector: {}";
        assert_eq!(compact_diff(old, new), "-replicas: 3\n+replicas: 5");
    }

    #[test]
    fn test_no_headers_or_hunk_markers() {
        let diff = compact_diff("a\nb\nc\nd", "a\nx\nc\ny");
        assert!(diff.lines().all(|line| line.starts_with('-') || line.starts_with('+')));
        assert!(!diff.contains("@@"));
        assert!(!diff.contains("---"));
        assert!(!diff.contains("+++"));
        assert_eq!(diff.lines().count(), 4);
    }

    #[test]
    fn test_trailing_newline_does_not_leak_into_lines() {
        let diff = compact_diff("replicas: 3\n", "replicas: 5\n");
        assert_eq!(diff, "-replicas: 3\n+replicas: 5");
    }

    #[test]
    fn test_line_appended_after_last_line() {
        assert_eq!(compact_diff("a\nb", "a\nb\nc"), "+c");

        let old = "replicas: 3\nterminationGracePeriodSeconds: 30";
        let new = "replicas: 3\nterminationGracePeriodSeconds: 30\nvolumes: []";
        assert_eq!(compact_diff(old, new), "+volumes: []");
    }

    #[test]
    fn test_last_line_removed() {
        assert_eq!(compact_diff("a\nb\nc", "a\nb"), "-c");
    }

    #[test]
    fn test_mixed_trailing_newlines_compare_equal() {
        assert_eq!(compact_diff("a\nb\n", "a\nb"), "");
    }
}
