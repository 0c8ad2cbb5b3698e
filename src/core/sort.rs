use std::cmp::Ordering;

use crate::models::Build;

/// Numeric-aware, case-insensitive comparison of build numbers.
///
/// Digit runs compare as integers, so "20240128.10" sorts after
/// "20240128.2"; everything else compares character by character,
/// case-insensitively.
pub fn compare_build_numbers(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let ordering = compare_digit_runs(&mut left, &mut right);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                let ordering = x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

/// Compares two digit runs as integers without overflowing on long runs:
/// leading zeros are skipped, then the longer run wins, then lexicographic.
fn compare_digit_runs(
    left: &mut std::iter::Peekable<std::str::Chars<'_>>,
    right: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Ordering {
    let a = take_digit_run(left);
    let b = take_digit_run(right);

    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');

    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Sorts builds by build number, newest (highest) first.
///
/// The sort is stable: builds with equal numbers keep their relative order.
pub fn sort_by_build_number_desc(builds: &mut [Build]) {
    builds.sort_by(|a, b| compare_build_numbers(&b.build_number, &a.build_number));
}

/// Borrowing variant used after filtering, which yields references.
pub fn sort_refs_by_build_number_desc(builds: &mut [&Build]) {
    builds.sort_by(|a, b| compare_build_numbers(&b.build_number, &a.build_number));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildReason, BuildStatus, DefinitionRef, ProjectRef};

    fn build(id: i64, number: &str) -> Build {
        Build {
            id,
            build_number: number.to_string(),
            status: BuildStatus::Completed,
            result: None,
            queue_time: None,
            start_time: None,
            finish_time: None,
            source_branch: "refs/heads/main".to_string(),
            reason: BuildReason::IndividualCi,
            tags: vec![],
            definition: DefinitionRef {
                id: 1,
                name: "pipeline".to_string(),
            },
            project: ProjectRef {
                id: "p-1".to_string(),
                name: "Phoenix".to_string(),
            },
        }
    }

    #[test]
    fn test_digit_runs_compare_numerically() {
        let mut builds = vec![build(1, "p.9"), build(2, "p.10"), build(3, "p.2")];
        sort_by_build_number_desc(&mut builds);

        let numbers: Vec<&str> = builds.iter().map(|b| b.build_number.as_str()).collect();
        assert_eq!(numbers, vec!["p.10", "p.9", "p.2"]);
    }

    #[test]
    fn test_date_prefixed_numbers() {
        let mut builds = vec![
            build(1, "20240128.2"),
            build(2, "20240128.10"),
            build(3, "20240127.99"),
        ];
        sort_by_build_number_desc(&mut builds);

        let numbers: Vec<&str> = builds.iter().map(|b| b.build_number.as_str()).collect();
        assert_eq!(numbers, vec!["20240128.10", "20240128.2", "20240127.99"]);
    }

    #[test]
    fn test_comparison_is_case_insensitive() {
        assert_eq!(
            compare_build_numbers("Build.5", "build.5"),
            std::cmp::Ordering::Equal
        );
        assert_eq!(
            compare_build_numbers("alpha.2", "BETA.1"),
            std::cmp::Ordering::Less
        );
    }

    #[test]
    fn test_leading_zeros_do_not_change_value() {
        assert_eq!(
            compare_build_numbers("1.007", "1.7"),
            std::cmp::Ordering::Equal
        );
        assert_eq!(
            compare_build_numbers("1.010", "1.9"),
            std::cmp::Ordering::Greater
        );
    }

    #[test]
    fn test_prefix_is_smaller() {
        assert_eq!(
            compare_build_numbers("1.2", "1.2.1"),
            std::cmp::Ordering::Less
        );
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let mut builds = vec![build(1, "1.1"), build(2, "1.1"), build(3, "1.1")];
        sort_by_build_number_desc(&mut builds);

        let ids: Vec<i64> = builds.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_sorting_refs_matches_owned_sorting() {
        let builds = vec![build(1, "p.9"), build(2, "p.10"), build(3, "p.2")];
        let mut refs: Vec<&Build> = builds.iter().collect();
        sort_refs_by_build_number_desc(&mut refs);

        let numbers: Vec<&str> = refs.iter().map(|b| b.build_number.as_str()).collect();
        assert_eq!(numbers, vec!["p.10", "p.9", "p.2"]);
    }
}
