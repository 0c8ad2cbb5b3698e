use crate::models::Build;

/// Filter criteria for a build list. All present criteria are ANDed; an
/// absent or empty criterion matches everything.
#[derive(Debug, Clone, Default)]
pub struct BuildFilterCriteria {
    /// Substring match against the branch, with `refs/heads/` stripped from
    /// both sides first. "main" therefore matches `refs/heads/main` and also
    /// `refs/heads/main-hotfix` -- intentional, see the module tests.
    pub branch: Option<String>,
    /// Exact match against the wire-format trigger reason
    pub reason: Option<String>,
    /// Exact match against the wire-format build status
    pub status: Option<String>,
    /// Exact match against the owning pipeline definition id
    pub pipeline_id: Option<i64>,
}

impl BuildFilterCriteria {
    fn matches(&self, build: &Build) -> bool {
        if let Some(branch) = self.branch.as_deref() {
            if !branch.is_empty() {
                let wanted = strip_ref_prefix(branch);
                let actual = strip_ref_prefix(&build.source_branch);
                if !actual.contains(wanted) {
                    return false;
                }
            }
        }

        if let Some(reason) = self.reason.as_deref() {
            if !reason.is_empty() && build.reason.as_str() != reason {
                return false;
            }
        }

        if let Some(status) = self.status.as_deref() {
            if !status.is_empty() && build.status.as_str() != status {
                return false;
            }
        }

        if let Some(pipeline_id) = self.pipeline_id {
            if build.definition.id != pipeline_id {
                return false;
            }
        }

        true
    }
}

/// Returns the builds matching `criteria`, preserving input order.
///
/// The input is never mutated; the result borrows from it.
pub fn filter_builds<'a>(builds: &'a [Build], criteria: &BuildFilterCriteria) -> Vec<&'a Build> {
    builds
        .iter()
        .filter(|build| criteria.matches(build))
        .collect()
}

fn strip_ref_prefix(branch: &str) -> &str {
    branch.strip_prefix("refs/heads/").unwrap_or(branch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildReason, BuildResult, BuildStatus, DefinitionRef, ProjectRef};

    fn build(id: i64, branch: &str, reason: BuildReason, status: BuildStatus, pipeline: i64) -> Build {
        Build {
            id,
            build_number: format!("20240128.{id}"),
            status,
            result: match status {
                BuildStatus::Completed => Some(BuildResult::Succeeded),
                _ => None,
            },
            queue_time: None,
            start_time: None,
            finish_time: None,
            source_branch: branch.to_string(),
            reason,
            tags: vec![],
            definition: DefinitionRef {
                id: pipeline,
                name: format!("pipeline-{pipeline}"),
            },
            project: ProjectRef {
                id: "p-1".to_string(),
                name: "Phoenix".to_string(),
            },
        }
    }

    fn sample() -> Vec<Build> {
        vec![
            build(
                1,
                "refs/heads/main",
                BuildReason::IndividualCi,
                BuildStatus::Completed,
                10,
            ),
            build(
                2,
                "refs/heads/main-hotfix",
                BuildReason::Manual,
                BuildStatus::Completed,
                10,
            ),
            build(
                3,
                "refs/heads/feature/login",
                BuildReason::PullRequest,
                BuildStatus::InProgress,
                11,
            ),
        ]
    }

    #[test]
    fn test_no_criteria_returns_everything_in_order() {
        let builds = sample();
        let filtered = filter_builds(&builds, &BuildFilterCriteria::default());

        assert_eq!(filtered.len(), builds.len());
        for (kept, original) in filtered.iter().zip(builds.iter()) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn test_branch_filter_is_substring_after_prefix_strip() {
        // Documented quirk: "main" matches main AND main-hotfix. Intentional,
        // not a bug to fix.
        let builds = sample();
        let criteria = BuildFilterCriteria {
            branch: Some("main".to_string()),
            ..Default::default()
        };

        let filtered = filter_builds(&builds, &criteria);
        let ids: Vec<i64> = filtered.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_branch_filter_accepts_ref_qualified_input() {
        let builds = sample();
        let criteria = BuildFilterCriteria {
            branch: Some("refs/heads/feature/login".to_string()),
            ..Default::default()
        };

        let filtered = filter_builds(&builds, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 3);
    }

    #[test]
    fn test_empty_branch_filter_matches_all() {
        let builds = sample();
        let criteria = BuildFilterCriteria {
            branch: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(filter_builds(&builds, &criteria).len(), 3);
    }

    #[test]
    fn test_reason_filter_is_exact() {
        let builds = sample();
        let criteria = BuildFilterCriteria {
            reason: Some("individualCI".to_string()),
            ..Default::default()
        };

        let filtered = filter_builds(&builds, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);

        // Partial reason names do not match
        let criteria = BuildFilterCriteria {
            reason: Some("individual".to_string()),
            ..Default::default()
        };
        assert!(filter_builds(&builds, &criteria).is_empty());
    }

    #[test]
    fn test_status_filter_is_exact() {
        let builds = sample();
        let criteria = BuildFilterCriteria {
            status: Some("inProgress".to_string()),
            ..Default::default()
        };

        let filtered = filter_builds(&builds, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 3);
    }

    #[test]
    fn test_pipeline_filter_matches_definition_id() {
        let builds = sample();
        let criteria = BuildFilterCriteria {
            pipeline_id: Some(11),
            ..Default::default()
        };

        let filtered = filter_builds(&builds, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 3);
    }

    #[test]
    fn test_criteria_are_anded() {
        let builds = sample();
        let criteria = BuildFilterCriteria {
            branch: Some("main".to_string()),
            reason: Some("manual".to_string()),
            status: Some("completed".to_string()),
            pipeline_id: Some(10),
        };

        let filtered = filter_builds(&builds, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let criteria = BuildFilterCriteria {
            branch: Some("main".to_string()),
            ..Default::default()
        };

        assert!(filter_builds(&[], &criteria).is_empty());
    }
}
