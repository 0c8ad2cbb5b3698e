//! Synthetic data generator used when the Azure DevOps API is unreachable.
//!
//! Generation is random but contract-bound: build numbers strictly decrease
//! with index, timestamps grow older with index, only the newest builds may be
//! in progress, and the Release view's "latest main-branch CI build" is
//! guaranteed to exist for small requests. Tests pin the random source with
//! [`MockGenerator::seeded`]; the contracts hold for every seed.

use chrono::{Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::models::{
    Build, BuildReason, BuildResult, BuildStatus, BuildTimeline, DefinitionRef, DeployedBuild,
    DeploymentEnvironment, Pipeline, Project, ProjectRef, TimelineRecord, TimelineResult,
    TimelineState,
};

/// Fixed stage sequence every generated timeline follows.
pub const TIMELINE_STAGES: [&str; 5] = [
    "Build",
    "Deploy to Dev",
    "Deploy to SIT",
    "Deploy to UAT",
    "Deploy to Prod",
];

const MOCK_PROJECTS: [&str; 3] = ["Phoenix", "Atlas", "Orion"];

const MOCK_PIPELINES: [&str; 6] = [
    "api-gateway",
    "identity-service",
    "billing-service",
    "web-frontend",
    "reporting-jobs",
    "notification-hub",
];

const FEATURE_NAMES: [&str; 5] = ["login", "checkout", "search", "billing", "onboarding"];

/// In-memory generator of plausible builds, deployments and timelines.
///
/// Pure generation over a seeded RNG; never fails.
pub struct MockGenerator {
    rng: StdRng,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible generator for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates `count` builds for one pipeline, newest first.
    ///
    /// Build-number suffixes strictly decrease with index and every timestamp
    /// is monotonically older for higher indices. When `count <= 5` (the
    /// Release view requests one build per pipeline), index 0 is guaranteed to
    /// be a main-branch `individualCI` build so "latest release candidate"
    /// always resolves against generated data.
    pub fn generate_builds(
        &mut self,
        pipeline_id: i64,
        count: usize,
        project_name: &str,
    ) -> Vec<Build> {
        let now = Utc::now();
        let date_tag = now.format("%Y%m%d");

        let mut builds = Vec::with_capacity(count);
        let mut suffix = count as i64 * 3 + self.rng.gen_range(5..25);
        let mut age = Duration::minutes(self.rng.gen_range(35..=75));

        for index in 0..count {
            if index > 0 {
                suffix -= self.rng.gen_range(1..=3);
                age = age + Duration::minutes(self.rng.gen_range(90..=360));
            }

            let (source_branch, reason) = if index == 0 && count <= 5 {
                ("refs/heads/main".to_string(), BuildReason::IndividualCi)
            } else {
                self.pick_branch_and_reason()
            };

            let in_progress = index < 2 && self.rng.gen_bool(0.35);

            let queue_time = now - age;
            let start_time = queue_time + Duration::minutes(self.rng.gen_range(5..=25));
            let (status, result, finish_time) = if in_progress {
                (BuildStatus::InProgress, None, None)
            } else {
                let finish = start_time + Duration::minutes(self.rng.gen_range(3..=28));
                (
                    BuildStatus::Completed,
                    Some(self.pick_result(&source_branch)),
                    Some(finish),
                )
            };

            builds.push(Build {
                id: pipeline_id * 100_000 + suffix,
                build_number: format!("{date_tag}.{suffix}"),
                status,
                result,
                queue_time: Some(queue_time),
                start_time: Some(start_time),
                finish_time,
                source_branch,
                reason,
                tags: self.pick_tags(),
                definition: DefinitionRef {
                    id: pipeline_id,
                    name: pipeline_name(pipeline_id),
                },
                project: ProjectRef {
                    id: format!("mock-{}", project_name.to_lowercase()),
                    name: project_name.to_string(),
                },
            });
        }

        builds
    }

    /// Generates the build deployed to one environment, or `None` when that
    /// environment has no deployment (probability falls along the promotion
    /// funnel, see [`deployment_chance`]).
    pub fn generate_deployed_build(
        &mut self,
        pipeline_id: i64,
        environment: DeploymentEnvironment,
    ) -> Option<DeployedBuild> {
        if !self.rng.gen_bool(deployment_chance(pipeline_id, environment)) {
            return None;
        }

        let build = self
            .generate_builds(pipeline_id, 1, "Sandbox")
            .into_iter()
            .next()?;

        Some(DeployedBuild { environment, build })
    }

    /// Generates a timeline with the fixed stage sequence and sequential,
    /// non-overlapping time windows. Most stages succeed; a small fraction is
    /// failed or skipped (skipped stages carry no times).
    pub fn generate_timeline(&mut self, build_id: i64) -> BuildTimeline {
        let now = Utc::now();
        let mut cursor = now - Duration::minutes(60 + self.rng.gen_range(0..60));

        let records = TIMELINE_STAGES
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let roll: f64 = self.rng.gen();
                let result = if roll < 0.85 {
                    TimelineResult::Succeeded
                } else if roll < 0.93 {
                    TimelineResult::Skipped
                } else {
                    TimelineResult::Failed
                };

                let (start_time, finish_time) = if result == TimelineResult::Skipped {
                    (None, None)
                } else {
                    let start = cursor + Duration::minutes(self.rng.gen_range(0..=2));
                    let finish = start + Duration::minutes(self.rng.gen_range(2..=9));
                    cursor = finish;
                    (Some(start), Some(finish))
                };

                TimelineRecord {
                    id: format!("{build_id}-stage-{index}"),
                    parent_id: None,
                    name: (*name).to_string(),
                    record_type: "Stage".to_string(),
                    state: TimelineState::Completed,
                    result: Some(result),
                    start_time,
                    finish_time,
                }
            })
            .collect();

        BuildTimeline { records }
    }

    /// Fallback project list.
    pub fn generate_projects(&mut self) -> Vec<Project> {
        MOCK_PROJECTS
            .iter()
            .enumerate()
            .map(|(index, name)| Project {
                id: format!("mock-project-{}", index + 1),
                name: (*name).to_string(),
                url: None,
                state: Some("wellFormed".to_string()),
                visibility: Some("private".to_string()),
            })
            .collect()
    }

    /// Fallback pipeline list for a project.
    pub fn generate_pipelines(&mut self, _project_name: &str) -> Vec<Pipeline> {
        MOCK_PIPELINES
            .iter()
            .enumerate()
            .map(|(index, name)| Pipeline {
                id: index as i64 + 1,
                name: (*name).to_string(),
                folder: Some("\\services".to_string()),
                revision: Some(self.rng.gen_range(1..=40)),
            })
            .collect()
    }

    fn pick_branch_and_reason(&mut self) -> (String, BuildReason) {
        let roll: f64 = self.rng.gen();
        if roll < 0.50 {
            ("refs/heads/main".to_string(), BuildReason::IndividualCi)
        } else if roll < 0.65 {
            ("refs/heads/develop".to_string(), BuildReason::BatchedCi)
        } else if roll < 0.85 {
            let feature = FEATURE_NAMES[self.rng.gen_range(0..FEATURE_NAMES.len())];
            (
                format!("refs/heads/feature/{feature}"),
                BuildReason::PullRequest,
            )
        } else if roll < 0.93 {
            ("refs/heads/release/1.x".to_string(), BuildReason::Manual)
        } else {
            ("refs/heads/main".to_string(), BuildReason::Scheduled)
        }
    }

    /// Outcome distribution skews towards success; main and release branches
    /// get a higher success weight.
    fn pick_result(&mut self, branch: &str) -> BuildResult {
        let short = branch.strip_prefix("refs/heads/").unwrap_or(branch);
        let critical = short == "main" || short.starts_with("release/");

        let roll: f64 = self.rng.gen();
        if critical {
            if roll < 0.90 {
                BuildResult::Succeeded
            } else if roll < 0.94 {
                BuildResult::PartiallySucceeded
            } else {
                BuildResult::Failed
            }
        } else if roll < 0.75 {
            BuildResult::Succeeded
        } else if roll < 0.82 {
            BuildResult::PartiallySucceeded
        } else if roll < 0.97 {
            BuildResult::Failed
        } else {
            BuildResult::Canceled
        }
    }

    fn pick_tags(&mut self) -> Vec<String> {
        let mut tags = Vec::new();
        if self.rng.gen_bool(0.4) {
            tags.push(format!("Xen{}", self.rng.gen_range(100..1000)));
        }
        if self.rng.gen_bool(0.15) {
            tags.push("hotfix".to_string());
        }
        tags
    }
}

/// Probability that a pipeline has a deployment in an environment.
///
/// Monotonically non-increasing along Dev >= SIT >= UAT >= PPD (the promotion
/// funnel); Prod varies by pipeline-id range to diversify demo data.
pub fn deployment_chance(pipeline_id: i64, environment: DeploymentEnvironment) -> f64 {
    match environment {
        DeploymentEnvironment::Dev => 0.95,
        DeploymentEnvironment::Sit => 0.85,
        DeploymentEnvironment::Uat => 0.70,
        DeploymentEnvironment::Ppd => 0.55,
        DeploymentEnvironment::Prod => {
            if pipeline_id % 3 == 0 {
                0.50
            } else {
                0.25
            }
        }
    }
}

fn pipeline_name(pipeline_id: i64) -> String {
    let index = (pipeline_id - 1).rem_euclid(MOCK_PIPELINES.len() as i64) as usize;
    MOCK_PIPELINES[index].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sort::compare_build_numbers;
    use chrono::DateTime;
    use std::cmp::Ordering;

    #[test]
    fn test_single_build_is_always_a_release_candidate() {
        for seed in 0..50 {
            let mut generator = MockGenerator::seeded(seed);
            let builds = generator.generate_builds(1, 1, "P");

            assert_eq!(builds.len(), 1);
            assert_eq!(builds[0].source_branch, "refs/heads/main", "seed {seed}");
            assert_eq!(builds[0].reason, BuildReason::IndividualCi, "seed {seed}");
        }
    }

    #[test]
    fn test_small_requests_guarantee_release_candidate_at_index_zero() {
        for seed in 0..20 {
            let mut generator = MockGenerator::seeded(seed);
            let builds = generator.generate_builds(3, 5, "P");

            assert_eq!(builds[0].source_branch, "refs/heads/main", "seed {seed}");
            assert_eq!(builds[0].reason, BuildReason::IndividualCi, "seed {seed}");
        }
    }

    #[test]
    fn test_build_numbers_strictly_decrease_with_index() {
        let mut generator = MockGenerator::seeded(11);
        let builds = generator.generate_builds(2, 25, "P");

        for pair in builds.windows(2) {
            assert_eq!(
                compare_build_numbers(&pair[0].build_number, &pair[1].build_number),
                Ordering::Greater,
                "{} should sort after {}",
                pair[0].build_number,
                pair[1].build_number
            );
        }
    }

    #[test]
    fn test_timestamps_grow_older_with_index() {
        let mut generator = MockGenerator::seeded(5);
        let builds = generator.generate_builds(1, 15, "P");

        for pair in builds.windows(2) {
            assert!(pair[0].queue_time.unwrap() > pair[1].queue_time.unwrap());
            assert!(pair[0].start_time.unwrap() > pair[1].start_time.unwrap());
        }
    }

    #[test]
    fn test_queue_start_finish_windows_are_bounded() {
        let mut generator = MockGenerator::seeded(9);
        let builds = generator.generate_builds(1, 20, "P");

        for build in &builds {
            let queue = build.queue_time.unwrap();
            let start = build.start_time.unwrap();
            let gap = start - queue;
            assert!(gap >= Duration::minutes(5) && gap <= Duration::minutes(25));

            if let Some(finish) = build.finish_time {
                let duration = finish - start;
                assert!(duration >= Duration::minutes(3) && duration <= Duration::minutes(28));
            }
        }
    }

    #[test]
    fn test_only_newest_builds_may_be_in_progress() {
        for seed in 0..20 {
            let mut generator = MockGenerator::seeded(seed);
            let builds = generator.generate_builds(1, 30, "P");

            for (index, build) in builds.iter().enumerate() {
                if index >= 2 {
                    assert_ne!(build.status, BuildStatus::InProgress, "seed {seed}");
                }
                // Result present exactly when the build completed
                match build.status {
                    BuildStatus::InProgress => {
                        assert!(build.result.is_none());
                        assert!(build.finish_time.is_none());
                    }
                    BuildStatus::Completed => {
                        assert!(build.result.is_some());
                        assert!(build.finish_time.is_some());
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_same_seed_generates_same_builds() {
        let builds_a = MockGenerator::seeded(42).generate_builds(4, 10, "P");
        let builds_b = MockGenerator::seeded(42).generate_builds(4, 10, "P");

        // Timestamps are relative to "now", so compare the seed-stable fields
        let stable = |builds: &[Build]| -> Vec<(i64, String, String, String, Vec<String>)> {
            builds
                .iter()
                .map(|b| {
                    (
                        b.id,
                        b.build_number.clone(),
                        b.source_branch.clone(),
                        b.reason.as_str().to_string(),
                        b.tags.clone(),
                    )
                })
                .collect()
        };
        assert_eq!(stable(&builds_a), stable(&builds_b));
    }

    #[test]
    fn test_deployment_chance_follows_promotion_funnel() {
        for pipeline_id in 1..=9 {
            let dev = deployment_chance(pipeline_id, DeploymentEnvironment::Dev);
            let sit = deployment_chance(pipeline_id, DeploymentEnvironment::Sit);
            let uat = deployment_chance(pipeline_id, DeploymentEnvironment::Uat);
            let ppd = deployment_chance(pipeline_id, DeploymentEnvironment::Ppd);

            assert!(dev >= sit && sit >= uat && uat >= ppd, "pipeline {pipeline_id}");
        }
    }

    #[test]
    fn test_deployed_build_is_scoped_to_requested_environment() {
        let mut generator = MockGenerator::seeded(3);
        // Dev chance is 0.95, so a handful of attempts must produce one
        let deployed = (0..20)
            .find_map(|_| generator.generate_deployed_build(1, DeploymentEnvironment::Dev))
            .expect("dev deployment within 20 attempts");

        assert_eq!(deployed.environment, DeploymentEnvironment::Dev);
        assert_eq!(deployed.build.definition.id, 1);
    }

    #[test]
    fn test_timeline_has_fixed_stage_sequence() {
        for seed in 0..10 {
            let mut generator = MockGenerator::seeded(seed);
            let timeline = generator.generate_timeline(1234);

            let names: Vec<&str> = timeline
                .records
                .iter()
                .map(|record| record.name.as_str())
                .collect();
            assert_eq!(names, TIMELINE_STAGES.to_vec(), "seed {seed}");
            assert!(timeline
                .records
                .iter()
                .all(|record| record.record_type == "Stage"));
        }
    }

    #[test]
    fn test_timeline_windows_are_sequential_and_non_overlapping() {
        let mut generator = MockGenerator::seeded(21);
        let timeline = generator.generate_timeline(99);

        let mut previous_finish: Option<DateTime<Utc>> = None;
        for record in &timeline.records {
            let (Some(start), Some(finish)) = (record.start_time, record.finish_time) else {
                // Skipped stages carry no times
                assert_eq!(record.result, Some(TimelineResult::Skipped));
                continue;
            };

            assert!(start <= finish);
            if let Some(previous) = previous_finish {
                assert!(start >= previous);
            }
            previous_finish = Some(finish);
        }
    }

    #[test]
    fn test_fallback_projects_and_pipelines_are_nonempty() {
        let mut generator = MockGenerator::seeded(0);
        assert!(!generator.generate_projects().is_empty());
        assert!(!generator.generate_pipelines("Phoenix").is_empty());
    }
}
