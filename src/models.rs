use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single execution of a pipeline.
///
/// Field names follow the Azure DevOps REST wire format (camelCase), so these
/// structs deserialize API responses directly and serialize back out for JSON
/// exports without a separate wire layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    /// Numeric build id, unique within an organization
    pub id: i64,
    /// Display number (e.g. "20240128.10"); numeric-aware sortable
    pub build_number: String,
    /// Current lifecycle status
    pub status: BuildStatus,
    /// Outcome, present only once the build reached a terminal status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BuildResult>,
    pub queue_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    /// Absent while the build is still running
    pub finish_time: Option<DateTime<Utc>>,
    /// Ref-qualified branch (e.g. "refs/heads/main")
    pub source_branch: String,
    /// What triggered the build
    pub reason: BuildReason,
    /// Free-form tags, order preserved for display
    #[serde(default)]
    pub tags: Vec<String>,
    /// Owning pipeline definition
    pub definition: DefinitionRef,
    /// Owning team project
    pub project: ProjectRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildStatus {
    None,
    InProgress,
    Completed,
    Cancelling,
    Postponed,
    NotStarted,
}

impl BuildStatus {
    /// Wire-format name, used for exact-match filtering.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
            Self::Cancelling => "cancelling",
            Self::Postponed => "postponed",
            Self::NotStarted => "notStarted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildResult {
    None,
    Succeeded,
    PartiallySucceeded,
    Failed,
    Canceled,
}

impl BuildResult {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Succeeded => "succeeded",
            Self::PartiallySucceeded => "partiallySucceeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildReason {
    #[serde(rename = "manual")]
    Manual,
    #[serde(rename = "individualCI")]
    IndividualCi,
    #[serde(rename = "scheduled")]
    Scheduled,
    #[serde(rename = "pullRequest")]
    PullRequest,
    #[serde(rename = "batchedCI")]
    BatchedCi,
    /// Catch-all for trigger reasons this tool does not model
    #[serde(other, rename = "other")]
    Other,
}

impl BuildReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::IndividualCi => "individualCI",
            Self::Scheduled => "scheduled",
            Self::PullRequest => "pullRequest",
            Self::BatchedCi => "batchedCI",
            Self::Other => "other",
        }
    }
}

/// Reference to the pipeline definition a build belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionRef {
    pub id: i64,
    pub name: String,
}

/// Reference to the team project a build belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

/// One record in a build's execution timeline.
///
/// Timelines mix record types (Stage, Phase, Job, Task); only `Stage` records
/// matter for display, narrowed via [`BuildTimeline::stage_records`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRecord {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub state: TimelineState,
    /// Meaningful only when `state` is `Completed`
    pub result: Option<TimelineResult>,
    pub start_time: Option<DateTime<Utc>>,
    pub finish_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimelineState {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimelineResult {
    Succeeded,
    Failed,
    PartiallySucceeded,
    Skipped,
    Canceled,
}

/// The ordered set of timeline records for one build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTimeline {
    #[serde(default)]
    pub records: Vec<TimelineRecord>,
}

impl BuildTimeline {
    /// Narrows the timeline to its `Stage` records, preserving order.
    pub fn stage_records(&self) -> Vec<&TimelineRecord> {
        self.records
            .iter()
            .filter(|record| record.record_type == "Stage")
            .collect()
    }
}

/// A named, repeatable CI/CD definition that produces builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub revision: Option<i64>,
}

/// Team project metadata; treated as an opaque pass-through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
}

/// Deployment environments, ordered along the promotion funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentEnvironment {
    Dev,
    Sit,
    Uat,
    Ppd,
    Prod,
}

impl DeploymentEnvironment {
    pub const ALL: [Self; 5] = [Self::Dev, Self::Sit, Self::Uat, Self::Ppd, Self::Prod];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "Dev",
            Self::Sit => "SIT",
            Self::Uat => "UAT",
            Self::Ppd => "PPD",
            Self::Prod => "Prod",
        }
    }
}

impl std::fmt::Display for DeploymentEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The build currently associated with a deployment to one environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedBuild {
    pub environment: DeploymentEnvironment,
    pub build: Build,
}

/// A Jira issue, reduced to the fields the dashboard consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
    pub key: String,
    pub status: JiraStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraStatus {
    pub name: String,
}

impl JiraIssue {
    /// Whether the issue's workflow status represents completion.
    pub fn is_done(&self) -> bool {
        crate::core::jira::is_done(&self.status.name)
    }
}
