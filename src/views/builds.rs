use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::filter::{filter_builds, BuildFilterCriteria};
use crate::core::jira::extract_issue_key;
use crate::core::sort::sort_by_build_number_desc;
use crate::core::stage::{classify, last_stage_of};
use crate::loader::{BoundedFetcher, KeyedGate};
use crate::models::{Build, BuildTimeline, JiraIssue};
use crate::providers::azure::client::BuildQuery;

use super::{resolve_issues, IssueSummary, StageSummary, ViewContext, FETCH_CONCURRENCY};

/// One rendered line of the Builds view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRow {
    #[serde(flatten)]
    pub build: Build,
    pub stage: Option<StageSummary>,
    pub issue: Option<IssueSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildsReport {
    pub project: String,
    pub collected_at: DateTime<Utc>,
    pub rows: Vec<BuildRow>,
}

/// Fetches builds matching `criteria`, newest first, each annotated with its
/// current pipeline stage and ticket status.
///
/// Branch/reason/status narrowing happens client-side so connected and
/// fallback data follow the same (documented) filter semantics.
pub async fn collect(
    ctx: &ViewContext<'_>,
    criteria: &BuildFilterCriteria,
    top: usize,
) -> BuildsReport {
    let query = BuildQuery {
        pipeline_id: criteria.pipeline_id,
        top,
        ..Default::default()
    };
    let mut fetched = ctx.provider.builds(&ctx.project, &query).await;

    // Filtering preserves order, so sorting first gives the same result
    sort_by_build_number_desc(&mut fetched);
    let ordered = filter_builds(&fetched, criteria);

    let fetcher = BoundedFetcher::new(FETCH_CONCURRENCY);
    let timelines = fetch_timelines(ctx, &ordered, &fetcher).await;

    let issue_gate: KeyedGate<String> = KeyedGate::new();
    let keys: Vec<String> = ordered
        .iter()
        .filter_map(|build| extract_issue_key(&build.tags))
        .map(str::to_string)
        .filter(|key| issue_gate.begin(key.clone()))
        .collect();
    let issues = resolve_issues(ctx.jira, keys, &fetcher).await;

    let rows = ordered
        .into_iter()
        .map(|build| build_row(build, &timelines, &issues))
        .collect();

    BuildsReport {
        project: ctx.project.clone(),
        collected_at: Utc::now(),
        rows,
    }
}

async fn fetch_timelines(
    ctx: &ViewContext<'_>,
    builds: &[&Build],
    fetcher: &BoundedFetcher,
) -> HashMap<i64, BuildTimeline> {
    let gate: KeyedGate<i64> = KeyedGate::new();
    let provider = ctx.provider;
    let project = ctx.project.as_str();

    let tasks: Vec<_> = builds
        .iter()
        .map(|build| build.id)
        .filter(|id| gate.begin(*id))
        .map(|id| move || async move { (id, provider.timeline(project, id).await) })
        .collect();

    fetcher.run_all(tasks).await.into_iter().collect()
}

pub(crate) fn build_row(
    build: &Build,
    timelines: &HashMap<i64, BuildTimeline>,
    issues: &HashMap<String, Option<JiraIssue>>,
) -> BuildRow {
    let stage = timelines
        .get(&build.id)
        .and_then(last_stage_of)
        .map(|record| StageSummary {
            name: record.name.clone(),
            display: classify(record),
        });

    let issue = extract_issue_key(&build.tags).map(|key| IssueSummary {
        key: key.to_string(),
        done: issues
            .get(key)
            .and_then(|found| found.as_ref().map(JiraIssue::is_done)),
    });

    BuildRow {
        build: build.clone(),
        stage,
        issue,
    }
}
