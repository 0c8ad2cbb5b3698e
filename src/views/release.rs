use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::filter::{filter_builds, BuildFilterCriteria};
use crate::core::jira::extract_issue_key;
use crate::core::sort::sort_refs_by_build_number_desc;
use crate::loader::{BoundedFetcher, KeyedGate};
use crate::models::Build;
use crate::providers::azure::client::BuildQuery;

use super::builds::{build_row, BuildRow};
use super::{apply_visibility, resolve_issues, ViewContext, FETCH_CONCURRENCY};

/// How many builds to inspect per pipeline when hunting the release
/// candidate. Small by design: the newest main-branch CI build is what ships.
const CANDIDATE_FETCH_COUNT: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRow {
    pub pipeline_id: i64,
    pub pipeline: String,
    /// Latest main-branch CI build, when one exists
    pub candidate: Option<BuildRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseReport {
    pub project: String,
    pub collected_at: DateTime<Utc>,
    pub rows: Vec<ReleaseRow>,
}

/// Collects the release candidate (latest main-branch `individualCI` build)
/// for every visible pipeline, annotated like the Builds view.
pub async fn collect(ctx: &ViewContext<'_>) -> ReleaseReport {
    let pipelines = ctx.provider.pipelines(&ctx.project).await;
    let visible = apply_visibility(pipelines, &ctx.visible_pipelines);

    let fetcher = BoundedFetcher::new(FETCH_CONCURRENCY);
    let provider = ctx.provider;
    let project = ctx.project.as_str();

    let tasks: Vec<_> = visible
        .into_iter()
        .map(|pipeline| {
            move || async move {
                let query = BuildQuery {
                    pipeline_id: Some(pipeline.id),
                    branch: Some("refs/heads/main".to_string()),
                    reason: Some("individualCI".to_string()),
                    top: CANDIDATE_FETCH_COUNT,
                    ..Default::default()
                };
                let fetched = provider.builds(project, &query).await;
                let candidate = pick_candidate(&fetched).cloned();
                (pipeline, candidate)
            }
        })
        .collect();
    let candidates = fetcher.run_all(tasks).await;

    // Stage and ticket annotations for the candidates that exist
    let with_candidates: Vec<&Build> = candidates
        .iter()
        .filter_map(|(_, candidate)| candidate.as_ref())
        .collect();

    let timeline_gate: KeyedGate<i64> = KeyedGate::new();
    let timeline_tasks: Vec<_> = with_candidates
        .iter()
        .map(|build| build.id)
        .filter(|id| timeline_gate.begin(*id))
        .map(|id| move || async move { (id, provider.timeline(project, id).await) })
        .collect();
    let timelines = fetcher
        .run_all(timeline_tasks)
        .await
        .into_iter()
        .collect::<HashMap<_, _>>();

    let issue_gate: KeyedGate<String> = KeyedGate::new();
    let keys: Vec<String> = with_candidates
        .iter()
        .filter_map(|build| extract_issue_key(&build.tags))
        .map(str::to_string)
        .filter(|key| issue_gate.begin(key.clone()))
        .collect();
    let issues = resolve_issues(ctx.jira, keys, &fetcher).await;

    let rows = candidates
        .into_iter()
        .map(|(pipeline, candidate)| ReleaseRow {
            pipeline_id: pipeline.id,
            pipeline: pipeline.name,
            candidate: candidate
                .as_ref()
                .map(|build| build_row(build, &timelines, &issues)),
        })
        .collect();

    ReleaseReport {
        project: ctx.project.clone(),
        collected_at: Utc::now(),
        rows,
    }
}

/// Newest build that is a release candidate: main branch, CI-triggered.
fn pick_candidate(builds: &[Build]) -> Option<&Build> {
    let criteria = BuildFilterCriteria {
        branch: Some("main".to_string()),
        reason: Some("individualCI".to_string()),
        ..Default::default()
    };

    let mut matching = filter_builds(builds, &criteria);
    sort_refs_by_build_number_desc(&mut matching);
    matching.first().copied()
}
