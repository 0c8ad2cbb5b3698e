pub mod builds;
pub mod dashboard;
pub mod release;

use std::collections::HashMap;

use log::warn;
use serde::Serialize;

use crate::core::stage::StageDisplay;
use crate::loader::BoundedFetcher;
use crate::models::{JiraIssue, Pipeline};
use crate::providers::azure::provider::DataProvider;
use crate::providers::jira::JiraClient;

/// How many timeline/issue requests may be in flight at once.
const FETCH_CONCURRENCY: usize = 4;

/// Everything a view run needs, assembled by the CLI layer.
///
/// Each run owns its own de-duplication gates (created inside `collect`), so
/// switching projects simply means a new run with fresh state -- results of
/// any still-outstanding fetch from a previous run are dropped with it.
pub struct ViewContext<'a> {
    pub provider: &'a DataProvider,
    pub jira: Option<&'a JiraClient>,
    pub project: String,
    /// Pipeline ids to show for this project; `None` = show all
    pub visible_pipelines: Option<Vec<i64>>,
}

/// The stage a build is currently at, reduced for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub name: String,
    pub display: StageDisplay,
}

/// Ticket reference extracted from a build's tags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub key: String,
    /// `None` when the ticket was not found or its status is unknown
    pub done: Option<bool>,
}

/// Restricts a pipeline list to the configured visible set.
pub(crate) fn apply_visibility(
    pipelines: Vec<Pipeline>,
    visible: &Option<Vec<i64>>,
) -> Vec<Pipeline> {
    match visible {
        Some(ids) => pipelines
            .into_iter()
            .filter(|pipeline| ids.contains(&pipeline.id))
            .collect(),
        None => pipelines,
    }
}

/// Resolves issue statuses for a set of already de-duplicated keys.
///
/// Lookup failures degrade to "status unknown" per key; a missing ticket is
/// a normal `None` from the client and renders the same way.
pub(crate) async fn resolve_issues(
    jira: Option<&JiraClient>,
    keys: Vec<String>,
    fetcher: &BoundedFetcher,
) -> HashMap<String, Option<JiraIssue>> {
    let Some(client) = jira else {
        return HashMap::new();
    };

    let tasks: Vec<_> = keys
        .into_iter()
        .map(|key| {
            move || async move {
                match client.issue(&key).await {
                    Ok(found) => (key, found),
                    Err(err) => {
                        warn!("Issue lookup failed for {key}: {err}");
                        (key, None)
                    }
                }
            }
        })
        .collect();

    fetcher.run_all(tasks).await.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline(id: i64, name: &str) -> Pipeline {
        Pipeline {
            id,
            name: name.to_string(),
            folder: None,
            revision: None,
        }
    }

    #[test]
    fn test_visibility_filter_keeps_configured_ids() {
        let pipelines = vec![pipeline(1, "a"), pipeline(2, "b"), pipeline(3, "c")];

        let visible = apply_visibility(pipelines, &Some(vec![3, 1]));
        let ids: Vec<i64> = visible.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_absent_visibility_config_shows_all() {
        let pipelines = vec![pipeline(1, "a"), pipeline(2, "b")];
        assert_eq!(apply_visibility(pipelines, &None).len(), 2);
    }

    #[test]
    fn test_issue_resolution_without_client_is_empty() {
        let fetcher = BoundedFetcher::new(2);
        let resolved = tokio_test::block_on(resolve_issues(
            None,
            vec!["Xen42".to_string()],
            &fetcher,
        ));
        assert!(resolved.is_empty());
    }
}
