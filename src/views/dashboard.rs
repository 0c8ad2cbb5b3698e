use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::loader::BoundedFetcher;
use crate::models::{BuildResult, DeploymentEnvironment};

use super::{apply_visibility, ViewContext, FETCH_CONCURRENCY};

/// What is deployed in one environment for one pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCell {
    pub build_number: String,
    pub result: Option<BuildResult>,
    pub finish_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRow {
    pub pipeline_id: i64,
    pub pipeline: String,
    /// One cell per environment, in promotion-funnel order; `None` = nothing
    /// deployed there
    pub cells: Vec<Option<DeploymentCell>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub project: String,
    pub collected_at: DateTime<Utc>,
    pub environments: Vec<String>,
    pub rows: Vec<DashboardRow>,
}

/// Builds the deployment grid: visible pipelines down, environments across.
pub async fn collect(ctx: &ViewContext<'_>) -> DashboardReport {
    let pipelines = ctx.provider.pipelines(&ctx.project).await;
    let visible = apply_visibility(pipelines, &ctx.visible_pipelines);

    let fetcher = BoundedFetcher::new(FETCH_CONCURRENCY);
    let provider = ctx.provider;
    let project = ctx.project.as_str();

    let tasks: Vec<_> = visible
        .into_iter()
        .map(|pipeline| {
            move || async move {
                let mut cells = Vec::with_capacity(DeploymentEnvironment::ALL.len());
                for environment in DeploymentEnvironment::ALL {
                    let deployed = provider
                        .deployed_build(project, pipeline.id, environment)
                        .await;
                    cells.push(deployed.map(|deployed| DeploymentCell {
                        build_number: deployed.build.build_number,
                        result: deployed.build.result,
                        finish_time: deployed.build.finish_time,
                    }));
                }

                DashboardRow {
                    pipeline_id: pipeline.id,
                    pipeline: pipeline.name,
                    cells,
                }
            }
        })
        .collect();

    let rows = fetcher.run_all(tasks).await;

    DashboardReport {
        project: ctx.project.clone(),
        collected_at: Utc::now(),
        environments: DeploymentEnvironment::ALL
            .iter()
            .map(|environment| environment.as_str().to_string())
            .collect(),
        rows,
    }
}
