use std::sync::{Mutex, MutexGuard};

use log::{info, warn};

use crate::mock::MockGenerator;
use crate::models::{
    Build, BuildTimeline, DeployedBuild, DeploymentEnvironment, Pipeline, Project,
};

use super::client::{AzureClient, BuildQuery};

/// Data source for the views: the Azure DevOps API when reachable, generated
/// data otherwise.
///
/// Every fetch falls back to the [`MockGenerator`] on failure, so provider
/// methods are infallible -- the views always have something to render. The
/// generator itself never fails (pure in-memory generation).
pub struct DataProvider {
    client: Option<AzureClient>,
    mock: Mutex<MockGenerator>,
}

impl DataProvider {
    /// Provider backed by the API, with generated data as fallback.
    pub fn connected(client: AzureClient) -> Self {
        Self {
            client: Some(client),
            mock: Mutex::new(MockGenerator::new()),
        }
    }

    /// Provider that serves generated data only (`--mock`, or no
    /// organization configured).
    pub fn offline() -> Self {
        info!("Serving generated data (no API connection)");
        Self {
            client: None,
            mock: Mutex::new(MockGenerator::new()),
        }
    }

    /// Offline provider with a pinned seed, for reproducible demos and tests.
    pub fn offline_seeded(seed: u64) -> Self {
        Self {
            client: None,
            mock: Mutex::new(MockGenerator::seeded(seed)),
        }
    }

    /// Whether the API answers the connectivity probe. Always `false` for an
    /// offline provider.
    pub async fn reachable(&self) -> bool {
        match &self.client {
            Some(client) => client.probe().await,
            None => false,
        }
    }

    pub async fn projects(&self) -> Vec<Project> {
        if let Some(client) = &self.client {
            match client.list_projects().await {
                Ok(projects) => return projects,
                Err(err) => warn!("Project fetch failed, using generated data: {err}"),
            }
        }
        self.mock().generate_projects()
    }

    pub async fn pipelines(&self, project: &str) -> Vec<Pipeline> {
        if let Some(client) = &self.client {
            match client.list_pipelines(project).await {
                Ok(pipelines) => return pipelines,
                Err(err) => warn!("Pipeline fetch failed, using generated data: {err}"),
            }
        }
        self.mock().generate_pipelines(project)
    }

    pub async fn builds(&self, project: &str, query: &BuildQuery) -> Vec<Build> {
        if let Some(client) = &self.client {
            match client.list_builds(project, query).await {
                Ok(builds) => return builds,
                Err(err) => warn!("Build fetch failed, using generated data: {err}"),
            }
        }
        self.mock()
            .generate_builds(query.pipeline_id.unwrap_or(1), query.top, project)
    }

    pub async fn timeline(&self, project: &str, build_id: i64) -> BuildTimeline {
        if let Some(client) = &self.client {
            match client.build_timeline(project, build_id).await {
                Ok(timeline) => return timeline,
                Err(err) => warn!("Timeline fetch failed for build {build_id}, using generated data: {err}"),
            }
        }
        self.mock().generate_timeline(build_id)
    }

    pub async fn deployed_build(
        &self,
        project: &str,
        pipeline_id: i64,
        environment: DeploymentEnvironment,
    ) -> Option<DeployedBuild> {
        if let Some(client) = &self.client {
            match client.deployed_build(project, pipeline_id, environment).await {
                // "Nothing deployed here" is a real answer, not a failure
                Ok(found) => {
                    return found.map(|build| DeployedBuild { environment, build });
                }
                Err(err) => warn!(
                    "Deployed-build fetch failed for pipeline {pipeline_id} in {environment}, using generated data: {err}"
                ),
            }
        }

        let mut deployed = self.mock().generate_deployed_build(pipeline_id, environment);
        if let Some(deployed) = &mut deployed {
            deployed.build.project.name = project.to_string();
        }
        deployed
    }

    fn mock(&self) -> MutexGuard<'_, MockGenerator> {
        self.mock.lock().expect("mock generator lock poisoned")
    }
}
