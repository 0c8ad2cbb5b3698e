use log::debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{AdoLensError, Result};
use crate::models::{Build, BuildTimeline, DeploymentEnvironment, Pipeline, Project};

use super::types::{ConnectionData, ListResponse};

const API_VERSION: &str = "7.1";

/// Server-side query filters for the builds endpoint.
///
/// Everything here maps straight onto the REST query string; client-side
/// filtering (`core::filter`) stays the source of truth for view semantics.
#[derive(Debug, Clone)]
pub struct BuildQuery {
    pub pipeline_id: Option<i64>,
    pub branch: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
    pub top: usize,
}

impl Default for BuildQuery {
    fn default() -> Self {
        Self {
            pipeline_id: None,
            branch: None,
            reason: None,
            status: None,
            top: 50,
        }
    }
}

/// Azure DevOps REST client for one organization.
pub struct AzureClient {
    client: reqwest::Client,
    /// Organization root, e.g. <https://dev.azure.com/fabrikam/>
    org_url: Url,
    token: Option<Token>,
}

impl AzureClient {
    /// Creates a client for `organization` on the given service base URL
    /// (normally <https://dev.azure.com>).
    ///
    /// # Errors
    ///
    /// Returns an error if the organization URL cannot be constructed.
    pub fn new(base_url: &str, organization: &str, token: Option<Token>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("adolens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdoLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let org_url = Url::parse(base_url)
            .map_err(|e| AdoLensError::Config(format!("Invalid base URL: {e}")))?
            .join(&format!("{organization}/"))
            .map_err(|e| AdoLensError::Config(format!("Invalid organization URL: {e}")))?;

        Ok(Self {
            client,
            org_url,
            token,
        })
    }

    /// Helper to build authenticated requests. Azure DevOps accepts a PAT as
    /// the password of a basic-auth pair with a blank user.
    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.basic_auth("", Some(token.as_str()))
        } else {
            request
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self
            .org_url
            .join(path)
            .map_err(|e| AdoLensError::Config(format!("Invalid endpoint URL: {e}")))?;
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {url}");

        let response = self
            .auth_request(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    AdoLensError::Offline(url.host_str().unwrap_or("api").to_string())
                } else {
                    AdoLensError::Network(e)
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AdoLensError::NotFound(url.path().to_string()));
        }
        if status.is_server_error() {
            return Err(AdoLensError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        if !status.is_success() {
            return Err(AdoLensError::Api(format!(
                "{} returned HTTP {status}",
                url.path()
            )));
        }

        response.json::<T>().await.map_err(AdoLensError::Network)
    }

    /// Connectivity probe; any parseable 2xx from the connection-data
    /// endpoint counts as reachable.
    pub async fn probe(&self) -> bool {
        let Ok(url) = self.endpoint("_apis/connectionData") else {
            return false;
        };

        match self.get_json::<ConnectionData>(url).await {
            Ok(data) => {
                debug!(
                    "Connected (deployment type: {})",
                    data.deployment_type.as_deref().unwrap_or("unknown")
                );
                true
            }
            Err(_) => false,
        }
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let url = self.endpoint("_apis/projects")?;
        let response: ListResponse<Project> = self.get_json(url).await?;
        Ok(response.value)
    }

    pub async fn list_pipelines(&self, project: &str) -> Result<Vec<Pipeline>> {
        let url = self.endpoint(&format!("{project}/_apis/pipelines"))?;
        let response: ListResponse<Pipeline> = self.get_json(url).await?;
        Ok(response.value)
    }

    /// Fetches builds for a project, newest-queued first.
    pub async fn list_builds(&self, project: &str, query: &BuildQuery) -> Result<Vec<Build>> {
        let mut url = self.endpoint(&format!("{project}/_apis/build/builds"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("$top", &query.top.to_string());
            pairs.append_pair("queryOrder", "queueTimeDescending");
            if let Some(pipeline_id) = query.pipeline_id {
                pairs.append_pair("definitions", &pipeline_id.to_string());
            }
            if let Some(branch) = query.branch.as_deref() {
                if !branch.is_empty() {
                    pairs.append_pair("branchName", &qualify_branch(branch));
                }
            }
            if let Some(reason) = query.reason.as_deref() {
                if !reason.is_empty() {
                    pairs.append_pair("reasonFilter", reason);
                }
            }
            if let Some(status) = query.status.as_deref() {
                if !status.is_empty() {
                    pairs.append_pair("statusFilter", status);
                }
            }
        }

        let response: ListResponse<Build> = self.get_json(url).await?;
        debug!(
            "Fetched {} builds (server count {})",
            response.value.len(),
            response.count
        );
        Ok(response.value)
    }

    pub async fn build_timeline(&self, project: &str, build_id: i64) -> Result<BuildTimeline> {
        let url = self.endpoint(&format!("{project}/_apis/build/builds/{build_id}/timeline"))?;
        self.get_json(url).await
    }

    /// The build currently deployed to one environment, identified by the
    /// `deployed-<env>` tag convention. `Ok(None)` means no deployment, which
    /// is a normal answer, not an error.
    pub async fn deployed_build(
        &self,
        project: &str,
        pipeline_id: i64,
        environment: DeploymentEnvironment,
    ) -> Result<Option<Build>> {
        let mut url = self.endpoint(&format!("{project}/_apis/build/builds"))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("definitions", &pipeline_id.to_string());
            query.append_pair(
                "tagFilters",
                &format!("deployed-{}", environment.as_str().to_lowercase()),
            );
            query.append_pair("$top", "1");
            query.append_pair("queryOrder", "queueTimeDescending");
        }

        let response: ListResponse<Build> = self.get_json(url).await?;
        Ok(response.value.into_iter().next())
    }
}

/// The builds endpoint wants fully qualified refs; accept short names too.
fn qualify_branch(branch: &str) -> String {
    if branch.starts_with("refs/") {
        branch.to_string()
    } else {
        format!("refs/heads/{branch}")
    }
}
