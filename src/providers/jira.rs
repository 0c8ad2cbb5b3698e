use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::auth::Token;
use crate::error::{AdoLensError, Result};
use crate::models::{JiraIssue, JiraStatus};

/// Jira REST client, reduced to the single issue lookup the dashboard needs.
pub struct JiraClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<Token>,
}

/// Issue payload as Jira returns it; flattened into [`JiraIssue`].
#[derive(Deserialize)]
struct IssueResponse {
    key: String,
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    status: JiraStatus,
}

impl JiraClient {
    pub fn new(base_url: &str, token: Option<Token>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("adolens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdoLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(base_url)
            .map_err(|e| AdoLensError::Config(format!("Invalid Jira base URL: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Looks up one issue by key.
    ///
    /// `Ok(None)` means the ticket does not exist -- a normal outcome for
    /// free-form build tags, distinct from a transport failure (`Err`).
    pub async fn issue(&self, key: &str) -> Result<Option<JiraIssue>> {
        let mut url = self
            .base_url
            .join(&format!("rest/api/2/issue/{key}"))
            .map_err(|e| AdoLensError::Config(format!("Invalid issue URL: {e}")))?;
        url.query_pairs_mut().append_pair("fields", "status");

        debug!("GET {url}");

        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                AdoLensError::Offline(url.host_str().unwrap_or("jira").to_string())
            } else {
                AdoLensError::Network(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_server_error() {
            return Err(AdoLensError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        if !status.is_success() {
            return Err(AdoLensError::Api(format!(
                "Issue lookup for {key} returned HTTP {status}"
            )));
        }

        let issue: IssueResponse = response.json().await.map_err(AdoLensError::Network)?;
        Ok(Some(JiraIssue {
            key: issue.key,
            status: issue.fields.status,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_lookup_parses_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/issue/Xen42")
            .match_query(mockito::Matcher::UrlEncoded(
                "fields".into(),
                "status".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{\"key\":\"Xen42\",\"fields\":{\"status\":{\"name\":\"Done\"}}}")
            .create_async()
            .await;

        let client = JiraClient::new(&server.url(), None).unwrap();
        let issue = client.issue("Xen42").await.unwrap().unwrap();

        assert_eq!(issue.key, "Xen42");
        assert!(issue.is_done());
    }

    #[tokio::test]
    async fn test_missing_issue_is_a_normal_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/issue/Xen999")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = JiraClient::new(&server.url(), None).unwrap();
        let issue = client.issue("Xen999").await.unwrap();

        assert!(issue.is_none());
    }

    #[tokio::test]
    async fn test_server_failure_is_an_error_not_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/issue/Xen42")
            .match_query(mockito::Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let client = JiraClient::new(&server.url(), None).unwrap();
        let err = client.issue("Xen42").await.unwrap_err();

        assert!(matches!(err, AdoLensError::Server { status: 502, .. }));
    }
}
