use serde::Deserialize;

/// Azure DevOps list envelope: collection endpoints wrap their results in
/// `{ "count": N, "value": [...] }`.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub count: usize,
    pub value: Vec<T>,
}

/// Minimal shape of the connection-data probe response; the body is only
/// checked for being parseable, success is what matters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    #[serde(default)]
    pub deployment_type: Option<String>,
}
