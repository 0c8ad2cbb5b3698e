pub mod azure;
pub mod jira;
