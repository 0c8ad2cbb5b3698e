use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::auth::Token;
use crate::core::filter::BuildFilterCriteria;
use crate::output::{self, Spinner};
use crate::providers::azure::client::AzureClient;
use crate::providers::azure::provider::DataProvider;
use crate::providers::jira::JiraClient;
use crate::settings::SettingsStore;
use crate::views::{self, ViewContext};

#[derive(Parser)]
#[command(name = "adolens")]
#[command(author, version, about = "Azure DevOps build & release dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write the view's data as JSON to this path instead of rendering tables
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Azure DevOps organization name
    #[arg(short = 'O', long, global = true, env = "ADO_ORGANIZATION")]
    organization: Option<String>,

    /// Personal access token for Azure DevOps
    #[arg(
        short,
        long,
        global = true,
        env = "AZURE_DEVOPS_PAT",
        hide_env_values = true
    )]
    token: Option<String>,

    /// Azure DevOps service base URL
    #[arg(short, long, global = true, default_value = "https://dev.azure.com")]
    url: String,

    /// Team project; falls back to the configured default
    #[arg(short = 'P', long, global = true)]
    project: Option<String>,

    /// Jira base URL for ticket status lookups
    #[arg(long, global = true, env = "JIRA_URL")]
    jira_url: Option<String>,

    /// Jira access token
    #[arg(long, global = true, env = "JIRA_TOKEN", hide_env_values = true)]
    jira_token: Option<String>,

    /// Serve generated demo data without contacting any API
    #[arg(long, global = true, default_value_t = false)]
    mock: bool,

    /// Pin the demo-data random seed for reproducible output
    #[arg(long, global = true, requires = "mock")]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recent builds with per-build stage and ticket status
    Builds {
        /// Restrict to one pipeline definition id
        #[arg(long)]
        pipeline: Option<i64>,

        /// Branch filter (substring, `refs/heads/` optional)
        #[arg(short, long)]
        branch: Option<String>,

        /// Trigger reason filter (e.g. individualCI, manual, pullRequest)
        #[arg(long)]
        reason: Option<String>,

        /// Status filter (e.g. completed, inProgress)
        #[arg(long)]
        status: Option<String>,

        /// Maximum number of builds to fetch
        #[arg(short = 'n', long, default_value_t = 50)]
        top: usize,
    },

    /// Latest main-branch CI build per pipeline
    Release,

    /// Deployment grid: pipelines down, environments across
    Dashboard,

    /// List the organization's team projects
    Projects,

    /// Manage persisted preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the stored preferences
    Show,

    /// Set the default project
    SetProject { name: String },

    /// Clear the default project
    ClearProject,

    /// Restrict which pipelines are shown for a project
    SetPipelines {
        /// Project the list applies to; defaults to the default project
        #[arg(long)]
        project: Option<String>,

        /// Pipeline ids to show
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Show all pipelines for a project again
    ClearPipelines {
        #[arg(long)]
        project: Option<String>,
    },

    /// Delete the settings file
    Clear,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let store = SettingsStore::open()?;

        if let Commands::Config { action } = &self.command {
            return self.execute_config(&store, action);
        }

        let provider = self.build_provider().await?;

        if let Commands::Projects = &self.command {
            return self.execute_projects(&provider, &store).await;
        }

        let project = match self.project.clone() {
            Some(project) => project,
            None => match store.default_project()? {
                Some(project) => project,
                None => bail!(
                    "No project selected; pass --project or run `adolens config set-project <name>`"
                ),
            },
        };

        let visible_pipelines = store.visible_pipelines(&project)?;

        let jira = match &self.jira_url {
            Some(url) => Some(JiraClient::new(
                url,
                self.jira_token.as_deref().map(Token::from),
            )?),
            None => None,
        };

        let ctx = ViewContext {
            provider: &provider,
            jira: jira.as_ref(),
            project,
            visible_pipelines,
        };

        match &self.command {
            Commands::Builds {
                pipeline,
                branch,
                reason,
                status,
                top,
            } => {
                let criteria = BuildFilterCriteria {
                    branch: branch.clone(),
                    reason: reason.clone(),
                    status: status.clone(),
                    pipeline_id: *pipeline,
                };

                let spinner = Spinner::start(format!("Fetching builds for {}", ctx.project));
                let report = views::builds::collect(&ctx, &criteria, *top).await;
                spinner.succeed(format!("Fetched {} builds", report.rows.len()));

                self.emit(&report, output::print_builds)
            }
            Commands::Release => {
                let spinner =
                    Spinner::start(format!("Fetching release candidates for {}", ctx.project));
                let report = views::release::collect(&ctx).await;
                spinner.succeed(format!("Checked {} pipelines", report.rows.len()));

                self.emit(&report, output::print_release)
            }
            Commands::Dashboard => {
                let spinner =
                    Spinner::start(format!("Fetching deployments for {}", ctx.project));
                let report = views::dashboard::collect(&ctx).await;
                spinner.succeed(format!("Checked {} pipelines", report.rows.len()));

                self.emit(&report, output::print_dashboard)
            }
            Commands::Projects | Commands::Config { .. } => unreachable!("handled above"),
        }
    }

    async fn build_provider(&self) -> Result<DataProvider> {
        if self.mock {
            return Ok(match self.seed {
                Some(seed) => DataProvider::offline_seeded(seed),
                None => DataProvider::offline(),
            });
        }

        let Some(organization) = &self.organization else {
            warn!("No organization configured; serving generated data");
            return Ok(DataProvider::offline());
        };

        let token = self.token.as_deref().map(Token::from);
        let client = AzureClient::new(&self.url, organization, token)?;
        let provider = DataProvider::connected(client);

        if !provider.reachable().await {
            warn!("Azure DevOps is unreachable; fetches will fall back to generated data");
        }

        Ok(provider)
    }

    async fn execute_projects(
        &self,
        provider: &DataProvider,
        store: &SettingsStore,
    ) -> Result<()> {
        let spinner = Spinner::start("Fetching projects");
        let projects = provider.projects().await;
        spinner.succeed(format!("Fetched {} projects", projects.len()));

        let default_project = store.default_project()?;
        self.emit(&projects, |projects| {
            output::print_projects(projects, default_project.as_deref());
        })
    }

    fn execute_config(&self, store: &SettingsStore, action: &ConfigAction) -> Result<()> {
        match action {
            ConfigAction::Show => {
                let settings = store.load()?;
                println!("Settings file: {}", store.path().display());
                match &settings.default_project {
                    Some(project) => println!("Default project: {project}"),
                    None => println!("Default project: (none)"),
                }
                if settings.visible_pipelines.is_empty() {
                    println!("Visible pipelines: all, for every project");
                } else {
                    for (project, ids) in &settings.visible_pipelines {
                        let rendered: Vec<String> =
                            ids.iter().map(|id| id.to_string()).collect();
                        println!("Visible pipelines for {project}: {}", rendered.join(", "));
                    }
                }
            }
            ConfigAction::SetProject { name } => {
                store.set_default_project(name)?;
                println!("Default project set to {name}");
            }
            ConfigAction::ClearProject => {
                store.clear_default_project()?;
                println!("Default project cleared");
            }
            ConfigAction::SetPipelines { project, ids } => {
                let project = self.config_target_project(store, project)?;
                store.set_visible_pipelines(&project, ids.clone())?;
                println!("Showing {} pipeline(s) for {project}", ids.len());
            }
            ConfigAction::ClearPipelines { project } => {
                let project = self.config_target_project(store, project)?;
                store.clear_visible_pipelines(&project)?;
                println!("Showing all pipelines for {project}");
            }
            ConfigAction::Clear => {
                store.clear()?;
                println!("Settings cleared");
            }
        }

        Ok(())
    }

    fn config_target_project(
        &self,
        store: &SettingsStore,
        explicit: &Option<String>,
    ) -> Result<String> {
        if let Some(project) = explicit.clone().or(self.project.clone()) {
            return Ok(project);
        }
        match store.default_project()? {
            Some(project) => Ok(project),
            None => bail!("No project given and no default configured"),
        }
    }

    fn emit<T: serde::Serialize>(&self, report: &T, render: impl FnOnce(&T)) -> Result<()> {
        if let Some(path) = &self.output {
            let json = if self.pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            std::fs::write(path, json)?;
            info!("Report written to: {}", path.display());
        } else {
            render(report);
        }

        Ok(())
    }
}
