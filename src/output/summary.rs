use chrono::{DateTime, Utc};

use crate::models::Project;
use crate::views::builds::BuildsReport;
use crate::views::dashboard::DashboardReport;
use crate::views::release::ReleaseReport;

use super::styling::{bright, dim};
use super::tables::{create_table, deployment_cell, issue_cell, stage_cell, status_cell};

// Builds view

pub fn print_builds(report: &BuildsReport) {
    println!(
        "{}  {} {}",
        bright("🧱"),
        bright(format!("Builds — {}", report.project)).underlined(),
        dim(format!("({} shown)", report.rows.len()))
    );

    if report.rows.is_empty() {
        println!("  {}", dim("No builds match the given filters."));
        return;
    }

    let mut table = create_table();
    table.set_header(vec![
        "Build", "Pipeline", "Branch", "Reason", "Status", "Stage", "Ticket", "Finished",
    ]);

    for row in &report.rows {
        let build = &row.build;
        table.add_row(vec![
            comfy_table::Cell::new(&build.build_number),
            comfy_table::Cell::new(&build.definition.name),
            comfy_table::Cell::new(short_branch(&build.source_branch)),
            comfy_table::Cell::new(build.reason.as_str()),
            status_cell(build.status, build.result),
            stage_cell(row.stage.as_ref()),
            issue_cell(row.issue.as_ref()),
            comfy_table::Cell::new(format_time(build.finish_time)),
        ]);
    }

    println!("{table}");
}

// Release view

pub fn print_release(report: &ReleaseReport) {
    println!(
        "{}  {}",
        bright("🚢"),
        bright(format!("Release candidates — {}", report.project)).underlined()
    );

    let mut table = create_table();
    table.set_header(vec!["Pipeline", "Build", "Status", "Stage", "Ticket", "Finished"]);

    for row in &report.rows {
        match &row.candidate {
            Some(candidate) => {
                let build = &candidate.build;
                table.add_row(vec![
                    comfy_table::Cell::new(&row.pipeline),
                    comfy_table::Cell::new(&build.build_number),
                    status_cell(build.status, build.result),
                    stage_cell(candidate.stage.as_ref()),
                    issue_cell(candidate.issue.as_ref()),
                    comfy_table::Cell::new(format_time(build.finish_time)),
                ]);
            }
            None => {
                table.add_row(vec![
                    comfy_table::Cell::new(&row.pipeline),
                    comfy_table::Cell::new("—").fg(comfy_table::Color::DarkGrey),
                    comfy_table::Cell::new("no candidate").fg(comfy_table::Color::DarkGrey),
                    comfy_table::Cell::new(""),
                    comfy_table::Cell::new(""),
                    comfy_table::Cell::new(""),
                ]);
            }
        }
    }

    println!("{table}");
}

// Dashboard view

pub fn print_dashboard(report: &DashboardReport) {
    println!(
        "{}  {}",
        bright("🌐"),
        bright(format!("Deployments — {}", report.project)).underlined()
    );

    let mut table = create_table();
    let mut header = vec!["Pipeline".to_string()];
    header.extend(report.environments.iter().cloned());
    table.set_header(header);

    for row in &report.rows {
        let mut cells = vec![comfy_table::Cell::new(&row.pipeline)];
        for cell in &row.cells {
            cells.push(deployment_cell(
                cell.as_ref().map(|c| c.build_number.as_str()),
                cell.as_ref().and_then(|c| c.result),
            ));
        }
        table.add_row(cells);
    }

    println!("{table}");
    println!(
        "  {}",
        dim(format!(
            "Collected {}",
            report.collected_at.format("%Y-%m-%d %H:%M UTC")
        ))
    );
}

// Project listing

pub fn print_projects(projects: &[Project], default_project: Option<&str>) {
    let mut table = create_table();
    table.set_header(vec!["Project", "State", ""]);

    for project in projects {
        let marker = if Some(project.name.as_str()) == default_project {
            "default"
        } else {
            ""
        };
        table.add_row(vec![
            comfy_table::Cell::new(&project.name),
            comfy_table::Cell::new(project.state.as_deref().unwrap_or("—")),
            comfy_table::Cell::new(marker).fg(comfy_table::Color::Cyan),
        ]);
    }

    println!("{table}");
}

fn short_branch(branch: &str) -> &str {
    branch.strip_prefix("refs/heads/").unwrap_or(branch)
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}
