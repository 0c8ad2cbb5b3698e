use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::core::stage::StageDisplay;
use crate::models::{BuildResult, BuildStatus};
use crate::views::{IssueSummary, StageSummary};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn status_cell(status: BuildStatus, result: Option<BuildResult>) -> Cell {
    match (status, result) {
        (BuildStatus::InProgress, _) => Cell::new("in progress").fg(TableColor::Yellow),
        (BuildStatus::Completed, Some(BuildResult::Succeeded)) => {
            Cell::new("succeeded").fg(TableColor::Green)
        }
        (BuildStatus::Completed, Some(BuildResult::PartiallySucceeded)) => {
            Cell::new("partial").fg(TableColor::Yellow)
        }
        (BuildStatus::Completed, Some(BuildResult::Failed)) => {
            Cell::new("failed").fg(TableColor::Red)
        }
        (BuildStatus::Completed, Some(BuildResult::Canceled)) => {
            Cell::new("canceled").fg(TableColor::DarkGrey)
        }
        (status, _) => Cell::new(status.as_str()).fg(TableColor::DarkGrey),
    }
}

pub fn stage_cell(stage: Option<&StageSummary>) -> Cell {
    let Some(stage) = stage else {
        return Cell::new("—").fg(TableColor::DarkGrey);
    };

    match stage.display {
        StageDisplay::InProgress => {
            Cell::new(format!("⟳ {}", stage.name)).fg(TableColor::Yellow)
        }
        StageDisplay::Success => Cell::new(format!("✓ {}", stage.name)).fg(TableColor::Green),
        StageDisplay::Failure => Cell::new(format!("✗ {}", stage.name)).fg(TableColor::Red),
        StageDisplay::Neutral => Cell::new(stage.name.clone()),
    }
}

pub fn issue_cell(issue: Option<&IssueSummary>) -> Cell {
    let Some(issue) = issue else {
        return Cell::new("");
    };

    match issue.done {
        Some(true) => Cell::new(format!("{} ✓", issue.key)).fg(TableColor::Green),
        Some(false) => Cell::new(format!("{} …", issue.key)).fg(TableColor::Yellow),
        None => Cell::new(format!("{} ?", issue.key)).fg(TableColor::DarkGrey),
    }
}

pub fn deployment_cell(build_number: Option<&str>, result: Option<BuildResult>) -> Cell {
    let Some(number) = build_number else {
        return Cell::new("—").fg(TableColor::DarkGrey);
    };

    match result {
        Some(BuildResult::Succeeded) => Cell::new(number).fg(TableColor::Green),
        Some(BuildResult::Failed) => Cell::new(number).fg(TableColor::Red),
        Some(BuildResult::PartiallySucceeded) => Cell::new(number).fg(TableColor::Yellow),
        _ => Cell::new(number),
    }
}
