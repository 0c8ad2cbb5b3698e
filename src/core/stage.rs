use crate::models::{BuildTimeline, TimelineRecord, TimelineResult, TimelineState};

/// Display classification of a build's current stage, consumed by rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StageDisplay {
    InProgress,
    Success,
    Failure,
    /// Pending, not-yet-started, or any other non-signal result
    Neutral,
}

/// Selects the single "current/last relevant stage" from a build's timeline.
///
/// Records whose result is `skipped` or `canceled` carry no meaningful
/// progress and are discarded up front. Among the rest, the most recent
/// `start_time` wins; a record that has started beats one that has not,
/// regardless of list position; two unstarted records keep first-in-input
/// preference so the choice stays deterministic.
///
/// Returns `None` when nothing survives the filter.
pub fn select_last_stage<'a>(records: &[&'a TimelineRecord]) -> Option<&'a TimelineRecord> {
    let mut selected: Option<&TimelineRecord> = None;

    for record in records.iter().copied() {
        if matches!(
            record.result,
            Some(TimelineResult::Skipped) | Some(TimelineResult::Canceled)
        ) {
            continue;
        }

        selected = match selected {
            None => Some(record),
            Some(best) => match (best.start_time, record.start_time) {
                // A started record beats an unstarted one
                (None, Some(_)) => Some(record),
                // Strictly more recent start wins; ties keep the earlier record
                (Some(b), Some(c)) if c > b => Some(record),
                _ => Some(best),
            },
        };
    }

    selected
}

/// Convenience wrapper: narrows a timeline to its stage records and selects.
pub fn last_stage_of(timeline: &BuildTimeline) -> Option<&TimelineRecord> {
    select_last_stage(&timeline.stage_records())
}

/// Maps the selected stage onto the icon/label category the views render.
pub fn classify(record: &TimelineRecord) -> StageDisplay {
    if record.state == TimelineState::InProgress {
        return StageDisplay::InProgress;
    }

    match record.result {
        Some(TimelineResult::Succeeded) => StageDisplay::Success,
        Some(TimelineResult::Failed) | Some(TimelineResult::PartiallySucceeded) => {
            StageDisplay::Failure
        }
        _ => StageDisplay::Neutral,
    }
}
