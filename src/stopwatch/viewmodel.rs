//! Derived presentation state: the non-visual half of the view-model layer.
//! A frontend rebuilds its whole display from a snapshot plus these helpers.

use serde::{Deserialize, Serialize};

use super::state::{StopwatchSnapshot, StopwatchStatus};

/// Presentation states a desktop frontend switches between.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// Fresh stopwatch, nothing recorded yet.
    Launch,
    /// Actively accumulating.
    Run,
    /// Paused mid-session with time on the clock.
    Wait,
    /// Stopped with recorded laps to review.
    DisplayLap,
}

impl ViewMode {
    pub fn for_snapshot(snapshot: &StopwatchSnapshot) -> Self {
        match snapshot.status {
            StopwatchStatus::Running => ViewMode::Run,
            StopwatchStatus::Stopped if snapshot.lap_count > 0 => ViewMode::DisplayLap,
            StopwatchStatus::Stopped if snapshot.elapsed_ms > 0 => ViewMode::Wait,
            StopwatchStatus::Stopped => ViewMode::Launch,
        }
    }
}

/// Whether the lap panel should be shown: at least one recorded lap.
pub fn lap_panel_visible(snapshot: &StopwatchSnapshot) -> bool {
    snapshot.lap_count >= 1
}

/// Format accumulated time as "HH:MM:SS.cc" for the main readout.
pub fn format_elapsed(ms: u64) -> String {
    let total_secs = ms / 1000;
    let cs = (ms % 1000) / 10;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}.{:02}", h, m, s, cs)
}

/// Format a lap split as "MM:SS.cc" for lap rows.
pub fn format_split(ms: u64) -> String {
    let total_secs = ms / 1000;
    let cs = (ms % 1000) / 10;
    let m = total_secs / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}.{:02}", m, s, cs)
}
