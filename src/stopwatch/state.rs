use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StopwatchStatus {
    Stopped,
    Running,
}

impl Default for StopwatchStatus {
    fn default() -> Self {
        StopwatchStatus::Stopped
    }
}

/// One recorded split. Immutable once appended to the lap list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    /// 1-based sequential lap number within the session.
    pub number: u32,
    /// Milliseconds since the previous lap boundary (or session start).
    pub split_ms: u64,
    /// Accumulated milliseconds at the moment this lap was recorded.
    pub total_ms: u64,
}

/// Published view of the stopwatch, cloned out under the lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchSnapshot {
    pub status: StopwatchStatus,
    pub elapsed_ms: u64,
    pub lap_count: u32,
    pub laps: Vec<Lap>,
    pub started_at: Option<DateTime<Utc>>,
}

/// Pure timing core: accumulator, running flag, lap list.
///
/// All mutation is driven by callers passing explicit "now" instants, so the
/// core is testable without sleeping. The accumulator samples the delta since
/// the previous advance and adds it; it never derives elapsed time from a
/// session start point, which is what makes stop/resume compose.
#[derive(Debug, Clone)]
pub struct StopwatchState {
    status: StopwatchStatus,
    /// Kept as a `Duration` so per-tick truncation cannot accumulate;
    /// truncated to whole milliseconds only at the snapshot edge.
    elapsed: Duration,
    /// Anchor of the most recent advance; `Some` only while running.
    last_tick: Option<Instant>,
    started_at: Option<DateTime<Utc>>,
    laps: Vec<Lap>,
    lap_counter: u32,
}

impl Default for StopwatchState {
    fn default() -> Self {
        Self {
            status: StopwatchStatus::Stopped,
            elapsed: Duration::ZERO,
            last_tick: None,
            started_at: None,
            laps: Vec::new(),
            lap_counter: 0,
        }
    }
}

impl StopwatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or resume) accumulating from `now`. No-op while already running.
    pub fn begin(&mut self, wall_now: DateTime<Utc>, now: Instant) {
        if self.status == StopwatchStatus::Running {
            return;
        }
        if self.started_at.is_none() {
            self.started_at = Some(wall_now);
        }
        self.last_tick = Some(now);
        self.status = StopwatchStatus::Running;
    }

    /// Add the delta since the previous advance and re-anchor at `now`.
    /// No-op while stopped, so a tick racing a stop cannot thaw the clock.
    pub fn advance(&mut self, now: Instant) {
        if self.status != StopwatchStatus::Running {
            return;
        }
        if let Some(last) = self.last_tick {
            self.elapsed += now.saturating_duration_since(last);
        }
        self.last_tick = Some(now);
    }

    /// Halt accumulation, applying the final partial delta up to `now`.
    /// No-op while stopped.
    pub fn freeze(&mut self, now: Instant) {
        if self.status != StopwatchStatus::Running {
            return;
        }
        self.advance(now);
        self.status = StopwatchStatus::Stopped;
        self.last_tick = None;
    }

    /// Zero the accumulator, clear the lap list and counter. Running state is
    /// preserved; a live session re-anchors at `now` and keeps accumulating
    /// from zero, discarding the tail of the pre-reset tick interval.
    pub fn reset(&mut self, wall_now: DateTime<Utc>, now: Instant) {
        self.elapsed = Duration::ZERO;
        self.laps.clear();
        self.lap_counter = 0;
        if self.status == StopwatchStatus::Running {
            self.last_tick = Some(now);
            self.started_at = Some(wall_now);
        } else {
            self.started_at = None;
        }
    }

    /// Record a lap boundary at the current accumulated time.
    ///
    /// Not gated on the running flag: a lap before any start records a
    /// zero-duration split, matching how lap count tracks call count.
    pub fn record_lap(&mut self) -> Lap {
        let total_ms = self.elapsed_ms();
        let split_ms = total_ms - self.laps.last().map_or(0, |lap| lap.total_ms);
        self.lap_counter += 1;
        let lap = Lap {
            number: self.lap_counter,
            split_ms,
            total_ms,
        };
        self.laps.push(lap);
        lap
    }

    pub fn is_running(&self) -> bool {
        self.status == StopwatchStatus::Running
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    pub fn lap_count(&self) -> u32 {
        self.laps.len() as u32
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn snapshot(&self) -> StopwatchSnapshot {
        StopwatchSnapshot {
            status: self.status,
            elapsed_ms: self.elapsed_ms(),
            lap_count: self.lap_count(),
            laps: self.laps.clone(),
            started_at: self.started_at,
        }
    }
}
