//! Stopwatch timing core for desktop frontends.
//!
//! The crate owns the accumulator and lap accounting of a stopwatch; a
//! windowed UI is an external collaborator that invokes commands on a
//! [`StopwatchController`] and renders the snapshots it publishes. The
//! accumulator samples the wall-clock delta on each background tick and adds
//! it, so pausing simply stops sampling and resuming re-anchors — the paused
//! interval is never counted.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use splitwatch::StopwatchController;
//!
//! let stopwatch = StopwatchController::with_defaults();
//! stopwatch.start();
//! // ... UI renders snapshots from stopwatch.subscribe() ...
//! stopwatch.start_new_lap();
//! stopwatch.stop();
//! stopwatch.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod settings;
pub mod stopwatch;

pub use settings::{SettingsStore, StopwatchSettings};
pub use stopwatch::viewmodel::{format_elapsed, format_split, lap_panel_visible};
pub use stopwatch::{
    Lap, StopwatchController, StopwatchSnapshot, StopwatchState, StopwatchStatus, ViewMode,
};

/// Initialize logging for a binary embedding the crate. Reads `RUST_LOG`,
/// defaulting to info. Call once at startup.
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
