use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::settings::StopwatchSettings;

use super::state::{Lap, StopwatchSnapshot, StopwatchState};

struct TickerHandle {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Async shell around [`StopwatchState`]: owns the lock, drives the periodic
/// background tick, and publishes snapshots for the UI to render.
///
/// Commands are synchronous and never block beyond the shared lock; the only
/// suspending call is [`shutdown`](Self::shutdown), which joins the ticker
/// task. Must live inside a tokio runtime.
pub struct StopwatchController {
    state: Arc<Mutex<StopwatchState>>,
    events: watch::Sender<StopwatchSnapshot>,
    ticker: Mutex<Option<TickerHandle>>,
    tick_interval: Duration,
    publish_every_ticks: u32,
}

impl StopwatchController {
    pub fn new(settings: StopwatchSettings) -> Self {
        let debug_mode = std::env::var("SPLITWATCH_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let state = StopwatchState::new();
        let (events, _) = watch::channel(state.snapshot());

        Self {
            state: Arc::new(Mutex::new(state)),
            events,
            ticker: Mutex::new(None),
            tick_interval: Duration::from_millis(settings.tick_interval_ms.max(1)),
            publish_every_ticks: if debug_mode {
                1
            } else {
                settings.publish_every_ticks.max(1)
            },
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(StopwatchSettings::default())
    }

    /// Begin (or resume) accumulating. No-op while already running.
    pub fn start(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.is_running() {
                return;
            }
            state.begin(Utc::now(), Instant::now());
        }
        info!("stopwatch started");
        self.spawn_ticker();
        self.publish();
    }

    /// Halt accumulation, applying the delta since the last tick.
    /// No-op while stopped.
    pub fn stop(&self) {
        let elapsed_ms = {
            let mut state = self.state.lock().unwrap();
            if !state.is_running() {
                return;
            }
            state.freeze(Instant::now());
            state.elapsed_ms()
        };
        self.cancel_ticker();
        info!("stopwatch stopped at {elapsed_ms} ms");
        self.publish();
    }

    /// Zero the accumulator and clear lap history. Running state is
    /// preserved: a live session keeps ticking from zero.
    pub fn reset(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.reset(Utc::now(), Instant::now());
        }
        info!("stopwatch reset");
        self.publish();
    }

    /// Record a lap boundary. The accumulator is advanced to the call
    /// instant first, so the split does not lag by up to one tick.
    pub fn start_new_lap(&self) {
        let lap = {
            let mut state = self.state.lock().unwrap();
            state.advance(Instant::now());
            state.record_lap()
        };
        info!(
            "lap {} recorded: split {} ms, total {} ms",
            lap.number, lap.split_ms, lap.total_ms
        );
        self.publish();
    }

    /// Current accumulated time in milliseconds, advanced to the call
    /// instant while running. Callable from any thread.
    pub fn elapsed_ms(&self) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.advance(Instant::now());
        state.elapsed_ms()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().is_running()
    }

    pub fn lap_count(&self) -> u32 {
        self.state.lock().unwrap().lap_count()
    }

    /// The recorded laps, oldest first.
    pub fn laps(&self) -> Vec<Lap> {
        self.state.lock().unwrap().laps().to_vec()
    }

    pub fn snapshot(&self) -> StopwatchSnapshot {
        let mut state = self.state.lock().unwrap();
        state.advance(Instant::now());
        state.snapshot()
    }

    /// Read-only live view over the stopwatch: receivers observe tick
    /// progress and lap appends but cannot mutate anything.
    pub fn subscribe(&self) -> watch::Receiver<StopwatchSnapshot> {
        self.events.subscribe()
    }

    /// Tear down the background ticker and freeze the clock. Safe to call
    /// more than once; a later call finds nothing left to release.
    pub async fn shutdown(&self) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            state.freeze(Instant::now());
        }
        let ticker = self.ticker.lock().unwrap().take();
        if let Some(ticker) = ticker {
            ticker.token.cancel();
            ticker
                .handle
                .await
                .context("stopwatch ticker failed to join")?;
        }
        self.publish();
        Ok(())
    }

    fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().unwrap();
        if let Some(old) = ticker_guard.take() {
            old.token.cancel();
        }

        let token = CancellationToken::new();
        let cancel = token.clone();
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let tick_interval = self.tick_interval;
        let publish_every = self.publish_every_ticks;

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval's first tick completes immediately; consume it so
            // the loop advances on interval boundaries.
            ticker.tick().await;
            let mut ticks: u32 = 0;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let snapshot = {
                            let mut guard = state.lock().unwrap();
                            if !guard.is_running() {
                                break;
                            }
                            guard.advance(Instant::now());
                            guard.snapshot()
                        };
                        ticks = ticks.wrapping_add(1);
                        if ticks % publish_every == 0 {
                            events.send_replace(snapshot);
                        }
                    }
                    _ = cancel.cancelled() => break,
                }
            }
        });

        *ticker_guard = Some(TickerHandle { token, handle });
    }

    fn cancel_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().unwrap().take() {
            ticker.token.cancel();
        }
    }

    fn publish(&self) {
        let snapshot = self.state.lock().unwrap().snapshot();
        self.events.send_replace(snapshot);
    }
}

impl Drop for StopwatchController {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}
