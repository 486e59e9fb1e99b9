use std::time::Duration;

use splitwatch::{StopwatchController, StopwatchStatus, ViewMode};
use tokio::time::sleep;

/// Compare millisecond durations with a 100 ms tolerance.
fn close_to(actual_ms: u64, expected_ms: u64) -> bool {
    (actual_ms as i64 - expected_ms as i64).abs() < 100
}

#[tokio::test(start_paused = true)]
async fn elapsed_matches_real_time() {
    let stopwatch = StopwatchController::with_defaults();

    stopwatch.start();
    sleep(Duration::from_millis(2000)).await;
    stopwatch.stop();

    let elapsed = stopwatch.elapsed_ms();
    assert!(close_to(elapsed, 2000), "elapsed {elapsed} ms");
    stopwatch.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_the_accumulator() {
    let stopwatch = StopwatchController::with_defaults();

    stopwatch.start();
    sleep(Duration::from_millis(2000)).await;
    stopwatch.stop();
    let at_stop = stopwatch.elapsed_ms();

    sleep(Duration::from_millis(2000)).await;
    assert_eq!(stopwatch.elapsed_ms(), at_stop);
    assert!(!stopwatch.is_running());
}

#[tokio::test(start_paused = true)]
async fn resume_accumulates_across_intervals() {
    let stopwatch = StopwatchController::with_defaults();

    stopwatch.start();
    sleep(Duration::from_millis(1200)).await;
    stopwatch.stop();
    sleep(Duration::from_millis(600)).await;
    stopwatch.start();
    sleep(Duration::from_millis(600)).await;
    stopwatch.stop();

    let elapsed = stopwatch.elapsed_ms();
    assert!(close_to(elapsed, 1800), "elapsed {elapsed} ms");
}

#[tokio::test(start_paused = true)]
async fn lap_split_matches_wait_time() {
    let stopwatch = StopwatchController::with_defaults();

    stopwatch.start();
    sleep(Duration::from_millis(2000)).await;
    stopwatch.start_new_lap();
    sleep(Duration::from_millis(2000)).await;
    stopwatch.stop();

    let laps = stopwatch.laps();
    let last = laps.last().unwrap();
    assert!(close_to(last.split_ms, 2000), "split {} ms", last.split_ms);
}

#[tokio::test(start_paused = true)]
async fn lap_count_matches_calls() {
    let stopwatch = StopwatchController::with_defaults();

    stopwatch.start();
    for _ in 0..5 {
        sleep(Duration::from_millis(300)).await;
        stopwatch.start_new_lap();
    }
    stopwatch.stop();

    let laps = stopwatch.laps();
    assert_eq!(stopwatch.lap_count(), 5);
    assert_eq!(laps.last().unwrap().number, 5);

    assert_eq!(laps[0].split_ms, laps[0].total_ms);
    for pair in laps.windows(2) {
        assert!(pair[1].total_ms >= pair[0].total_ms);
        assert_eq!(pair[1].split_ms, pair[1].total_ms - pair[0].total_ms);
    }
}

#[tokio::test(start_paused = true)]
async fn reset_clears_time_and_laps() {
    let stopwatch = StopwatchController::with_defaults();

    stopwatch.start();
    sleep(Duration::from_millis(500)).await;
    stopwatch.start_new_lap();
    stopwatch.stop();
    stopwatch.reset();

    assert_eq!(stopwatch.elapsed_ms(), 0);
    assert_eq!(stopwatch.lap_count(), 0);

    // A new session numbers its laps from 1 again.
    stopwatch.start();
    stopwatch.start_new_lap();
    assert_eq!(stopwatch.laps()[0].number, 1);
    stopwatch.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reset_while_running_keeps_ticking_from_zero() {
    let stopwatch = StopwatchController::with_defaults();

    stopwatch.start();
    sleep(Duration::from_millis(1000)).await;
    stopwatch.reset();
    assert!(stopwatch.is_running());

    sleep(Duration::from_millis(600)).await;
    stopwatch.stop();

    let elapsed = stopwatch.elapsed_ms();
    assert!(close_to(elapsed, 600), "elapsed {elapsed} ms");
}

#[tokio::test(start_paused = true)]
async fn stop_before_start_is_a_noop() {
    let stopwatch = StopwatchController::with_defaults();
    stopwatch.stop();
    assert_eq!(stopwatch.elapsed_ms(), 0);
    assert!(!stopwatch.is_running());
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_ticks_and_laps() {
    let stopwatch = StopwatchController::with_defaults();
    let mut events = stopwatch.subscribe();

    stopwatch.start();
    events.changed().await.unwrap();
    assert_eq!(events.borrow_and_update().status, StopwatchStatus::Running);

    sleep(Duration::from_millis(100)).await;
    stopwatch.start_new_lap();
    events.changed().await.unwrap();

    let snapshot = events.borrow_and_update().clone();
    assert_eq!(snapshot.lap_count, 1);
    assert!(close_to(snapshot.elapsed_ms, 100), "elapsed {} ms", snapshot.elapsed_ms);
    assert_eq!(ViewMode::for_snapshot(&snapshot), ViewMode::Run);

    stopwatch.stop();
    events.changed().await.unwrap();
    let snapshot = events.borrow_and_update().clone();
    assert_eq!(snapshot.status, StopwatchStatus::Stopped);
    assert_eq!(ViewMode::for_snapshot(&snapshot), ViewMode::DisplayLap);
}

#[tokio::test(start_paused = true)]
async fn shutdown_freezes_and_is_idempotent() {
    let stopwatch = StopwatchController::with_defaults();

    stopwatch.start();
    sleep(Duration::from_millis(500)).await;
    stopwatch.shutdown().await.unwrap();
    stopwatch.shutdown().await.unwrap();

    assert!(!stopwatch.is_running());
    let at_shutdown = stopwatch.elapsed_ms();
    sleep(Duration::from_millis(500)).await;
    assert_eq!(stopwatch.elapsed_ms(), at_shutdown);
}
