use std::time::Duration;

use drone_cli::driver::Driver;
use drone_core::{LatLng, RunConfig, RunStatus, Stepper};
use drone_shared::{Position, Snapshot, Status};
use tokio::io::BufReader;
use tokio::time::Instant;
use tokio_test::io::Builder;

const TICK: Duration = Duration::from_secs(1);

fn driver_toward(lat: f64, lng: f64, ticks: u32) -> Driver {
    let mut driver = Driver::new(Stepper::new(), TICK);
    driver.start(LatLng::new(lat, lng), RunConfig::new(ticks).unwrap());
    driver
}

#[tokio::test(start_paused = true)]
async fn run_finishes_after_duration_ticks() {
    let driver = driver_toward(10.0, 20.0, 2);
    let mut snapshots = Vec::new();
    let began = Instant::now();

    let stepper = driver
        .run(BufReader::new(Builder::new().build()), |s| snapshots.push(s.clone()))
        .await
        .unwrap();

    assert_eq!(stepper.status(), RunStatus::Finished);
    assert_eq!(stepper.elapsed_ticks(), 2);
    assert_eq!(stepper.points(), &[LatLng::new(7.5, 15.0)]);

    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].points, vec![Position::new(5.0, 10.0)]);
    assert_eq!(snapshots[0].progress, 50.0);
    assert_eq!(snapshots[1].progress, 100.0);

    let elapsed = began.elapsed();
    assert!(elapsed >= 2 * TICK && elapsed < 3 * TICK, "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn progress_never_decreases() {
    let driver = driver_toward(-5.0, 5.0, 9);
    let mut progress = Vec::new();

    driver
        .run(BufReader::new(Builder::new().build()), |s| progress.push(s.progress))
        .await
        .unwrap();

    assert_eq!(progress.len(), 9);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(progress.last().copied(), Some(100.0));
}

#[tokio::test(start_paused = true)]
async fn resume_after_pause_restarts_from_zero() {
    let driver = driver_toward(8.0, 8.0, 10);
    let input = Builder::new()
        .wait(Duration::from_millis(2500))
        .read(b"pause\n")
        .wait(Duration::from_secs(5))
        .read(b"resume\n")
        .build();
    let mut snapshots: Vec<Snapshot> = Vec::new();

    let stepper = driver
        .run(BufReader::new(input), |s| snapshots.push(s.clone()))
        .await
        .unwrap();

    let paused = &snapshots[2];
    assert_eq!(paused.status, Status::Paused);
    assert_eq!(paused.elapsed_ticks, 2);

    let resumed = &snapshots[3];
    assert_eq!(resumed.status, Status::Running);
    assert_eq!(resumed.elapsed_ticks, 0);
    assert_eq!(resumed.points, paused.points);

    // Two ticks before the pause, a full ten after the resume.
    assert_eq!(snapshots.len(), 2 + 1 + 1 + 10);
    assert_eq!(stepper.elapsed_ticks(), 10);
    assert_eq!(stepper.status(), RunStatus::Finished);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_further_movement() {
    let driver = driver_toward(3.0, 3.0, 10);
    let input = Builder::new()
        .wait(Duration::from_millis(1500))
        .read(b"cancel\n")
        .build();
    let mut snapshots = Vec::new();

    let stepper = driver
        .run(BufReader::new(input), |s| snapshots.push(s.clone()))
        .await
        .unwrap();

    assert_eq!(stepper.status(), RunStatus::Cancelled);
    assert_eq!(stepper.elapsed_ticks(), 1);
    assert_eq!(stepper.points(), &[LatLng::new(0.3, 0.3)]);
    assert_eq!(snapshots.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn start_while_running_replaces_tick_stream() {
    let driver = driver_toward(30.0, 30.0, 10);
    let input = Builder::new()
        .wait(Duration::from_millis(1500))
        .read(b"start 0 0 2\n")
        .build();
    let mut ticks = 0;
    let began = Instant::now();

    let stepper = driver
        .run(BufReader::new(input), |s| {
            if s.status != Status::Running || s.elapsed_ticks > 0 {
                ticks += 1;
            }
        })
        .await
        .unwrap();

    assert_eq!(stepper.status(), RunStatus::Finished);
    assert_eq!(stepper.duration_ticks(), Some(2));
    assert_eq!(ticks, 3);
    assert!(began.elapsed() < Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn bad_commands_are_skipped() {
    let driver = Driver::new(Stepper::new(), TICK);
    let input = Builder::new()
        .read(b"fly\nstart 1 2 0\n\nadd\nadd\nremove\nstatus\nquit\nadd\n")
        .build();
    let mut snapshots = Vec::new();

    let stepper = driver
        .run(BufReader::new(input), |s| snapshots.push(s.clone()))
        .await
        .unwrap();

    assert_eq!(stepper.len(), 2);
    assert_eq!(stepper.status(), RunStatus::Idle);
    assert_eq!(stepper.elapsed_ticks(), 0);
    assert_eq!(snapshots.len(), 4);
    assert!(snapshots.iter().all(|s| s.progress == 0.0));
}

#[tokio::test(start_paused = true)]
async fn stay_keeps_reading_after_finish() {
    let driver = driver_toward(1.0, 1.0, 1).stay_after_finish();
    let input = Builder::new()
        .wait(Duration::from_secs(3))
        .read(b"add\n")
        .build();

    let stepper = driver.run(BufReader::new(input), |_| {}).await.unwrap();

    assert_eq!(stepper.status(), RunStatus::Finished);
    assert_eq!(stepper.len(), 2);
}
