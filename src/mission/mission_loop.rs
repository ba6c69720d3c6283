use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use rand::Rng;

use super::Clock;
use crate::config::{MissionConfig, ScheduleConfig};
use crate::detection::BaselineTracker;
use crate::device::{PixelDisplay, SensorDevice};
use crate::display::VisualFeedback;
use crate::error::MissionResult;
use crate::position::PositionProvider;
use crate::sensors::SensorReader;
use crate::telemetry::TelemetryLog;
use crate::types::{DeviationEvent, IterationOutcome, MissionState, MissionSummary, Sample};
use crate::utils::format_timestamp;

/// What a completed iteration observed.
struct IterationReport {
    motion: bool,
    deviation: Option<DeviationEvent>,
    sleep: Duration,
}

/// Fixed-duration acquisition loop. One iteration never ends the mission;
/// only the deadline does.
pub struct MissionLoop<S, D, P, C, R>
where
    S: SensorDevice,
    D: PixelDisplay,
    P: PositionProvider,
    C: Clock + Clone,
    R: Rng,
{
    reader: SensorReader<S>,
    feedback: VisualFeedback<D, C, R>,
    position: P,
    tracker: BaselineTracker,
    log: TelemetryLog,
    clock: C,
    schedule: ScheduleConfig,
    sequence: u64,
    state: MissionState,
}

impl<S, D, P, C, R> MissionLoop<S, D, P, C, R>
where
    S: SensorDevice,
    D: PixelDisplay,
    P: PositionProvider,
    C: Clock + Clone,
    R: Rng,
{
    pub fn new(
        sensors: S,
        display: D,
        position: P,
        log: TelemetryLog,
        clock: C,
        rng: R,
        config: &MissionConfig,
    ) -> Self {
        Self {
            reader: SensorReader::new(sensors),
            feedback: VisualFeedback::new(display, clock.clone(), rng, config.display.clone()),
            position,
            tracker: BaselineTracker::new(config.detection.threshold),
            log,
            clock,
            schedule: config.mission.clone(),
            sequence: 1,
            state: MissionState::Running,
        }
    }

    /// Sequence number the next iteration will use.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    /// Start-up screen. Failures are logged and ignored.
    pub fn splash(&mut self) {
        if let Err(e) = self.feedback.splash() {
            warn!("Splash screen failed: {}", e);
        }
    }

    /// Run iterations until `now >= start + duration`.
    pub fn run(&mut self) -> MissionSummary {
        let start = self.clock.now();
        let deadline = start
            .checked_add_signed(self.schedule.duration())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut summary = MissionSummary::new();

        info!("Mission Status: Initiated");
        info!(
            "Mission runs until {} ({} minutes)",
            format_timestamp(&deadline),
            self.schedule.duration_minutes
        );
        info!("Deviation threshold: {} g per axis", self.tracker.threshold());

        while self.clock.now() < deadline {
            let outcome = self.run_iteration();
            debug!(
                "Iteration {} {}",
                outcome.sequence(),
                if outcome.is_success() { "completed" } else { "failed" }
            );
            summary.record(&outcome);
        }

        self.state = MissionState::Complete;
        summary.state = self.state;
        summary.rows_written = self.log.rows_written();

        info!("Mission Status: Complete");
        info!("Mission summary: {}", summary);
        summary
    }

    /// One full pass of the loop body, including both sleeps. The sequence
    /// number advances whether or not the iteration succeeded.
    pub fn run_iteration(&mut self) -> IterationOutcome {
        let sequence = self.sequence;

        let (outcome, sleep) = match self.acquire(sequence) {
            Ok(report) => (
                IterationOutcome::Completed {
                    sequence,
                    motion: report.motion,
                    deviation: report.deviation,
                },
                report.sleep,
            ),
            Err(e) => {
                error!("{}: {}", e.category(), e);
                (
                    IterationOutcome::Failed {
                        sequence,
                        category: e.category(),
                        message: e.to_string(),
                    },
                    self.schedule.nominal_sleep(),
                )
            }
        };

        self.clock.sleep(sleep);
        self.sequence += 1;
        self.clock.sleep(self.schedule.secondary_sleep());

        outcome
    }

    fn acquire(&mut self, sequence: u64) -> MissionResult<IterationReport> {
        self.feedback.heartbeat()?;

        let motion = self.reader.motion_detected()?;
        if motion {
            self.feedback.show_motion()?;
            info!("Astronaut detected at {}", format_timestamp(&self.clock.now_local()));
        }

        let (temperature, humidity) = self.reader.read_environment()?;
        let location = self.position.ground_track(self.clock.now())?;
        let snapshot = self.reader.read()?;

        let sample = Sample::new(
            sequence,
            self.clock.now_local(),
            location,
            temperature,
            humidity,
            snapshot,
        );
        self.log.append(&sample)?;

        // 两次独立读数：基线与当前值
        let baseline = self.reader.read_acceleration()?;
        self.tracker.set_baseline(baseline);
        let current = self.reader.read_acceleration()?;
        let event = self.tracker.compare(current);

        let mut sleep = self.schedule.nominal_sleep();
        let deviation = if event.is_empty() {
            None
        } else {
            info!("ISS motion detected in: {}", event.axes);
            info!("{}", event.delta);
            self.feedback.show_alert(&event)?;
            sleep = self.schedule.alert_sleep();
            Some(event)
        };

        Ok(IterationReport {
            motion,
            deviation,
            sleep,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::scripted::{DisplayCall, RecordingDisplay, ScriptedSensors};
    use crate::mission::clock::ManualClock;
    use crate::position::CircularOrbit;
    use crate::types::Axis;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::{Path, PathBuf};

    type TestLoop<'a> = MissionLoop<
        &'a mut ScriptedSensors,
        &'a mut RecordingDisplay,
        CircularOrbit,
        &'a ManualClock,
        StdRng,
    >;

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 4, 20, 10, 0, 0).unwrap()
    }

    fn temp_csv(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("sense_mission_loop_{}", std::process::id()))
            .join(name)
    }

    fn config(duration_minutes: f64) -> MissionConfig {
        let mut config = MissionConfig::default();
        config.mission.duration_minutes = duration_minutes;
        config
    }

    fn build<'a>(
        sensors: &'a mut ScriptedSensors,
        display: &'a mut RecordingDisplay,
        clock: &'a ManualClock,
        path: &Path,
        config: &MissionConfig,
    ) -> TestLoop<'a> {
        build_with_orbit(sensors, display, clock, path, config, CircularOrbit::iss(start(), 0.0))
    }

    fn build_with_orbit<'a>(
        sensors: &'a mut ScriptedSensors,
        display: &'a mut RecordingDisplay,
        clock: &'a ManualClock,
        path: &Path,
        config: &MissionConfig,
        orbit: CircularOrbit,
    ) -> TestLoop<'a> {
        MissionLoop::new(
            sensors,
            display,
            orbit,
            TelemetryLog::initialize(path).unwrap(),
            clock,
            StdRng::seed_from_u64(3),
            config,
        )
    }

    fn counters(path: &Path) -> Vec<u64> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap()[0].parse().unwrap())
            .collect()
    }

    #[test]
    fn test_runs_until_deadline() {
        let path = temp_csv("deadline.csv");
        let clock = ManualClock::new(start());
        let mut sensors = ScriptedSensors::new();
        let mut display = RecordingDisplay::default();

        let summary = {
            let mut mission = build(&mut sensors, &mut display, &clock, &path, &config(1.0));
            let summary = mission.run();
            assert_eq!(mission.state(), MissionState::Complete);
            assert_eq!(mission.sequence(), 16);
            summary
        };

        // 2 s + 2 s per iteration over one minute
        assert_eq!(summary.iterations, 15);
        assert_eq!(summary.failed_iterations, 0);
        assert_eq!(summary.rows_written, 15);
        assert_eq!(summary.state, MissionState::Complete);
        assert_eq!(clock.total_slept(), Duration::from_secs(60));
        assert_eq!(counters(&path), (1..=15).collect::<Vec<u64>>());
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 16);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_zero_duration_runs_no_iteration() {
        let path = temp_csv("zero.csv");
        let clock = ManualClock::new(start());
        let mut sensors = ScriptedSensors::new();
        let mut display = RecordingDisplay::default();

        let summary = {
            let mut mission = build(&mut sensors, &mut display, &clock, &path, &config(0.0));
            mission.run()
        };

        assert_eq!(summary.iterations, 0);
        assert_eq!(summary.state, MissionState::Complete);
        assert!(clock.sleeps.borrow().is_empty());
        assert!(display.calls.is_empty());
        assert_eq!(sensors.accelerometer_calls, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_failed_iteration_is_contained() {
        let path = temp_csv("fault.csv");
        let clock = ManualClock::new(start());
        let mut sensors = ScriptedSensors::new();
        sensors.temperature_faults.extend([false, true, false]);
        sensors.motions.extend([false, false, true]);
        let mut display = RecordingDisplay::default();

        let outcomes: Vec<IterationOutcome> = {
            let mut mission = build(&mut sensors, &mut display, &clock, &path, &config(60.0));
            (0..3).map(|_| mission.run_iteration()).collect()
        };

        assert!(outcomes[0].is_success());
        match &outcomes[1] {
            IterationOutcome::Failed { sequence, category, message } => {
                assert_eq!(*sequence, 2);
                assert_eq!(*category, "SensorFault");
                assert!(message.contains("temperature"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(
            outcomes[2],
            IterationOutcome::Completed {
                sequence: 3,
                motion: true,
                deviation: None
            }
        );

        // 失败的迭代不写入数据，但计数器照常递增
        assert_eq!(counters(&path), vec![1, 3]);
        assert!(display.calls.contains(&DisplayCall::Image([0, 0, 0])));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_deviation_shortens_sleep() {
        let path = temp_csv("deviation.csv");
        let clock = ManualClock::new(start());
        let mut sensors = ScriptedSensors::new();
        // snapshot, baseline, current
        sensors.queue_acceleration(0.1, 0.2, 0.3);
        sensors.queue_acceleration(0.1, 0.2, 0.3);
        sensors.queue_acceleration(0.1, 0.207, 0.3);
        let mut display = RecordingDisplay::default();

        let outcome = {
            let mut mission = build(&mut sensors, &mut display, &clock, &path, &config(60.0));
            mission.run_iteration()
        };

        match outcome {
            IterationOutcome::Completed {
                sequence: 1,
                motion: false,
                deviation: Some(event),
            } => {
                assert!(event.axes.contains(Axis::Y));
                assert_eq!(event.axes.len(), 1);
                assert_relative_eq!(event.delta.y, 0.007);
            }
            other => panic!("expected deviation, got {:?}", other),
        }

        assert_eq!(
            *clock.sleeps.borrow(),
            vec![Duration::ZERO, Duration::from_secs(2)]
        );
        assert_eq!(display.messages(), vec!["ISS Motion detected"]);
        assert_eq!(sensors.accelerometer_calls, 3);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_display_fault_does_not_stop_next_iteration() {
        let path = temp_csv("display_fault.csv");
        let clock = ManualClock::new(start());
        let mut sensors = ScriptedSensors::new();
        sensors.queue_acceleration(0.0, 0.0, 0.0);
        sensors.queue_acceleration(0.0, 0.0, 0.0);
        sensors.queue_acceleration(0.5, 0.0, 0.0);
        let mut display = RecordingDisplay {
            fail_messages: true,
            ..Default::default()
        };

        let outcomes: Vec<IterationOutcome> = {
            let mut mission = build(&mut sensors, &mut display, &clock, &path, &config(60.0));
            (0..2).map(|_| mission.run_iteration()).collect()
        };

        assert!(matches!(
            outcomes[0],
            IterationOutcome::Failed { sequence: 1, category: "DisplayFault", .. }
        ));
        assert!(outcomes[1].is_success());
        assert_eq!(outcomes[1].sequence(), 2);
        // 行在告警之前已写入
        assert_eq!(counters(&path), vec![1, 2]);
        // failed iteration still sleeps the nominal plus secondary delay
        assert_eq!(clock.total_slept(), Duration::from_secs(8));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_position_fault_skips_row() {
        let path = temp_csv("position_fault.csv");
        let clock = ManualClock::new(start());
        let mut sensors = ScriptedSensors::new();
        let mut display = RecordingDisplay::default();
        let orbit = CircularOrbit {
            period_minutes: 0.0,
            ..CircularOrbit::iss(start(), 0.0)
        };

        let (outcomes, rows) = {
            let mut mission =
                build_with_orbit(&mut sensors, &mut display, &clock, &path, &config(60.0), orbit);
            let outcomes: Vec<IterationOutcome> = (0..2).map(|_| mission.run_iteration()).collect();
            (outcomes, mission.log.rows_written())
        };

        match &outcomes[0] {
            IterationOutcome::Failed { sequence, category, message } => {
                assert_eq!(*sequence, 1);
                assert_eq!(*category, "PositionFault");
                assert!(message.contains("orbital period"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        // 第二次迭代照常执行
        assert_eq!(outcomes[1].sequence(), 2);
        assert!(!outcomes[1].is_success());
        assert_eq!(rows, 0);
        assert!(counters(&path).is_empty());
        assert_eq!(clock.total_slept(), Duration::from_secs(8));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_summary_counts_events() {
        let path = temp_csv("summary.csv");
        let clock = ManualClock::new(start());
        let mut sensors = ScriptedSensors::new();
        sensors.motions.extend([true, false, true]);
        sensors.temperature_faults.extend([false, false, false, true]);
        let mut display = RecordingDisplay::default();

        let summary = {
            let mut mission = build(&mut sensors, &mut display, &clock, &path, &config(0.5));
            mission.run()
        };

        // 30 s: iterations start at 0 (+1 s hold), 5, 9 (+1 s hold), 14, 18, 22, 26
        assert_eq!(summary.motion_events, 2);
        assert_eq!(summary.failed_iterations, 1);
        assert_eq!(summary.iterations, 7);
        assert_eq!(summary.rows_written, 6);
        assert_eq!(summary.deviation_events, 0);
        std::fs::remove_file(&path).ok();
    }
}
