//! Spin animation state machine.
//!
//! A spin runs `Accelerating -> Cruising -> Decelerating` and then returns to
//! idle. Rotation is a pure function of elapsed time: the host calls
//! [`SpinAnimator::tick`] once per displayed frame with the frame timestamp,
//! and tests drive it with synthetic timestamps.
//!
//! The deceleration phase has no fixed deadline. Whenever the planned
//! deceleration time has run out while the wheel is still turning faster than
//! the rest threshold, the phase is stretched by a fixed step, up to a cap.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::SpinPhase;
use crate::winner;

/// One row of the duration-to-phase table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBand {
    /// Largest timer setting (whole seconds) this band applies to
    pub up_to_seconds: u32,
    /// Length of the acceleration phase
    pub accel_seconds: f64,
    /// Deceleration time subtracted from the timer when placing the cruise phase
    pub base_decel_seconds: f64,
    /// Additional slow-down time appended to the deceleration phase
    pub extra_slow_seconds: f64,
}

impl PhaseBand {
    const fn new(up_to_seconds: u32, accel: f64, base_decel: f64, extra_slow: f64) -> Self {
        Self {
            up_to_seconds,
            accel_seconds: accel,
            base_decel_seconds: base_decel,
            extra_slow_seconds: extra_slow,
        }
    }
}

/// Maps a timer setting to accel/decel phase lengths.
///
/// Longer timers get longer acceleration and deceleration. The default rows are
/// tuned by feel; the table is plain data so it can be overridden from config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTable {
    /// Bands sorted by `up_to_seconds`
    pub bands: Vec<PhaseBand>,
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self {
            bands: vec![
                PhaseBand::new(2, 1.0, 1.0, 1.0),
                PhaseBand::new(3, 1.0, 2.0, 1.0),
                PhaseBand::new(4, 2.0, 2.0, 2.0),
                PhaseBand::new(5, 2.0, 3.0, 2.0),
                PhaseBand::new(6, 2.0, 4.0, 2.0),
                PhaseBand::new(9, 3.0, 4.0, 3.0),
                PhaseBand::new(14, 3.0, 5.0, 4.0),
                PhaseBand::new(19, 3.0, 5.0, 5.0),
                PhaseBand::new(MAX_SPIN_SECONDS, 3.0, 5.0, 6.0),
            ],
        }
    }
}

impl PhaseTable {
    /// Phase lengths for a timer setting in whole seconds.
    ///
    /// Settings beyond the last band use the last band; an empty table falls
    /// back to one second per phase.
    pub fn lookup(&self, seconds: u32) -> PhaseTiming {
        let band = self
            .bands
            .iter()
            .find(|b| seconds <= b.up_to_seconds)
            .or_else(|| self.bands.last());
        match band {
            Some(b) => PhaseTiming {
                accel_ms: b.accel_seconds * 1000.0,
                base_decel_ms: b.base_decel_seconds * 1000.0,
                extra_slow_ms: b.extra_slow_seconds * 1000.0,
            },
            None => PhaseTiming {
                accel_ms: 1000.0,
                base_decel_ms: 1000.0,
                extra_slow_ms: 1000.0,
            },
        }
    }
}

/// Phase lengths in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTiming {
    /// Acceleration length
    pub accel_ms: f64,
    /// Base deceleration length
    pub base_decel_ms: f64,
    /// Extra slow-down length
    pub extra_slow_ms: f64,
}

impl PhaseTiming {
    /// Deceleration length before any extension.
    pub fn planned_decel_ms(&self) -> f64 {
        self.base_decel_ms + self.extra_slow_ms
    }
}

/// Thresholds governing when the wheel counts as resting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestLimits {
    /// Speed (deg/ms) under which the wheel is at rest
    pub speed_threshold: f64,
    /// Stretch added to the deceleration per evaluated frame
    pub extension_step_ms: f64,
    /// Maximum total stretch
    pub max_extension_ms: f64,
}

impl Default for RestLimits {
    fn default() -> Self {
        Self {
            speed_threshold: REST_SPEED_THRESHOLD,
            extension_step_ms: DECEL_EXTENSION_STEP_MS,
            max_extension_ms: MAX_DECEL_EXTENSION_MS,
        }
    }
}

/// Everything about a spin that is fixed when it starts. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    /// Rotation of the wheel when the spin began
    pub start_rotation: f64,
    /// Random target sweep (full turns plus offset)
    pub total_rotation: f64,
    /// Requested spin length after clamping
    pub duration_ms: f64,
    /// Acceleration phase length
    pub accel_ms: f64,
    /// Cruise length; zero or negative means the cruise phase is skipped
    pub cruise_ms: f64,
    /// Deceleration length before extension
    pub planned_decel_ms: f64,
    /// Sweep covered while accelerating
    pub accel_sweep: f64,
    /// Sweep covered while decelerating
    pub decel_sweep: f64,
    /// Speed reached at the end of acceleration, deg/ms
    pub peak_speed: f64,
}

impl SpinPlan {
    /// Plans a spin of `duration_seconds` (clamped to 2..=40) covering
    /// `total_rotation` degrees split evenly between ramp up and ramp down.
    pub fn new(
        duration_seconds: f64,
        start_rotation: f64,
        total_rotation: f64,
        table: &PhaseTable,
    ) -> Self {
        let seconds = duration_seconds.clamp(MIN_SPIN_SECONDS as f64, MAX_SPIN_SECONDS as f64);
        let timing = table.lookup(seconds.round() as u32);
        let duration_ms = seconds * 1000.0;
        let accel_ms = timing.accel_ms.max(1.0);
        let cruise_ms = duration_ms - accel_ms - timing.base_decel_ms;
        let accel_sweep = total_rotation * 0.5;
        Self {
            start_rotation,
            total_rotation,
            duration_ms,
            accel_ms,
            cruise_ms,
            planned_decel_ms: timing.planned_decel_ms().max(1.0),
            accel_sweep,
            decel_sweep: total_rotation * 0.5,
            // exit speed of the quadratic ease-in
            peak_speed: accel_sweep / (accel_ms / 2.0),
        }
    }

    /// Effective cruise length.
    pub fn cruise_duration(&self) -> f64 {
        self.cruise_ms.max(0.0)
    }

    /// Sweep covered while cruising.
    pub fn cruise_sweep(&self) -> f64 {
        self.peak_speed * self.cruise_duration()
    }

    /// Elapsed time at which deceleration begins.
    pub fn decel_start_ms(&self) -> f64 {
        self.accel_ms + self.cruise_duration()
    }

    /// Angular speed (deg/ms) of the cubic ease-out at progress `u` over a
    /// deceleration lasting `decel_total_ms`.
    pub fn decel_speed(&self, u: f64, decel_total_ms: f64) -> f64 {
        self.decel_sweep * 3.0 * (1.0 - u).powi(2) / decel_total_ms
    }
}

/// Per-frame output of the animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinFrame {
    /// Wheel rotation normalised to `[0, 360)`
    pub rotation: f64,
    /// Phase the frame was computed in
    pub phase: SpinPhase,
    /// Instantaneous angular speed, deg/ms
    pub speed: f64,
    /// Sector under the pointer
    pub segment: Option<usize>,
    /// Whether the pointer entered a new sector since the previous frame
    pub tick: bool,
}

/// Final result of a spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinResult {
    /// Resting rotation, normalised to `[0, 360)`
    pub final_rotation: f64,
    /// Index of the winning drawable entry
    pub winner: Option<usize>,
}

/// Transient state of a spin in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinState {
    /// Fixed parameters
    pub plan: SpinPlan,
    /// Timestamp of the first frame, ms
    pub started_at_ms: f64,
    /// Stretch added to the deceleration so far
    pub decel_extension_ms: f64,
    /// Phase of the most recent frame
    pub phase: SpinPhase,
    /// Sector under the pointer at the most recent frame
    pub last_segment: Option<usize>,
}

impl SpinState {
    /// Starts a spin at `now_ms`.
    pub fn new(plan: SpinPlan, now_ms: f64, weights: &[u32]) -> Self {
        Self {
            plan,
            started_at_ms: now_ms,
            decel_extension_ms: 0.0,
            phase: SpinPhase::Accelerating,
            last_segment: winner::segment_at(plan.start_rotation, weights),
        }
    }

    /// Computes the frame at `now_ms`.
    ///
    /// Pure: returns the successor state, the frame, and whether the spin
    /// continues. When it does not, the successor state is in
    /// [`SpinPhase::Idle`] and the frame holds the resting rotation.
    pub fn advance(&self, now_ms: f64, weights: &[u32], limits: &RestLimits) -> (SpinState, SpinFrame, bool) {
        let plan = &self.plan;
        let mut next = self.clone();
        let elapsed = (now_ms - self.started_at_ms).max(0.0);

        let (raw_rotation, phase, mut speed) = if elapsed < plan.accel_ms {
            let t = elapsed / plan.accel_ms;
            (
                plan.start_rotation + plan.accel_sweep * t * t,
                SpinPhase::Accelerating,
                plan.peak_speed * t,
            )
        } else if plan.cruise_ms > 0.0 && elapsed < plan.accel_ms + plan.cruise_ms {
            (
                plan.start_rotation + plan.accel_sweep + plan.peak_speed * (elapsed - plan.accel_ms),
                SpinPhase::Cruising,
                plan.peak_speed,
            )
        } else {
            let decel_elapsed = elapsed - plan.decel_start_ms();
            let decel_total = plan.planned_decel_ms + next.decel_extension_ms;
            let u = (decel_elapsed / decel_total).clamp(0.0, 1.0);
            let ease = 1.0 - (1.0 - u).powi(3);
            let speed = plan.decel_speed(u, decel_total);
            if decel_elapsed >= plan.planned_decel_ms
                && speed > limits.speed_threshold
                && next.decel_extension_ms < limits.max_extension_ms
            {
                next.decel_extension_ms += limits.extension_step_ms;
            }
            (
                plan.start_rotation + plan.accel_sweep + plan.cruise_sweep() + plan.decel_sweep * ease,
                SpinPhase::Decelerating,
                speed,
            )
        };

        let decel_elapsed = (elapsed - plan.decel_start_ms()).max(0.0);
        let decel_total = plan.planned_decel_ms + next.decel_extension_ms;
        let keep_running = if decel_elapsed < decel_total {
            true
        } else {
            let u = (decel_elapsed / decel_total).clamp(0.0, 1.0);
            speed = plan.decel_speed(u, decel_total);
            if speed > limits.speed_threshold && next.decel_extension_ms < limits.max_extension_ms {
                next.decel_extension_ms += limits.extension_step_ms;
                true
            } else {
                false
            }
        };

        let segment = winner::segment_at(raw_rotation, weights);
        let tick = segment != next.last_segment;
        next.last_segment = segment;
        next.phase = if keep_running { phase } else { SpinPhase::Idle };

        let frame = SpinFrame {
            rotation: raw_rotation.rem_euclid(360.0),
            phase,
            speed,
            segment,
            tick,
        };
        (next, frame, keep_running)
    }
}

/// Outcome of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new spin began
    Started,
    /// A spin is already running; nothing changed
    AlreadySpinning,
    /// The wheel has no entries; nothing changed
    NoEntries,
}

/// Result of a single animator tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinUpdate {
    /// The frame to draw
    pub frame: SpinFrame,
    /// Set on the terminal frame
    pub finished: Option<SpinResult>,
}

/// Drives spins for the host's frame loop.
///
/// Only one spin can run at a time: a start request while spinning is a
/// no-op and returns [`StartOutcome::AlreadySpinning`]. Spins cannot be
/// cancelled.
#[derive(Debug, Clone, Default)]
pub struct SpinAnimator {
    state: Option<SpinState>,
    table: PhaseTable,
    limits: RestLimits,
}

impl SpinAnimator {
    /// Creates an idle animator with the default phase table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle animator with a custom phase table.
    pub fn with_table(table: PhaseTable) -> Self {
        Self {
            table,
            ..Self::default()
        }
    }

    /// Whether a spin is in progress.
    pub fn is_spinning(&self) -> bool {
        self.state.is_some()
    }

    /// Current phase.
    pub fn phase(&self) -> SpinPhase {
        self.state.as_ref().map_or(SpinPhase::Idle, |s| s.phase)
    }

    /// State of the spin in progress.
    pub fn state(&self) -> Option<&SpinState> {
        self.state.as_ref()
    }

    /// Phase table in use.
    pub fn table(&self) -> &PhaseTable {
        &self.table
    }

    /// Starts a spin with a random target of 5 to 9 full turns plus a random
    /// offset in `[0, 360)` degrees.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        current_rotation: f64,
        duration_seconds: f64,
        weights: &[u32],
        rng: &mut R,
    ) -> StartOutcome {
        let turns = rng.gen_range(MIN_FULL_TURNS..MAX_FULL_TURNS) as f64;
        let offset = rng.gen::<f64>() * 360.0;
        self.start_with_rotation(
            now_ms,
            current_rotation,
            duration_seconds,
            turns * 360.0 + offset,
            weights,
        )
    }

    /// Starts a spin with an explicit target sweep in degrees.
    pub fn start_with_rotation(
        &mut self,
        now_ms: f64,
        current_rotation: f64,
        duration_seconds: f64,
        total_rotation: f64,
        weights: &[u32],
    ) -> StartOutcome {
        if self.state.is_some() {
            log::debug!("spin requested while spinning; ignored");
            return StartOutcome::AlreadySpinning;
        }
        if weights.is_empty() {
            log::debug!("spin requested with no entries; ignored");
            return StartOutcome::NoEntries;
        }
        let plan = SpinPlan::new(duration_seconds, current_rotation, total_rotation, &self.table);
        log::info!(
            "spin started: {:.0} degrees over {:.0} ms (accel {:.0}, cruise {:.0}, decel {:.0})",
            total_rotation,
            plan.duration_ms,
            plan.accel_ms,
            plan.cruise_duration(),
            plan.planned_decel_ms
        );
        self.state = Some(SpinState::new(plan, now_ms, weights));
        StartOutcome::Started
    }

    /// Advances the spin to `now_ms`. Returns `None` when idle.
    pub fn tick(&mut self, now_ms: f64, weights: &[u32]) -> Option<SpinUpdate> {
        let state = self.state.as_ref()?;
        let (next, frame, keep_running) = state.advance(now_ms, weights, &self.limits);

        if frame.tick {
            log::debug!("pointer entered sector {:?}", frame.segment);
        }

        if keep_running {
            self.state = Some(next);
            return Some(SpinUpdate {
                frame,
                finished: None,
            });
        }

        self.state = None;
        let result = SpinResult {
            final_rotation: frame.rotation,
            winner: winner::resolve_winner(frame.rotation, weights),
        };
        log::info!(
            "spin finished at {:.2} degrees after {:.0} ms extension, winner {:?}",
            result.final_rotation,
            next.decel_extension_ms,
            result.winner
        );
        Some(SpinUpdate {
            frame,
            finished: Some(result),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FRAME_MS: f64 = 16.0;

    /// Runs a spin to completion at a fixed frame rate.
    fn run_to_end(animator: &mut SpinAnimator, weights: &[u32]) -> (Vec<SpinFrame>, SpinResult) {
        let mut frames = Vec::new();
        let mut now = 0.0;
        loop {
            now += FRAME_MS;
            let update = animator.tick(now, weights).expect("spin should be running");
            frames.push(update.frame);
            if let Some(result) = update.finished {
                return (frames, result);
            }
            assert!(now < 120_000.0, "spin did not terminate");
        }
    }

    #[test]
    fn test_phase_table_lookup() {
        let table = PhaseTable::default();
        assert_eq!(table.lookup(2).accel_ms, 1000.0);
        assert_eq!(table.lookup(3).base_decel_ms, 2000.0);
        assert_eq!(table.lookup(8).extra_slow_ms, 3000.0);
        assert_eq!(table.lookup(10).planned_decel_ms(), 9000.0);
        assert_eq!(table.lookup(17).extra_slow_ms, 5000.0);
        assert_eq!(table.lookup(40).extra_slow_ms, 6000.0);
        assert_eq!(table.lookup(99).extra_slow_ms, 6000.0);
        assert_eq!(PhaseTable { bands: vec![] }.lookup(5).accel_ms, 1000.0);
    }

    #[test]
    fn test_longer_timers_get_longer_ramps() {
        let table = PhaseTable::default();
        let mut previous = 0.0;
        for seconds in MIN_SPIN_SECONDS..=MAX_SPIN_SECONDS {
            let timing = table.lookup(seconds);
            let ramps = timing.accel_ms + timing.planned_decel_ms();
            assert!(ramps >= previous, "ramps shrink at {seconds}s");
            previous = ramps;
        }
    }

    #[test]
    fn test_plan_clamps_duration_and_skips_cruise() {
        let plan = SpinPlan::new(0.5, 0.0, 2000.0, &PhaseTable::default());
        assert_eq!(plan.duration_ms, 2000.0);
        assert!(plan.cruise_ms <= 0.0);
        assert_eq!(plan.cruise_sweep(), 0.0);

        let long = SpinPlan::new(90.0, 0.0, 2000.0, &PhaseTable::default());
        assert_eq!(long.duration_ms, 40_000.0);
        assert_eq!(long.cruise_ms, 40_000.0 - 3000.0 - 5000.0);
        assert_eq!(long.peak_speed, 1000.0 / 1500.0);
    }

    #[test]
    fn test_acceleration_is_quadratic() {
        let mut animator = SpinAnimator::new();
        assert_eq!(
            animator.start_with_rotation(0.0, 10.0, 10.0, 3600.0, &[1, 1]),
            StartOutcome::Started
        );
        // accel is 3000 ms for a 10 s timer; halfway covers a quarter of the accel sweep
        let update = animator.tick(1500.0, &[1, 1]).unwrap();
        assert_eq!(update.frame.phase, SpinPhase::Accelerating);
        let expected: f64 = 10.0 + 1800.0 * 0.25;
        assert!((update.frame.rotation - expected.rem_euclid(360.0)).abs() < 1e-9);
    }

    #[test]
    fn test_cruise_runs_at_peak_speed() {
        let mut animator = SpinAnimator::new();
        animator.start_with_rotation(0.0, 0.0, 10.0, 3600.0, &[1]);
        let plan = animator.state().unwrap().plan;

        let a = animator.tick(3500.0, &[1]).unwrap().frame;
        let b = animator.tick(3600.0, &[1]).unwrap().frame;
        assert_eq!(a.phase, SpinPhase::Cruising);
        assert_eq!(b.speed, plan.peak_speed);
        let moved = (b.rotation - a.rotation).rem_euclid(360.0);
        assert!((moved - (plan.peak_speed * 100.0).rem_euclid(360.0)).abs() < 1e-6);
    }

    #[test]
    fn test_short_timer_never_cruises() {
        let mut animator = SpinAnimator::new();
        animator.start_with_rotation(0.0, 0.0, 2.0, 2000.0, &[1, 2, 3]);
        let (frames, _) = run_to_end(&mut animator, &[1, 2, 3]);
        assert!(frames.iter().all(|f| f.phase != SpinPhase::Cruising));
        assert!(frames.iter().any(|f| f.phase == SpinPhase::Decelerating));
    }

    #[test]
    fn test_start_without_entries_is_noop() {
        let mut animator = SpinAnimator::new();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            animator.start(0.0, 0.0, 10.0, &[], &mut rng),
            StartOutcome::NoEntries
        );
        assert!(!animator.is_spinning());
        assert!(animator.tick(16.0, &[]).is_none());
    }

    #[test]
    fn test_reentrant_start_leaves_state_unchanged() {
        let mut animator = SpinAnimator::new();
        let mut rng = StdRng::seed_from_u64(9);
        let weights = [1, 2];
        animator.start(0.0, 0.0, 5.0, &weights, &mut rng);
        animator.tick(500.0, &weights);
        let before = animator.state().cloned();

        let outcome = animator.start(600.0, 123.0, 30.0, &weights, &mut rng);

        assert_eq!(outcome, StartOutcome::AlreadySpinning);
        assert_eq!(animator.state().cloned(), before);
    }

    #[test]
    fn test_advance_is_pure() {
        let plan = SpinPlan::new(6.0, 45.0, 2500.0, &PhaseTable::default());
        let state = SpinState::new(plan, 100.0, &[1, 1, 1]);
        let limits = RestLimits::default();
        let first = state.advance(4321.0, &[1, 1, 1], &limits);
        let second = state.advance(4321.0, &[1, 1, 1], &limits);
        assert_eq!(first, second);
        assert_eq!(state.decel_extension_ms, 0.0);
    }

    #[test]
    fn test_deceleration_terminates_for_every_duration() {
        let mut rng = StdRng::seed_from_u64(77);
        let weights = [1, 4, 2, 7];
        for seconds in MIN_SPIN_SECONDS..=MAX_SPIN_SECONDS {
            for _ in 0..3 {
                let mut animator = SpinAnimator::new();
                animator.start(0.0, rng.gen_range(0.0..360.0), seconds as f64, &weights, &mut rng);
                let plan = animator.state().unwrap().plan;
                let (frames, result) = run_to_end(&mut animator, &weights);

                let last = frames.last().unwrap();
                assert!(last.speed < REST_SPEED_THRESHOLD, "{seconds}s ended at speed {}", last.speed);
                let bound = plan.decel_start_ms() + plan.planned_decel_ms + MAX_DECEL_EXTENSION_MS + 2.0 * FRAME_MS;
                assert!(frames.len() as f64 * FRAME_MS <= bound);
                assert!((0.0..360.0).contains(&result.final_rotation));
                assert_eq!(result.winner, winner::resolve_winner(result.final_rotation, &weights));
                assert!(!animator.is_spinning());
                assert_eq!(animator.phase(), SpinPhase::Idle);
            }
        }
    }

    #[test]
    fn test_spin_lands_on_planned_sweep() {
        let mut animator = SpinAnimator::new();
        animator.start_with_rotation(0.0, 30.0, 4.0, 2000.0, &[1, 1]);
        let plan = animator.state().unwrap().plan;
        let (_, result) = run_to_end(&mut animator, &[1, 1]);
        let expected = (30.0 + 2000.0 + plan.cruise_sweep()).rem_euclid(360.0);
        assert!((result.final_rotation - expected).abs() < 1e-6);
    }

    #[test]
    fn test_ticks_fire_on_sector_crossings_only() {
        let weights = [1, 1, 1, 1];
        let mut animator = SpinAnimator::new();
        animator.start_with_rotation(0.0, 1.0, 3.0, 1800.0 + 45.0, &weights);
        let (frames, _) = run_to_end(&mut animator, &weights);

        let mut previous = winner::segment_at(1.0, &weights);
        let mut expected_ticks = 0;
        for frame in &frames {
            let changed = frame.segment != previous;
            assert_eq!(frame.tick, changed);
            if changed {
                expected_ticks += 1;
            }
            previous = frame.segment;
        }
        assert!(expected_ticks > 0);

        let mut single = SpinAnimator::new();
        single.start_with_rotation(0.0, 0.0, 2.0, 1800.0, &[3]);
        let (frames, _) = run_to_end(&mut single, &[3]);
        assert!(frames.iter().all(|f| !f.tick));
    }
}
