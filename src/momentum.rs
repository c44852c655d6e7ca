// momentum.rs — friction kinematics and angular-velocity estimation
//
// Each rotational axis is modelled independently as a point mass
// decelerating under constant kinetic friction from the angular velocity it
// had at the instant the drag ended. The decay is evaluated in closed form
// per tick over disjoint time intervals; nothing is integrated numerically.
// Times are milliseconds, velocities rad/ms, all f64.

/// Kinetic friction coefficient, rad/ms^2.
pub const FRICTION: f64 = 2.75e-6;

/// Velocity clamp, rad/ms (one full turn per second). Guards the estimate
/// against division by a near-zero frame time.
pub const MAX_ROTATIONAL_SPEED: f64 = std::f64::consts::TAU / 1000.0;

/// Once both axis deltas fall below this in the same tick, inertial motion
/// is considered settled.
pub const SETTLE_EPSILON: f64 = 1e-5;

/// Distance covered over `[ti, tf]` by a point that started at `t0` with
/// speed `v0` and decelerates at `2*uk`, i.e. `v(t) = v0 - 2*uk*(t - t0)`.
/// Clamped at zero: friction cannot push you backward. Magnitude only; the
/// caller reapplies the sign of the release velocity.
pub fn friction_displacement(t0: f64, ti: f64, tf: f64, v0: f64, uk: f64) -> f64 {
    let ti0 = ti - t0;
    let tf0 = tf - t0;
    // tf0^2 - ti0^2, factored so the large squares never meet.
    (v0 * (tf0 - ti0) - uk * (tf0 - ti0) * (tf0 + ti0)).max(0.0)
}

/// Last-observed yaw/pitch rates while a drag is active.
///
/// Estimates survive until overwritten, so a release on a tick whose own
/// delta was zero still hands the most recent non-zero rates to the decay.
#[derive(Debug, Default)]
pub struct VelocityTracker {
    last_tick_ms: Option<f64>,
    yaw: f64,
    pitch: f64,
}

impl VelocityTracker {
    /// Folds one applied rotation delta into the estimate. The first call
    /// after a [`reset_clock`](Self::reset_clock) only records the
    /// timestamp; a repeated timestamp (`dt == 0`) keeps the previous
    /// estimate rather than dividing by zero.
    pub fn observe(&mut self, yaw_delta: f64, pitch_delta: f64, now_ms: f64, max_speed: f64) {
        if let Some(last) = self.last_tick_ms {
            let dt = now_ms - last;
            if dt != 0.0 {
                if yaw_delta != 0.0 {
                    self.yaw = (yaw_delta / dt).clamp(-max_speed, max_speed);
                }
                if pitch_delta != 0.0 {
                    self.pitch = (pitch_delta / dt).clamp(-max_speed, max_speed);
                }
            }
        }
        self.last_tick_ms = Some(now_ms);
    }

    pub fn reset_clock(&mut self) {
        self.last_tick_ms = None;
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }
}

/// One post-release decay, from the instant the pointer came up until both
/// axes settle. Holds the release instant `t0`, the previous tick instant
/// `ti` and the velocity snapshot taken at release; each call to
/// [`advance`](Self::advance) integrates the next disjoint sub-interval.
#[derive(Debug, Clone, Copy)]
pub struct MomentumEpisode {
    t0: f64,
    ti: f64,
    yaw_v0: f64,
    pitch_v0: f64,
}

impl MomentumEpisode {
    pub fn new(release_ms: f64, yaw_v0: f64, pitch_v0: f64) -> Self {
        Self {
            t0: release_ms,
            ti: release_ms,
            yaw_v0,
            pitch_v0,
        }
    }

    /// Yaw/pitch deltas accumulated since the previous tick, with the sign
    /// of the release velocity restored. Advances `ti` to `tf`.
    pub fn advance(&mut self, tf: f64, uk: f64) -> (f64, f64) {
        let yaw = self.yaw_v0.signum()
            * friction_displacement(self.t0, self.ti, tf, self.yaw_v0.abs(), uk);
        let pitch = self.pitch_v0.signum()
            * friction_displacement(self.t0, self.ti, tf, self.pitch_v0.abs(), uk);
        self.ti = tf;
        (yaw, pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displacement_is_never_negative() {
        for tf in [0.0, 10.0, 500.0, 2_000.0, 60_000.0] {
            assert!(friction_displacement(0.0, 0.0, tf, MAX_ROTATIONAL_SPEED, FRICTION) >= 0.0);
        }
    }

    #[test]
    fn motion_stops_exactly_at_v0_over_2uk() {
        let v0 = MAX_ROTATIONAL_SPEED;
        let t_stop = v0 / (2.0 * FRICTION);
        // Anything integrated entirely past the stop time contributes
        // nothing, and a straddling interval whose tail past the stop
        // outweighs the head clamps to zero instead of going negative.
        assert_eq!(friction_displacement(0.0, t_stop, t_stop + 100.0, v0, FRICTION), 0.0);
        assert_eq!(friction_displacement(0.0, t_stop - 1.0, t_stop + 100.0, v0, FRICTION), 0.0);
        // Up to the stop itself the remaining motion is still positive.
        assert!(friction_displacement(0.0, t_stop - 1.0, t_stop, v0, FRICTION) > 0.0);
    }

    #[test]
    fn per_tick_deltas_decay_monotonically_to_zero() {
        let v0 = MAX_ROTATIONAL_SPEED;
        let mut episode = MomentumEpisode::new(0.0, v0, 0.0);
        let mut previous = f64::INFINITY;
        let mut settled_at = None;
        for tick in 1..=200 {
            let (yaw, pitch) = episode.advance(tick as f64 * 16.0, FRICTION);
            assert_eq!(pitch, 0.0);
            assert!(yaw >= 0.0);
            assert!(yaw < previous || yaw == 0.0, "tick {tick}: {yaw} !< {previous}");
            previous = yaw;
            if yaw <= SETTLE_EPSILON {
                settled_at = Some(tick);
                break;
            }
        }
        // v0 / 2uk is ~1142 ms, i.e. 72 ticks of 16 ms.
        let settled_at = settled_at.expect("decay must settle");
        assert!((60..=80).contains(&settled_at), "settled at tick {settled_at}");
    }

    #[test]
    fn release_velocity_sign_is_preserved() {
        let mut episode = MomentumEpisode::new(0.0, -3e-3, 2e-3);
        let (yaw, pitch) = episode.advance(16.0, FRICTION);
        assert!(yaw < 0.0);
        assert!(pitch > 0.0);
    }

    #[test]
    fn disjoint_intervals_sum_to_the_whole() {
        let v0 = 4e-3;
        let whole = friction_displacement(0.0, 0.0, 400.0, v0, FRICTION);
        let mut split = 0.0;
        let mut episode = MomentumEpisode::new(0.0, v0, 0.0);
        for tick in 1..=25 {
            split += episode.advance(tick as f64 * 16.0, FRICTION).0;
        }
        assert!((whole - split).abs() < 1e-12);
    }

    #[test]
    fn tracker_estimates_and_clamps() {
        let mut tracker = VelocityTracker::default();
        tracker.observe(0.016, 0.008, 0.0, MAX_ROTATIONAL_SPEED);
        // First observation only starts the clock.
        assert_eq!(tracker.yaw(), 0.0);
        tracker.observe(0.016, -0.008, 16.0, MAX_ROTATIONAL_SPEED);
        assert!((tracker.yaw() - 1e-3).abs() < 1e-12);
        assert!((tracker.pitch() + 5e-4).abs() < 1e-12);
        // A spike over a 1 ms frame hits the clamp.
        tracker.observe(1.0, 0.0, 17.0, MAX_ROTATIONAL_SPEED);
        assert_eq!(tracker.yaw(), MAX_ROTATIONAL_SPEED);
    }

    #[test]
    fn zero_dt_and_zero_delta_keep_the_previous_estimate() {
        let mut tracker = VelocityTracker::default();
        tracker.observe(0.016, 0.016, 0.0, MAX_ROTATIONAL_SPEED);
        tracker.observe(0.016, 0.016, 16.0, MAX_ROTATIONAL_SPEED);
        let yaw = tracker.yaw();
        assert!(yaw > 0.0);
        // Same timestamp: skipped outright.
        tracker.observe(0.5, 0.5, 16.0, MAX_ROTATIONAL_SPEED);
        assert_eq!(tracker.yaw(), yaw);
        // Zero delta on one axis: that axis keeps its estimate.
        tracker.observe(0.0, 0.008, 32.0, MAX_ROTATIONAL_SPEED);
        assert_eq!(tracker.yaw(), yaw);
        assert!(tracker.pitch() > 0.0);
    }
}
