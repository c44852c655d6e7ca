// controls.rs — pointer gesture state machine
//
// Dragging the pointer rotates the camera so that the world point grabbed
// under the cursor follows the cursor; releasing hands the last observed
// angular velocity to a friction decay. Host contract: forward pointer
// events as they arrive and call `update` once per rendered frame, all on
// one thread. Event handlers only touch the pending sample and the state
// tag; the geometry runs inside `update`.

use std::time::Instant;

use glam::Vec2;

use crate::camera::{Camera, Viewport};
use crate::momentum::{self, MomentumEpisode, VelocityTracker};
use crate::solver::{self, DeltaRotation};

#[derive(Debug, Clone, Copy)]
pub struct ControlsConfig {
    /// Keep rotating under friction after release. When false the camera
    /// stops dead on pointer-up.
    pub damping_enabled: bool,
    /// Kinetic friction coefficient, rad/ms^2.
    pub friction: f64,
    /// Velocity estimate clamp, rad/ms.
    pub max_rotational_speed: f64,
    /// Solver acceptance bound per tick, radians.
    pub max_step: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping_enabled: true,
            friction: momentum::FRICTION,
            max_rotational_speed: momentum::MAX_ROTATIONAL_SPEED,
            max_step: solver::DEFAULT_MAX_STEP,
        }
    }
}

/// Exactly one of these holds at a time. Pixel samples live only inside
/// `Panning`, a momentum episode only inside `Decaying`.
#[derive(Debug)]
enum PanState {
    Rest,
    Panning {
        /// Baseline sample of the current drag segment. `None` until the
        /// first update tick consumes the pending current sample.
        initial: Option<Vec2>,
        current: Vec2,
    },
    Decaying(MomentumEpisode),
}

pub struct PanoramaControls {
    /// When false, pointer events and update ticks are ignored wholesale;
    /// the camera freezes without the host tearing anything down.
    pub enabled: bool,
    config: ControlsConfig,
    state: PanState,
    velocity: VelocityTracker,
    epoch: Instant,
}

impl PanoramaControls {
    pub fn new(config: ControlsConfig) -> Self {
        Self {
            enabled: true,
            config,
            state: PanState::Rest,
            velocity: VelocityTracker::default(),
            epoch: Instant::now(),
        }
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ControlsConfig {
        &mut self.config
    }

    pub fn is_at_rest(&self) -> bool {
        matches!(self.state, PanState::Rest)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, PanState::Panning { .. })
    }

    pub fn is_decaying(&self) -> bool {
        matches!(self.state, PanState::Decaying(_))
    }

    /// Pointer pressed at `pos` (pixels, surface-relative). Also cancels an
    /// in-flight decay: grabbing the scene stops it.
    pub fn pointer_down(&mut self, pos: Vec2) {
        if !self.enabled {
            return;
        }
        self.state = PanState::Panning {
            initial: None,
            current: pos,
        };
    }

    /// Pointer moved. Only records the pending sample; the rotation for it
    /// is computed on the next update tick.
    pub fn pointer_move(&mut self, pos: Vec2) {
        if !self.enabled {
            return;
        }
        if let PanState::Panning { current, .. } = &mut self.state {
            *current = pos;
        }
    }

    /// Pointer released. Hands off to the friction decay when damping is
    /// enabled, otherwise back to rest. Ignored unless panning.
    pub fn pointer_up(&mut self, now: Instant) {
        if !self.enabled {
            return;
        }
        if !matches!(self.state, PanState::Panning { .. }) {
            return;
        }
        self.velocity.reset_clock();
        self.state = if self.config.damping_enabled {
            let release_ms = self.clock_ms(now);
            PanState::Decaying(MomentumEpisode::new(
                release_ms,
                self.velocity.yaw(),
                self.velocity.pitch(),
            ))
        } else {
            PanState::Rest
        };
    }

    /// Per-frame tick. Mutates the camera's yaw/pitch and nothing else.
    pub fn update(&mut self, camera: &mut Camera, viewport: Viewport, now: Instant) {
        if !self.enabled {
            return;
        }
        let now_ms = self.clock_ms(now);
        match &mut self.state {
            PanState::Rest => {}
            PanState::Panning { initial, current } => {
                let Some(from) = *initial else {
                    // First tick of a drag segment: seed the baseline and
                    // do not rotate, otherwise the cursor-down position
                    // itself would cause a jump.
                    *initial = Some(*current);
                    return;
                };
                if let Some(delta) =
                    solver::solve_delta(camera, viewport, from, *current, self.config.max_step)
                {
                    apply_delta(camera, delta);
                    self.velocity.observe(
                        delta.yaw as f64,
                        delta.pitch as f64,
                        now_ms,
                        self.config.max_rotational_speed,
                    );
                }
                // Solver failure contributes no rotation this tick; either
                // way the baseline slides forward.
                *initial = Some(*current);
            }
            PanState::Decaying(episode) => {
                let (yaw, pitch) = episode.advance(now_ms, self.config.friction);
                apply_delta(
                    camera,
                    DeltaRotation {
                        pitch: pitch as f32,
                        yaw: yaw as f32,
                    },
                );
                if yaw.abs() <= momentum::SETTLE_EPSILON && pitch.abs() <= momentum::SETTLE_EPSILON
                {
                    self.state = PanState::Rest;
                }
            }
        }
    }

    fn clock_ms(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.epoch).as_secs_f64() * 1000.0
    }
}

/// Adds a delta to the camera orientation. When the normalized pitch says
/// the camera is inverted (looking past the zenith or nadir), the yaw
/// increment flips sign so that horizontal drag keeps feeling consistent
/// to the viewer.
fn apply_delta(camera: &mut Camera, delta: DeltaRotation) {
    use std::f32::consts::{FRAC_PI_2, TAU};
    let phi = camera.pitch.rem_euclid(TAU);
    let upside_down = phi > FRAC_PI_2 && phi < 3.0 * FRAC_PI_2;
    if upside_down {
        camera.yaw -= delta.yaw;
    } else {
        camera.yaw += delta.yaw;
    }
    camera.pitch += delta.pitch;
}
