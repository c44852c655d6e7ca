// solver.rs — delta-rotation solver
//
// Given two pixel samples from the same drag segment, finds the yaw/pitch
// rotation that keeps the world point grabbed at the first sample under the
// cursor at the second. Derivation: write the final camera-space direction,
// rotated back by (-dpitch, -dyaw) in YXZ order with second-order
// small-angle expansions, and require it to reproduce the initial
// direction. Matching the Y component gives a quadratic in dpitch; with
// dpitch known, matching X gives a quadratic in dyaw.
//
// https://math.stackexchange.com/questions/2385860/natural-panoramic-camera-controls

use glam::Vec2;

use crate::camera::{Camera, Viewport};
use crate::transform;

/// Small-angle acceptance bound on each root, radians (~23 degrees). A
/// tuning constant sized to plausible per-tick drag rotation, not a hard
/// geometric limit; override through `ControlsConfig::max_step`.
pub const DEFAULT_MAX_STEP: f32 = 0.4;

/// Below this the quadratic's leading coefficient is treated as zero and
/// the equation solved as linear.
const DEGENERATE_EPS: f32 = 1e-7;

/// A per-tick orientation increment, same YXZ yaw/pitch/roll convention as
/// [`Camera`] (roll identically zero), so callers simply add components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaRotation {
    pub pitch: f32,
    pub yaw: f32,
}

/// Solves `a*x^2 + b*x + c = 0` and returns the first root within the
/// acceptance bound, trying `(-b + sqrt(disc)) / 2a` before
/// `(-b - sqrt(disc)) / 2a`. The other root is the non-physical branch: it
/// also satisfies the constraint algebraically but swings the camera most
/// of the way around instead of nudging it.
fn accepted_root(a: f32, b: f32, c: f32, max_step: f32) -> Option<f32> {
    if a.abs() < DEGENERATE_EPS {
        // Linear. Happens whenever the final sample lands exactly on a
        // viewport center line (y2 or x2 == 0).
        if b.abs() < DEGENERATE_EPS {
            return None;
        }
        let x = -c / b;
        return (x.abs() <= max_step).then_some(x);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    [(-b + sqrt_disc) / (2.0 * a), (-b - sqrt_disc) / (2.0 * a)]
        .into_iter()
        .find(|x| x.abs() <= max_step)
}

/// Computes the rotation that moves the world direction under pixel `xi` to
/// pixel `xf`. Returns `None` when no root of either quadratic lies within
/// `max_step` — either the discriminant went negative or the drag step was
/// too large for the small-angle expansion. Callers are expected to skip
/// the tick rather than guess; the next tick starts from a fresh baseline.
pub fn solve_delta(
    camera: &Camera,
    viewport: Viewport,
    xi: Vec2,
    xf: Vec2,
    max_step: f32,
) -> Option<DeltaRotation> {
    let vi = transform::pixels_to_camera(camera, viewport, xi).normalize();
    let vf = transform::pixels_to_camera(camera, viewport, xf).normalize();

    let (x1, y1) = (vi.x, vi.y);
    let (x2, y2, z2) = (vf.x, vf.y, vf.z);

    let pitch = accepted_root(-y2 / 2.0, -z2, y2 - y1, max_step)?;
    let yaw = accepted_root(
        -x2 / 2.0,
        pitch * y2 + z2 * (1.0 - pitch * pitch / 2.0),
        x2 - x1,
        max_step,
    )?;

    Some(DeltaRotation { pitch, yaw })
}
