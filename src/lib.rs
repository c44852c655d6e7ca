// lib.rs — natural panoramic camera controls
//
// Dragging the pointer rotates the camera such that the world point under
// the cursor follows the cursor as it moves; releasing keeps the camera
// turning under friction-damped inertia. The host owns the window, the
// renderer and the event plumbing; this crate owns the geometry and the
// gesture state.
//
// Assumptions, as in any panorama viewer:
//   1) the camera sits at the origin;
//   2) up is +Y;
//   3) the unrotated camera looks through (0, 0, -1).
//
// Background on the projective geometry:
//   http://www.cse.psu.edu/~rtc12/CSE486/lecture12.pdf
//   http://www.cse.psu.edu/~rtc12/CSE486/lecture13.pdf

pub mod camera;
pub mod controls;
pub mod momentum;
pub mod solver;
pub mod transform;

pub use camera::{Camera, Viewport};
pub use controls::{ControlsConfig, PanoramaControls};
pub use solver::DeltaRotation;
