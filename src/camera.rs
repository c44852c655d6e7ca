// camera.rs — yaw/pitch camera state and pinhole intrinsics

use glam::{EulerRot, Quat};

/// Physical film-back width, in millimetres (35 mm full frame). Film-plane
/// coordinates are expressed in these units; only ratios against the focal
/// length ever reach the geometry, so the gauge itself is arbitrary.
const FILM_GAUGE: f32 = 35.0;

/// Camera fixed at the origin, looking down -Z when unrotated, with +Y up.
///
/// Orientation is yaw about world Y, then pitch about the yaw-rotated X
/// (YXZ order). Roll is held at zero so the horizon never tilts; it is not
/// stored at all. The controller only ever *adds* to yaw and pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
}

impl Camera {
    pub fn new(fov_y: f32, aspect: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            fov_y,
            aspect,
        }
    }

    pub fn film_width(&self) -> f32 {
        FILM_GAUGE * self.aspect.min(1.0)
    }

    pub fn film_height(&self) -> f32 {
        FILM_GAUGE / self.aspect.max(1.0)
    }

    /// Focal length in film units, derived from the vertical field of view.
    pub fn focal_length(&self) -> f32 {
        0.5 * self.film_height() / (0.5 * self.fov_y).tan()
    }

    /// Current orientation as a quaternion (camera-to-world rotation).
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Pixel size of the render surface. The host updates this on resize; the
/// controller only reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn focal_length_matches_field_of_view() {
        // The ray through the top edge of the film must make an angle of
        // fov_y / 2 with the optical axis.
        let camera = Camera::new(60f32.to_radians(), 16.0 / 9.0);
        let half_angle = (0.5 * camera.film_height() / camera.focal_length()).atan();
        assert!((half_angle - 30f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn landscape_film_back_fills_the_gauge_width() {
        let camera = Camera::new(60f32.to_radians(), 800.0 / 600.0);
        assert_eq!(camera.film_width(), 35.0);
        assert!((camera.film_height() - 26.25).abs() < 1e-4);
    }

    #[test]
    fn unrotated_camera_looks_down_negative_z() {
        let camera = Camera::new(60f32.to_radians(), 1.0);
        let forward = camera.orientation() * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn yaw_turns_the_forward_axis_about_world_up() {
        let mut camera = Camera::new(60f32.to_radians(), 1.0);
        camera.yaw = std::f32::consts::FRAC_PI_2;
        let forward = camera.orientation() * Vec3::NEG_Z;
        // Positive yaw is a counter-clockwise turn seen from +Y.
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
    }
}
