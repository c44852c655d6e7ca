// transform.rs — coordinate transform pipeline
//
// Four spaces, with an invertible mapping between each neighbouring pair:
//
//   pixels  <->  film-2D  <->  film-3D  <->  camera-3D  <->  world-3D
//
// Pixels have their origin in the top-left of the viewport with Y growing
// downward; film coordinates are centred on the optical axis with Y growing
// upward. Film-3D is the film plane placed at depth z = -1 in front of the
// pinhole. Every function re-reads the camera on each call; nothing about
// the orientation is cached, since the whole point of the solver is to work
// out how much that orientation must change.

use glam::{Vec2, Vec3};

use crate::camera::{Camera, Viewport};

pub fn pixels_to_film2(camera: &Camera, viewport: Viewport, p: Vec2) -> Vec2 {
    let ox = viewport.width / 2.0;
    let oy = viewport.height / 2.0;
    let sx = viewport.width / camera.film_width();
    let sy = -viewport.height / camera.film_height();
    Vec2::new((p.x - ox) / sx, (p.y - oy) / sy)
}

pub fn film2_to_pixels(camera: &Camera, viewport: Viewport, v: Vec2) -> Vec2 {
    let ox = viewport.width / 2.0;
    let oy = viewport.height / 2.0;
    let sx = viewport.width / camera.film_width();
    let sy = -viewport.height / camera.film_height();
    Vec2::new(sx * v.x + ox, sy * v.y + oy)
}

pub fn film2_to_film3(v: Vec2) -> Vec3 {
    Vec3::new(v.x, v.y, -1.0)
}

pub fn film3_to_film2(v: Vec3) -> Vec2 {
    v.truncate()
}

pub fn film3_to_camera(camera: &Camera, v: Vec3) -> Vec3 {
    let f = camera.focal_length();
    Vec3::new(v.x / f, v.y / f, v.z)
}

pub fn camera_to_film3(camera: &Camera, v: Vec3) -> Vec3 {
    let f = camera.focal_length();
    Vec3::new(f * v.x, f * v.y, v.z)
}

pub fn camera_to_world(camera: &Camera, v: Vec3) -> Vec3 {
    camera.orientation() * v
}

pub fn world_to_camera(camera: &Camera, v: Vec3) -> Vec3 {
    camera.orientation().inverse() * v
}

/// Un-normalized camera-space ray through the given pixel.
pub fn pixels_to_camera(camera: &Camera, viewport: Viewport, p: Vec2) -> Vec3 {
    film3_to_camera(camera, film2_to_film3(pixels_to_film2(camera, viewport, p)))
}

/// World-space ray through the given pixel, under the camera's current
/// orientation.
pub fn pixels_to_world(camera: &Camera, viewport: Viewport, p: Vec2) -> Vec3 {
    camera_to_world(camera, pixels_to_camera(camera, viewport, p))
}

/// Projects a world-space direction back onto the viewport. The inverse of
/// [`pixels_to_world`] up to scale; directions behind the camera (z >= 0 in
/// camera space) have no meaningful projection.
pub fn world_to_pixels(camera: &Camera, viewport: Viewport, dir: Vec3) -> Vec2 {
    let v = world_to_camera(camera, dir);
    // Perspective divide onto the z = -1 film plane.
    let v = v / -v.z;
    film2_to_pixels(camera, viewport, film3_to_film2(camera_to_film3(camera, v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Camera, Viewport) {
        // 800x600 with a 90 degree horizontal field of view.
        let aspect = 800.0 / 600.0;
        let fov_y = 2.0 * (std::f32::consts::FRAC_PI_4.tan() / aspect).atan();
        (Camera::new(fov_y, aspect), Viewport::new(800.0, 600.0))
    }

    #[test]
    fn pixels_film2_round_trip() {
        let (camera, viewport) = fixture();
        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(400.0, 300.0),
            Vec2::new(123.0, 456.0),
            Vec2::new(799.0, 1.0),
        ] {
            let back = film2_to_pixels(&camera, viewport, pixels_to_film2(&camera, viewport, p));
            assert!((back - p).length() < 1e-3, "{p:?} -> {back:?}");
        }
    }

    #[test]
    fn film2_film3_round_trip() {
        let v = Vec2::new(3.5, -1.25);
        assert_eq!(film3_to_film2(film2_to_film3(v)), v);
        assert_eq!(film2_to_film3(v).z, -1.0);
    }

    #[test]
    fn camera_film3_round_trip() {
        let (camera, _) = fixture();
        let v = Vec3::new(0.25, -0.5, -1.0);
        let back = film3_to_camera(&camera, camera_to_film3(&camera, v));
        assert!((back - v).length() < 1e-6);
    }

    #[test]
    fn world_camera_round_trip() {
        let (mut camera, _) = fixture();
        camera.yaw = 1.1;
        camera.pitch = -0.4;
        let v = Vec3::new(0.3, 0.8, -0.6);
        let back = world_to_camera(&camera, camera_to_world(&camera, v));
        assert!((back - v).length() < 1e-5);
    }

    #[test]
    fn center_pixel_is_the_optical_axis() {
        let (camera, viewport) = fixture();
        let dir = pixels_to_camera(&camera, viewport, Vec2::new(400.0, 300.0)).normalize();
        assert!((dir - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn screen_axes_map_to_camera_axes() {
        let (camera, viewport) = fixture();
        // Right of center is +X; *above* center (smaller pixel Y) is +Y.
        let right = pixels_to_camera(&camera, viewport, Vec2::new(500.0, 300.0));
        let above = pixels_to_camera(&camera, viewport, Vec2::new(400.0, 200.0));
        assert!(right.x > 0.0 && right.y.abs() < 1e-6);
        assert!(above.y > 0.0 && above.x.abs() < 1e-6);
    }

    #[test]
    fn right_viewport_edge_sits_at_half_the_horizontal_fov() {
        let (camera, viewport) = fixture();
        let dir = pixels_to_camera(&camera, viewport, Vec2::new(800.0, 300.0)).normalize();
        // Horizontal FOV is 90 degrees, so the edge ray is 45 degrees out.
        let angle = dir.x.atan2(-dir.z);
        assert!((angle - std::f32::consts::FRAC_PI_4).abs() < 1e-4);
    }

    #[test]
    fn world_projection_inverts_the_pixel_ray() {
        let (mut camera, viewport) = fixture();
        camera.yaw = 0.7;
        camera.pitch = 0.2;
        for p in [
            Vec2::new(400.0, 300.0),
            Vec2::new(150.0, 450.0),
            Vec2::new(620.0, 90.0),
        ] {
            let world = pixels_to_world(&camera, viewport, p).normalize();
            let back = world_to_pixels(&camera, viewport, world);
            assert!((back - p).length() < 1e-2, "{p:?} -> {back:?}");
        }
    }
}
