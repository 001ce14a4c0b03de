use crate::geometry::Point3d;

/// Camera describes the pinhole camera used for the single-point perspective transform. `depth`
/// is the distance from the eye to the projection plane, i.e. 1 / tan(fov / 2).
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub depth: f64,
}

/// Viewport is the pixel size of the render target.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// ScreenPoint holds the projected coordinates of a world point. `w` is the projected half width
/// of the road at that point. Coordinates are rounded to whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenPoint {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    pub w: f64,
}

/// ProjectedPoint combines the camera-relative coordinates and the screen coordinates of a point.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectedPoint {
    pub camera: Point3d,
    pub screen: ScreenPoint,
}

/// project transforms a world point into camera and screen space:
/// * `scale = depth / camera.z`
/// * `x = width / 2 + scale * camera.x * width / 2`
/// * `y = height / 2 - scale * camera.y * height / 2`
/// * `w = scale * road_width * width / 2`
///
/// A point lying exactly in the camera plane gets a scale of 0.0 so that it is never drawn.
pub fn project(world: &Point3d, camera: &Camera, viewport: &Viewport, road_width: f64) -> ProjectedPoint {
    let cam = world.sub(&Point3d {
        x: camera.x,
        y: camera.y,
        z: camera.z,
    });

    let scale = if cam.z == 0.0 { 0.0 } else { camera.depth / cam.z };
    let half_w = viewport.width / 2.0;
    let half_h = viewport.height / 2.0;

    ProjectedPoint {
        camera: cam,
        screen: ScreenPoint {
            scale,
            x: (half_w + scale * cam.x * half_w).round(),
            y: (half_h - scale * cam.y * half_h).round(),
            w: (scale * road_width * half_w).round(),
        },
    }
}
