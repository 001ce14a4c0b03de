use approx::ulps_eq;

// 2D ----------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub fn shift(&self, other: &Vector2d) -> Point2d {
        Point2d {
            x: self.x + other.dx,
            y: self.y + other.dy,
        }
    }
}

impl PartialEq for Point2d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.x, other.x) && ulps_eq!(self.y, other.y)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Vector2d {
    pub dx: f64,
    pub dy: f64,
}

impl Vector2d {
    /// from_heading returns the vector of the given length pointing into the heading direction
    /// (radians, measured from the x axis).
    pub fn from_heading(heading: f64, length: f64) -> Vector2d {
        Vector2d {
            dx: heading.cos() * length,
            dy: heading.sin() * length,
        }
    }
}

impl PartialEq for Vector2d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.dx, other.dx) && ulps_eq!(self.dy, other.dy)
    }
}

/// BoundingBox2d is the axis-aligned extent of a point cloud.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox2d {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox2d {
    /// The method returns None for an empty point cloud.
    pub fn from_points(points: &[Point2d]) -> Option<BoundingBox2d> {
        let first = points.first()?;

        Some(points.iter().fold(
            BoundingBox2d {
                x_min: first.x,
                x_max: first.x,
                y_min: first.y,
                y_max: first.y,
            },
            |bb, p| BoundingBox2d {
                x_min: bb.x_min.min(p.x),
                x_max: bb.x_max.max(p.x),
                y_min: bb.y_min.min(p.y),
                y_max: bb.y_max.max(p.y),
            },
        ))
    }
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
    pub fn center(&self) -> Point2d {
        Point2d {
            x: (self.x_min + self.x_max) / 2.0,
            y: (self.y_min + self.y_max) / 2.0,
        }
    }
}

// 3D ----------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub fn sub(&self, other: &Point3d) -> Point3d {
        Point3d {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl PartialEq for Point3d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.x, other.x) && ulps_eq!(self.y, other.y) && ulps_eq!(self.z, other.z)
    }
}
