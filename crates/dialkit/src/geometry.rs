use thiserror::Error;

/// Distance between the drawn ring and the widget edge.
pub const DIAL_PADDING: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("dial size must be a positive finite number, got {0}")]
    InvalidSize(f64),
    #[error("dial radius must be a positive finite number, got {0}")]
    InvalidRadius(f64),
    #[error("ring thickness must be a non-negative finite number, got {0}")]
    InvalidThickness(f64),
    #[error("dial center must be finite, got ({}, {})", .0.x, .0.y)]
    InvalidCenter(Point),
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if a >= 360.0 { 0.0 } else { a }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let delta = normalize_degrees(to) - normalize_degrees(from);
    if delta > 180.0 {
        delta - 360.0
    } else if delta <= -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

pub fn step_to_angle(step: usize, steps: usize) -> f64 {
    (step as f64 / steps as f64) * 360.0
}

/// Quantizes a clockwise-from-top angle into one of `steps` positions.
pub fn angle_to_step(angle: f64, steps: usize) -> usize {
    let step = (normalize_degrees(angle) / 360.0 * steps as f64).round() as usize;
    step % steps
}

/// Point on a circle for a clockwise-from-top angle in degrees.
pub fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    let rad = (angle - 90.0).to_radians();
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

/// On-screen placement of a dial: ring center, ring radius and the half-width
/// of the band that accepts pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub center: Point,
    pub radius: f64,
    pub ring_thickness: f64,
}

impl DialGeometry {
    pub fn new(center: Point, radius: f64, ring_thickness: f64) -> Result<Self, GeometryError> {
        if !center.is_finite() {
            return Err(GeometryError::InvalidCenter(center));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        if !ring_thickness.is_finite() || ring_thickness < 0.0 {
            return Err(GeometryError::InvalidThickness(ring_thickness));
        }
        Ok(Self {
            center,
            radius,
            ring_thickness,
        })
    }

    /// Geometry for a square widget of `size` pixels with the ring inset by
    /// [`DIAL_PADDING`].
    pub fn from_size(size: f64, ring_thickness: f64) -> Result<Self, GeometryError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(GeometryError::InvalidSize(size));
        }
        let half = size / 2.0;
        Self::new(Point::new(half, half), half - DIAL_PADDING, ring_thickness)
    }

    pub fn inner_radius(&self) -> f64 {
        self.radius - self.ring_thickness
    }

    pub fn outer_radius(&self) -> f64 {
        self.radius + self.ring_thickness
    }

    pub fn contains(&self, p: Point) -> bool {
        let dist = self.center.distance_to(p);
        dist >= self.inner_radius() && dist <= self.outer_radius()
    }

    /// Pointer angle in degrees, 0 at the top, increasing clockwise.
    pub fn pointer_angle(&self, p: Point) -> f64 {
        let (dx, dy) = (p.x - self.center.x, p.y - self.center.y);
        normalize_degrees(dy.atan2(dx).to_degrees() + 90.0)
    }

    /// Step under the pointer, or `None` when the pointer is off the ring.
    pub fn step_at(&self, p: Point, steps: usize) -> Option<usize> {
        self.contains(p)
            .then(|| angle_to_step(self.pointer_angle(p), steps))
    }

    pub fn indicator(&self, angle: f64) -> Point {
        point_on_circle(self.center, self.radius, angle)
    }
}
