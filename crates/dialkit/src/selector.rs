use crate::geometry::{self, DialGeometry, GeometryError, Point};
use thiserror::Error;

/// Fraction of the remaining angular distance covered per animation frame.
pub const STIFFNESS: f64 = 0.22;
/// Residual below which the animated angle snaps onto its target.
pub const SNAP_THRESHOLD: f64 = 0.5;
/// Scroll magnitude that amounts to one step.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum SelectorError {
    #[error("a dial needs at least one step")]
    ZeroSteps,
    #[error("scroll threshold must be a positive finite number, got {0}")]
    InvalidScrollThreshold(f64),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStatus {
    Moving,
    Settled,
}

/// Everything a renderer needs to draw one dial for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialFrame {
    pub value: usize,
    pub steps: usize,
    pub hover_step: Option<usize>,
    pub animated_angle: f64,
    pub center: Point,
    pub radius: f64,
    pub ring_thickness: f64,
    pub dragging: bool,
}

impl DialFrame {
    pub fn indicator(&self) -> Point {
        geometry::point_on_circle(self.center, self.radius, self.animated_angle)
    }

    pub fn hover_indicator(&self) -> Option<Point> {
        self.hover_step.map(|step| {
            geometry::point_on_circle(
                self.center,
                self.radius,
                geometry::step_to_angle(step, self.steps),
            )
        })
    }

    pub fn progress_fraction(&self) -> f64 {
        self.animated_angle / 360.0
    }
}

/// Circular dial input. Maps pointer and wheel input onto one of `steps`
/// positions around a ring and eases its indicator toward the committed value.
///
/// The committed value belongs to the caller: input methods return the step
/// they want committed and the caller pushes it back with [`set_value`].
///
/// [`set_value`]: AngularSelector::set_value
#[derive(Debug, Clone)]
pub struct AngularSelector {
    steps: usize,
    value: usize,
    geometry: DialGeometry,
    animated_angle: f64,
    hover_step: Option<usize>,
    dragging: bool,
    scroll_accumulator: f64,
    scroll_threshold: f64,
}

impl AngularSelector {
    pub fn new(steps: usize, value: usize, geometry: DialGeometry) -> Result<Self, SelectorError> {
        if steps == 0 {
            return Err(SelectorError::ZeroSteps);
        }
        let value = value % steps;
        Ok(Self {
            steps,
            value,
            geometry,
            animated_angle: geometry::step_to_angle(value, steps),
            hover_step: None,
            dragging: false,
            scroll_accumulator: 0.0,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        })
    }

    pub fn with_scroll_threshold(mut self, threshold: f64) -> Result<Self, SelectorError> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(SelectorError::InvalidScrollThreshold(threshold));
        }
        self.scroll_threshold = threshold;
        Ok(self)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn value(&self) -> usize {
        self.value
    }

    pub fn hover_step(&self) -> Option<usize> {
        self.hover_step
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn geometry(&self) -> &DialGeometry {
        &self.geometry
    }

    pub fn target_angle(&self) -> f64 {
        geometry::step_to_angle(self.value, self.steps)
    }

    pub fn animated_angle(&self) -> f64 {
        self.animated_angle
    }

    pub fn is_settled(&self) -> bool {
        self.animated_angle == self.target_angle()
    }

    /// Accepts a value committed by the owner. Returns `true` when the
    /// indicator now has somewhere to travel.
    pub fn set_value(&mut self, value: usize) -> bool {
        self.value = value % self.steps;
        !self.is_settled()
    }

    /// Moves the dial to new on-screen dimensions and snaps the indicator
    /// onto the committed value.
    pub fn resize(&mut self, geometry: DialGeometry) {
        self.geometry = geometry;
        self.hover_step = None;
        self.dragging = false;
        self.animated_angle = self.target_angle();
    }

    pub fn step_at(&self, p: Point) -> Option<usize> {
        self.geometry.step_at(p, self.steps)
    }

    /// Starts a drag gesture when the press lands on the ring and returns the
    /// step to commit.
    pub fn pointer_down(&mut self, p: Point) -> Option<usize> {
        let step = self.step_at(p)?;
        self.dragging = true;
        self.hover_step = Some(step);
        Some(step)
    }

    /// Hover preview when idle. While dragging, every move that lands on the
    /// ring is a commit; moves off the ring commit nothing but keep the drag.
    pub fn pointer_move(&mut self, p: Point) -> Option<usize> {
        self.hover_step = self.step_at(p);
        if self.dragging { self.hover_step } else { None }
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn pointer_leave(&mut self) {
        if !self.dragging {
            self.hover_step = None;
        }
    }

    /// Feeds a wheel delta (positive = up). Returns the value to commit once
    /// the accumulated magnitude crosses one or more thresholds.
    pub fn scroll(&mut self, delta: f64) -> Option<usize> {
        if !delta.is_finite() {
            return None;
        }
        self.scroll_accumulator += delta;

        let mut net: i64 = 0;
        while self.scroll_accumulator >= self.scroll_threshold {
            self.scroll_accumulator -= self.scroll_threshold;
            net += 1;
        }
        while self.scroll_accumulator <= -self.scroll_threshold {
            self.scroll_accumulator += self.scroll_threshold;
            net -= 1;
        }

        (net != 0).then(|| self.offset(net))
    }

    fn offset(&self, delta: i64) -> usize {
        let steps = self.steps as i64;
        (self.value as i64 + delta).rem_euclid(steps) as usize
    }

    /// Advances the indicator by one animation frame.
    pub fn tick_animation(&mut self) -> AnimationStatus {
        let target = geometry::normalize_degrees(self.target_angle());
        let current = geometry::normalize_degrees(self.animated_angle);
        let delta = geometry::shortest_delta(current, target);

        if delta.abs() < SNAP_THRESHOLD {
            self.animated_angle = target;
            return AnimationStatus::Settled;
        }

        self.animated_angle = geometry::normalize_degrees(current + delta * STIFFNESS);
        AnimationStatus::Moving
    }

    pub fn frame(&self) -> DialFrame {
        DialFrame {
            value: self.value,
            steps: self.steps,
            hover_step: self.hover_step,
            animated_angle: self.animated_angle,
            center: self.geometry.center,
            radius: self.geometry.radius,
            ring_thickness: self.geometry.ring_thickness,
            dragging: self.dragging,
        }
    }
}
