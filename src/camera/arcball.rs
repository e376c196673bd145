//! Virtual trackball: 2D pointer drags → 3D orientation.
//!
//! The pointer is projected onto a unit sphere centered in the viewport.
//! During a drag the orientation is always the shortest arc from the
//! drag-start point to the current point, composed with the orientation
//! captured when the drag began. Nothing is accumulated frame to frame, so
//! long drags do not drift.

use glam::{Quat, Vec2, Vec3};

/// Arcball rotation controller.
///
/// Two states: idle and dragging. The first [`update`](Self::update) after
/// construction, [`stop`](Self::stop) or [`reset`](Self::reset) anchors a
/// new drag; later updates rotate relative to that anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcBall {
    screen_size: Vec2,
    center: Vec2,
    radius: f32,

    initial: Quat,
    previous: Quat,
    current: Quat,

    dragging: bool,
    /// Sphere point under the pointer when the drag started.
    from: Vec3,
}

impl ArcBall {
    /// Create an arcball for a `width` × `height` viewport resting at
    /// `base`.
    #[must_use]
    pub fn new(width: u32, height: u32, base: Quat) -> Self {
        let mut arcball = Self {
            screen_size: Vec2::ZERO,
            center: Vec2::ZERO,
            radius: 0.0,
            initial: Quat::IDENTITY,
            previous: Quat::IDENTITY,
            current: Quat::IDENTITY,
            dragging: false,
            from: Vec3::Z,
        };
        arcball.init(width, height, base);
        arcball
    }

    /// Re-initialize: new viewport, new base orientation, idle.
    pub fn init(&mut self, width: u32, height: u32, base: Quat) {
        self.set_screen_size(width, height);
        self.initial = base;
        self.previous = base;
        self.current = base;
        self.dragging = false;
    }

    /// Feed the pointer position while the button is held.
    ///
    /// The first call of a gesture only anchors it and snapshots the
    /// baseline. Returns `true` when the orientation changed.
    pub fn update(&mut self, pointer: Vec2) -> bool {
        if !self.dragging {
            self.from = self.map_to_sphere(pointer);
            self.previous = self.current;
            self.dragging = true;
            return false;
        }

        let to = self.map_to_sphere(pointer);
        let arc = Quat::from_rotation_arc(self.from, to);
        self.current = (arc * self.previous).normalize();
        true
    }

    /// End the drag; the last orientation becomes the resting one.
    pub fn stop(&mut self) {
        self.dragging = false;
        self.previous = self.current;
    }

    /// Snap back to the orientation given at construction. The drag flag is
    /// left alone.
    pub fn reset(&mut self) {
        self.previous = self.initial;
        self.current = self.initial;
    }

    /// Current orientation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.current
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Recompute center and radius for a new viewport.
    ///
    /// Must follow every viewport change; an in-progress drag keeps its
    /// anchor.
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
        let half = self.screen_size * 0.5;
        self.center = half;
        self.radius = half.x.min(half.y);
    }

    /// Viewport size last passed to [`set_screen_size`](Self::set_screen_size).
    #[must_use]
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    /// Projection center (viewport center).
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Sphere radius in pixels.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Map a screen point onto the unit sphere.
    ///
    /// Points inside the projected circle land on the front hemisphere;
    /// points outside clamp to the equator. A degenerate viewport maps
    /// everything to the pole.
    #[must_use]
    pub fn map_to_sphere(&self, pointer: Vec2) -> Vec3 {
        if self.radius <= 0.0 {
            return Vec3::Z;
        }
        let p = (pointer - self.center) / (self.radius * 2.0);
        let len_sq = p.length_squared();
        if len_sq > 1.0 {
            let p = p.normalize();
            Vec3::new(p.x, p.y, 0.0)
        } else {
            Vec3::new(p.x, p.y, (1.0 - len_sq).sqrt()).normalize()
        }
    }
}
