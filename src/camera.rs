//! Viewport controller: pan/zoom state and screen <-> map coordinate conversion.
//!
//! Every conversion from a pointer position into map space goes through
//! [`Viewport::to_world`], so placement, relocation, and rendering agree on
//! which map point sits under a given pixel. All operations are pure: they
//! return a new [`Viewport`] and leave applying it to the caller.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FIT_MARGIN, MAX_SCALE, MIN_SCALE, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

/// A point in either screen or map space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite (not NaN or infinite).
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp into the rectangle `[0, bounds.width] x [0, bounds.height]`.
    #[must_use]
    pub fn clamp_to(self, bounds: Size) -> Self {
        Self {
            x: self.x.clamp(0.0, bounds.width.max(0.0)),
            y: self.y.clamp(0.0, bounds.height.max(0.0)),
        }
    }

    /// Whether the point lies inside `[0, bounds.width] x [0, bounds.height]`.
    #[must_use]
    pub fn within(self, bounds: Size) -> bool {
        (0.0..=bounds.width).contains(&self.x) && (0.0..=bounds.height).contains(&self.y)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height, in whichever space the caller is working in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Direction of a single zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Map a wheel `deltaY` to a zoom step. Scrolling up zooms in; a zero delta is no step.
    #[must_use]
    pub fn from_wheel(delta_y: f64) -> Option<Self> {
        if delta_y < 0.0 {
            Some(Self::In)
        } else if delta_y > 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }

    fn factor(self) -> f64 {
        match self {
            Self::In => ZOOM_IN_FACTOR,
            Self::Out => ZOOM_OUT_FACTOR,
        }
    }
}

/// Inclusive scale limits for a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self { min: MIN_SCALE, max: MAX_SCALE }
    }
}

impl ScaleBounds {
    #[must_use]
    pub fn clamp(self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

/// Viewport state for pan/zoom over the map.
///
/// `offset_x` / `offset_y` are in screen pixels; `scale` is screen pixels per
/// map unit and always lies within the configured [`ScaleBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point to map coordinates.
    #[must_use]
    pub fn to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Convert a map-space point to screen coordinates.
    #[must_use]
    pub fn to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.offset_x,
            y: world.y * self.scale + self.offset_y,
        }
    }

    /// Convert a screen-space distance (pixels) to a map-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Zoom one step toward `pointer` using the default scale bounds.
    #[must_use]
    pub fn zoom_at(&self, pointer: Point, direction: ZoomDirection) -> Self {
        self.zoom_at_within(pointer, direction, ScaleBounds::default())
    }

    /// Zoom one step toward `pointer`, keeping the map point under the pointer fixed on screen.
    ///
    /// When the scale is already pinned at a bound the viewport is returned unchanged.
    #[must_use]
    pub fn zoom_at_within(&self, pointer: Point, direction: ZoomDirection, bounds: ScaleBounds) -> Self {
        let anchor = self.to_world(pointer);
        let scale = bounds.clamp(self.scale * direction.factor());
        Self {
            scale,
            offset_x: pointer.x - anchor.x * scale,
            offset_y: pointer.y - anchor.y * scale,
        }
    }

    /// Shift the view by a screen-space delta. Panning is never clamped.
    #[must_use]
    pub fn pan(&self, dx: f64, dy: f64) -> Self {
        Self {
            scale: self.scale,
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
        }
    }

    /// Fit `content` into `viewport` using the default scale bounds.
    #[must_use]
    pub fn fit_to_content(content: Size, viewport: Size) -> Self {
        Self::fit_to_content_within(content, viewport, ScaleBounds::default())
    }

    /// Scale `content` to fill 90% of `viewport` (never beyond the max scale) and center it.
    ///
    /// Degenerate content dimensions contribute no constraint to the fit ratio.
    #[must_use]
    pub fn fit_to_content_within(content: Size, viewport: Size, bounds: ScaleBounds) -> Self {
        let ratio = |view: f64, extent: f64| if extent > 0.0 { view / extent } else { bounds.max };
        let fitted = ratio(viewport.width, content.width)
            .min(ratio(viewport.height, content.height))
            .min(bounds.max)
            * FIT_MARGIN;
        let scale = fitted.max(bounds.min);
        Self {
            scale,
            offset_x: (viewport.width - content.width * scale) / 2.0,
            offset_y: (viewport.height - content.height * scale) / 2.0,
        }
    }
}
