//! Shared numeric constants for the editor.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed viewport scale.
pub const MIN_SCALE: f64 = 0.5;

/// Largest allowed viewport scale.
pub const MAX_SCALE: f64 = 3.0;

/// Scale multiplier applied per zoom-in wheel step.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Scale multiplier applied per zoom-out wheel step.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Fraction of the viewport that fitted content occupies.
pub const FIT_MARGIN: f64 = 0.9;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space pick radius around a pin center, in pixels.
pub const PIN_HIT_RADIUS_PX: f64 = 12.0;

/// Screen-space slop around a road segment, in pixels.
pub const ROAD_HIT_SLOP_PX: f64 = 6.0;

/// Pointer travel (screen pixels) below which a press-release counts as a click.
pub const CLICK_SLOP_PX: f64 = 3.0;

// ── Defaults ────────────────────────────────────────────────────

/// Default number of commands retained by the history.
pub const DEFAULT_HISTORY_SIZE: usize = 50;

/// Prefix of auto-generated pin names ("Pin 01", "Pin 02", ...).
pub const DEFAULT_PIN_PREFIX: &str = "Pin ";

/// Fill color given to newly placed pins.
pub const DEFAULT_PIN_COLOR: &str = "#D94B4B";

/// Icon size given to newly placed pins, in map units.
pub const DEFAULT_ICON_SIZE: f64 = 24.0;
