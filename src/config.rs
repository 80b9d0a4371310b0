//! Editor configuration parsed from environment variables.

use tracing::warn;

use crate::camera::ScaleBounds;
use crate::consts::{DEFAULT_HISTORY_SIZE, DEFAULT_ICON_SIZE, DEFAULT_PIN_COLOR, DEFAULT_PIN_PREFIX, PIN_HIT_RADIUS_PX};

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Maximum number of commands kept by the undo history.
    pub history_size: usize,
    /// Viewport zoom limits.
    pub scale: ScaleBounds,
    /// Prefix of auto-generated pin names.
    pub pin_prefix: String,
    /// Screen-space pick radius for pins and the relocation shadow.
    pub pin_hit_radius_px: f64,
    /// Color given to newly placed pins.
    pub pin_color: String,
    /// Icon size given to newly placed pins.
    pub pin_icon_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            scale: ScaleBounds::default(),
            pin_prefix: DEFAULT_PIN_PREFIX.to_string(),
            pin_hit_radius_px: PIN_HIT_RADIUS_PX,
            pin_color: DEFAULT_PIN_COLOR.to_string(),
            pin_icon_size: DEFAULT_ICON_SIZE,
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `WORLD_EDITOR_HISTORY_SIZE`: default 50, must be at least 1
    /// - `WORLD_EDITOR_MIN_SCALE` / `WORLD_EDITOR_MAX_SCALE`: default 0.5 / 3.0
    /// - `WORLD_EDITOR_PIN_PREFIX`: default `"Pin "`
    /// - `WORLD_EDITOR_PIN_HIT_RADIUS`: default 12 (screen pixels)
    /// - `WORLD_EDITOR_PIN_COLOR`: default `#D94B4B`
    /// - `WORLD_EDITOR_PIN_ICON_SIZE`: default 24 (map units)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut history_size = env_parse("WORLD_EDITOR_HISTORY_SIZE", defaults.history_size);
        if history_size == 0 {
            warn!("WORLD_EDITOR_HISTORY_SIZE must be at least 1; using default");
            history_size = defaults.history_size;
        }

        let mut scale = ScaleBounds {
            min: env_parse("WORLD_EDITOR_MIN_SCALE", defaults.scale.min),
            max: env_parse("WORLD_EDITOR_MAX_SCALE", defaults.scale.max),
        };
        if !(scale.min > 0.0 && scale.min <= scale.max && scale.max.is_finite()) {
            warn!(min = scale.min, max = scale.max, "invalid viewport scale bounds; using defaults");
            scale = defaults.scale;
        }

        let mut pin_hit_radius_px = env_parse("WORLD_EDITOR_PIN_HIT_RADIUS", defaults.pin_hit_radius_px);
        if !(pin_hit_radius_px > 0.0 && pin_hit_radius_px.is_finite()) {
            warn!(pin_hit_radius_px, "invalid pin hit radius; using default");
            pin_hit_radius_px = defaults.pin_hit_radius_px;
        }

        Self {
            history_size,
            scale,
            pin_prefix: std::env::var("WORLD_EDITOR_PIN_PREFIX").unwrap_or(defaults.pin_prefix),
            pin_hit_radius_px,
            pin_color: std::env::var("WORLD_EDITOR_PIN_COLOR").unwrap_or(defaults.pin_color),
            pin_icon_size: env_parse("WORLD_EDITOR_PIN_ICON_SIZE", defaults.pin_icon_size),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key).map_or(default, |v| v.trim().parse::<T>().unwrap_or(default))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
