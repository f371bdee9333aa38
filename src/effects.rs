// Pointer effects: tilt settings, parallax and position-aware highlights.
// DOM writes stay in JS; this computes the numbers.

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Default parallax speed: 1px of travel per 100px of pointer distance.
pub const DEFAULT_PARALLAX_SPEED: f64 = 1.0 / 100.0;

/// Settings handed to the tilt library, keyed the way it expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltSettings {
    /// Maximum tilt rotation in degrees.
    pub max: f64,
    /// Transition speed in milliseconds.
    pub speed: u32,
    /// Transform perspective in pixels.
    pub perspective: u32,
    pub glare: bool,
    #[serde(rename = "max-glare")]
    pub max_glare: f64,
}

impl Default for TiltSettings {
    fn default() -> Self {
        TiltSettings {
            max: 10.0,
            speed: 2000,
            perspective: 500,
            glare: true,
            max_glare: 0.2,
        }
    }
}

/// Translation for a parallax element following the pointer.
///
/// Returns `None` on touch devices, where there is no hover pointer to follow.
pub fn parallax_offset(env: &Environment, pointer: PagePoint, speed: f64) -> Option<Offset> {
    if env.is_touch_device() {
        return None;
    }

    Some(Offset::new(
        (env.viewport.width as f64 - pointer.x) * speed,
        (env.viewport.height as f64 - pointer.y) * speed,
    ))
}

/// Pointer position relative to an element's top-left corner.
pub fn position_aware_offset(bounds: &ElementBounds, pointer: PagePoint) -> Offset {
    Offset::new(pointer.x - bounds.left, pointer.y - bounds.top)
}
