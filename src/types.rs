// Strong typing over strings. Newtypes and enums for viewport extents, sizes and policies.
// Shapes here are what crosses the JS↔WASM boundary as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ResponsiveError;

/// Viewport size in CSS pixels, as reported by JS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        ViewportSize { width, height }
    }

    /// Extent along one axis.
    pub fn extent(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }
}

/// Axis a resolver watches and sizes along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Width => "width",
            Dimension::Height => "height",
        }
    }
}

/// Size as the caller supplies it: `{ width?: number, height?: number }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SizeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl SizeSpec {
    pub fn width(width: f64) -> Self {
        SizeSpec {
            width: Some(width),
            height: None,
        }
    }

    pub fn height(height: f64) -> Self {
        SizeSpec {
            width: None,
            height: Some(height),
        }
    }

    /// Validate that exactly one axis is set.
    pub fn validate(&self) -> Result<TargetSize, ResponsiveError> {
        let size = match (self.width, self.height) {
            (Some(width), None) => TargetSize::Width(width),
            (None, Some(height)) => TargetSize::Height(height),
            (None, None) => {
                return Err(ResponsiveError::InvalidConfiguration(
                    "Either width or height must be provided".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(ResponsiveError::InvalidConfiguration(
                    "Only one of width or height may be provided".to_string(),
                ))
            }
        };

        if !size.value().is_finite() {
            return Err(ResponsiveError::InvalidConfiguration(format!(
                "{} must be a finite number",
                size.dimension().as_str()
            )));
        }

        Ok(size)
    }
}

/// A resolved size along exactly one axis.
/// Serializes as `{"width": 400.0}` or `{"height": 300.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSize {
    Width(f64),
    Height(f64),
}

impl TargetSize {
    pub fn new(dimension: Dimension, value: f64) -> Self {
        match dimension {
            Dimension::Width => TargetSize::Width(value),
            Dimension::Height => TargetSize::Height(value),
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            TargetSize::Width(_) => Dimension::Width,
            TargetSize::Height(_) => Dimension::Height,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            TargetSize::Width(v) | TargetSize::Height(v) => *v,
        }
    }
}

/// How a binding reacts when breakpoint queries flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// Recompute the first matching query once per viewport change.
    #[default]
    Recompute,
    /// Apply a size per flipped query: queries leaving their range ascending,
    /// queries entering it descending. Intermediate sizes are visible when one
    /// change crosses several thresholds.
    PerQuery,
}

/// What a `CardLayout` hands back to JS for one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// `{"width": ..}` / `{"height": ..}` objects for `setSize`.
    #[default]
    Size,
    /// Card renderer scale factors for `setScale`.
    Scale,
}

/// Host capabilities injected at setup. Nothing in the engine reads browser globals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Environment {
    #[serde(default)]
    pub viewport: ViewportSize,
    /// `'ontouchstart' in window`.
    #[serde(default)]
    pub has_touch_events: bool,
    /// `navigator.maxTouchPoints`.
    #[serde(default)]
    pub max_touch_points: u32,
}

impl Environment {
    pub fn new(viewport: ViewportSize) -> Self {
        Environment {
            viewport,
            has_touch_events: false,
            max_touch_points: 0,
        }
    }

    pub fn is_touch_device(&self) -> bool {
        self.has_touch_events || self.max_touch_points > 0
    }
}

/// Responsive binding configuration passed from JS.
///
/// ```json
/// {
///   "breakpoints": { "500": 100, "600": 200, "700": 250, "800": 300 },
///   "fallback": { "width": 400 },
///   "policy": "recompute",
///   "target": "size"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsiveConfig {
    /// Threshold in CSS pixels (a JSON object key, fractions allowed) to size.
    #[serde(default)]
    pub breakpoints: BTreeMap<String, f64>,
    pub fallback: SizeSpec,
    #[serde(default)]
    pub policy: UpdatePolicy,
    #[serde(default)]
    pub target: TargetKind,
}

impl ResponsiveConfig {
    /// Breakpoint table with numeric thresholds.
    pub fn table(&self) -> Result<Vec<(f64, f64)>, ResponsiveError> {
        self.breakpoints
            .iter()
            .map(|(key, size)| {
                key.trim()
                    .parse::<f64>()
                    .map(|threshold| (threshold, *size))
                    .map_err(|_| {
                        ResponsiveError::InvalidConfiguration(format!(
                            "breakpoint key {:?} is not a number",
                            key
                        ))
                    })
            })
            .collect()
    }
}

/// Pointer position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

impl PagePoint {
    pub fn new(x: f64, y: f64) -> Self {
        PagePoint { x, y }
    }
}

/// Element bounds from `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ElementBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        ElementBounds {
            left,
            top,
            width,
            height,
        }
    }
}

/// Pixel offset applied as a CSS translation or absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Offset { x, y }
    }
}
