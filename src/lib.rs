// card_layout_core: Rust/WASM engine for the card front end.
// JS reports viewport sizes and pointer positions; sizes, scales and offsets are decided here.

mod breakpoint;
mod card;
mod effects;
mod error;
mod target;
mod types;
mod viewport;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub use breakpoint::{Breakpoint, BreakpointResolver};
pub use card::{
    card_image_url, height_to_scale, size_to_scale, width_to_scale, CardTarget, ScaleTarget,
    ScaledTarget, SharedCardTarget, CANVAS_HEIGHT, CANVAS_WIDTH,
};
pub use effects::{parallax_offset, position_aware_offset, TiltSettings, DEFAULT_PARALLAX_SPEED};
pub use error::ResponsiveError;
pub use target::{SizeLog, SizeUpdate, SizedTarget};
pub use types::*;
pub use viewport::{BindingId, MediaQuery, ResponsiveBinding, ViewportListener, ViewportWatcher};

/// Initialize panic hook and console logging for the browser.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second init (e.g. module re-instantiated by a dev server) keeps the existing logger.
    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Warn);
}

/// Set the maximum log level ("off", "error", "warn", "info", "debug", "trace").
/// Returns false for an unknown level.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

/// Updates queued for one card since the last batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardUpdates {
    pub card: u32,
    pub updates: Vec<SizeUpdate>,
}

/// Responsive layout for every card on a page.
/// Batch interface: each call returns all pending updates as one JSON array.
#[wasm_bindgen]
pub struct CardLayout {
    watcher: ViewportWatcher,
    cards: Vec<(BindingId, SharedCardTarget)>,
}

impl CardLayout {
    pub fn with_environment(environment: Environment) -> Self {
        CardLayout {
            watcher: ViewportWatcher::new(environment),
            cards: Vec::new(),
        }
    }

    /// Attach a card from a parsed config. The mount-time size is queued for the next batch.
    pub fn attach_config(&mut self, config: ResponsiveConfig) -> Result<BindingId, ResponsiveError> {
        let table = config.table()?;
        let target = SharedCardTarget::new(config.target);
        let id = self
            .watcher
            .attach(target.clone(), table, config.fallback, config.policy)?;
        self.cards.push((id, target));
        Ok(id)
    }

    /// Drain every card's queue. Cards with nothing pending are left out.
    pub fn drain_updates(&mut self) -> Vec<CardUpdates> {
        self.cards
            .iter()
            .filter_map(|(id, target)| {
                let updates = target.drain();
                if updates.is_empty() {
                    None
                } else {
                    Some(CardUpdates {
                        card: id.as_u32(),
                        updates,
                    })
                }
            })
            .collect()
    }

    /// Parallax offset against the layout's environment and last reported viewport.
    pub fn parallax_offset(&self, pointer: PagePoint, speed: f64) -> Option<Offset> {
        parallax_offset(self.watcher.environment(), pointer, speed)
    }

    pub fn watcher(&self) -> &ViewportWatcher {
        &self.watcher
    }
}

#[wasm_bindgen]
impl CardLayout {
    /// Create a layout from an `Environment` JSON object.
    #[wasm_bindgen(constructor)]
    pub fn new(environment_json: &str) -> Result<CardLayout, JsValue> {
        let environment: Environment = serde_json::from_str(environment_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid environment: {}", e)))?;

        Ok(CardLayout::with_environment(environment))
    }

    /// Attach a card from a `ResponsiveConfig` JSON object. Returns the card id.
    pub fn attach(&mut self, config_json: &str) -> Result<u32, JsValue> {
        let config: ResponsiveConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;

        self.attach_config(config)
            .map(|id| id.as_u32())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Release a card when its component unmounts.
    pub fn detach(&mut self, card: u32) -> bool {
        let Some(position) = self.cards.iter().position(|(id, _)| id.as_u32() == card) else {
            return false;
        };
        let (id, _) = self.cards.remove(position);
        self.watcher.detach(id)
    }

    /// Report a viewport change and return the resulting batch.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<String, JsValue> {
        self.watcher.resize(ViewportSize::new(width, height));
        self.take_updates()
    }

    /// Return pending updates (e.g. mount-time sizes) as a JSON array of `CardUpdates`.
    pub fn take_updates(&mut self) -> Result<String, JsValue> {
        let batch = self.drain_updates();
        serde_json::to_string(&batch)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn card_count(&self) -> u32 {
        self.cards.len() as u32
    }

    /// Parallax translation as `{"x": .., "y": ..}` JSON, or undefined on touch devices.
    pub fn parallax(&self, x: f64, y: f64, speed: f64) -> Result<Option<String>, JsValue> {
        self.parallax_offset(PagePoint::new(x, y), speed)
            .map(|offset| serde_json::to_string(&offset))
            .transpose()
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

/// CSS media queries for a `ResponsiveConfig`, ascending, as a JSON string array.
#[wasm_bindgen]
pub fn media_queries(config_json: &str) -> Result<String, JsValue> {
    let resolver = resolver_from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let queries: Vec<String> = resolver.queries().iter().map(MediaQuery::to_css).collect();

    serde_json::to_string(&queries)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Size a `ResponsiveConfig` resolves to at a viewport extent, as `{"width": ..}` JSON.
#[wasm_bindgen]
pub fn resolve_size(config_json: &str, extent: f64) -> Result<String, JsValue> {
    let resolver = resolver_from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&resolver.resolve(extent))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Card scale for a size along `dimension` ("width" or "height").
#[wasm_bindgen]
pub fn card_scale(dimension: &str, value: f64) -> Result<f64, JsValue> {
    let dimension: Dimension = serde_json::from_value(serde_json::Value::String(dimension.into()))
        .map_err(|e| JsValue::from_str(&format!("Invalid dimension: {}", e)))?;

    Ok(size_to_scale(TargetSize::new(dimension, value)))
}

/// Artwork URL for a card, or undefined without a password.
#[wasm_bindgen]
pub fn card_artwork_url(base: &str, password: &str) -> Option<String> {
    card_image_url(base, password)
}

/// Tilt library settings as JSON.
#[wasm_bindgen]
pub fn tilt_settings() -> Result<String, JsValue> {
    serde_json::to_string(&TiltSettings::default())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Parallax translation as `{"x": .., "y": ..}` JSON, or undefined on touch devices.
#[wasm_bindgen]
pub fn parallax(environment_json: &str, x: f64, y: f64, speed: f64) -> Result<Option<String>, JsValue> {
    let environment: Environment = serde_json::from_str(environment_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid environment: {}", e)))?;

    parallax_offset(&environment, PagePoint::new(x, y), speed)
        .map(|offset| serde_json::to_string(&offset))
        .transpose()
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn resolver_from_json(config_json: &str) -> Result<BreakpointResolver, ResponsiveError> {
    let config: ResponsiveConfig = serde_json::from_str(config_json)?;
    BreakpointResolver::new(config.table()?, config.fallback)
}
