//! Construction-time configuration of a map instance
//!
//! The host application persists this (typically as JSON next to the rest of
//! the dashboard layout) and hands it over when the map widget is created.

use crate::core::{
    constants::{
        DEFAULT_CLICK_THRESHOLD_PX, DEFAULT_CONTROL_BUTTON_SIZE, DEFAULT_CONTROL_MARGIN,
        DEFAULT_MARKER_DIAMETER, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_TILE_URL_TEMPLATE,
        ZOOM_LIMIT,
    },
    geo::GeoPoint,
};
use crate::tiles::source::UrlTemplateSource;
use crate::MapError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub center: GeoPoint,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tile_url_template: String,
    /// Pointer-driven panning, marker clicks and zoom buttons
    pub interactive: bool,
    /// Clicks on empty map emit `MapClick`
    pub placement_mode: bool,
    pub interaction: InteractionConfig,
    pub markers: MarkerStyleConfig,
    pub controls: ControlConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: GeoPoint::default(),
            zoom: DEFAULT_MIN_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            tile_url_template: DEFAULT_TILE_URL_TEMPLATE.to_string(),
            interactive: true,
            placement_mode: false,
            interaction: InteractionConfig::default(),
            markers: MarkerStyleConfig::default(),
            controls: ControlConfig::default(),
        }
    }
}

impl MapConfig {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_zoom_limits(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_tile_url_template(mut self, template: impl Into<String>) -> Self {
        self.tile_url_template = template.into();
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_placement_mode(mut self, placement_mode: bool) -> Self {
        self.placement_mode = placement_mode;
        self
    }

    pub fn validate(&self) -> Result<(), MapError> {
        if self.min_zoom > self.max_zoom {
            return Err(MapError::InvalidConfig(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.max_zoom > ZOOM_LIMIT {
            return Err(MapError::InvalidConfig(format!(
                "max_zoom {} exceeds the supported limit {}",
                self.max_zoom, ZOOM_LIMIT
            )));
        }
        if !self.center.lat.is_finite() || !self.center.lng.is_finite() {
            return Err(MapError::InvalidConfig("center must be finite".to_string()));
        }
        self.interaction.validate()?;
        self.markers.validate()?;
        self.controls.validate()?;
        UrlTemplateSource::check_template(&self.tile_url_template)?;
        Ok(())
    }

    /// Initial zoom pulled into the configured range
    pub fn clamped_zoom(&self) -> u8 {
        self.zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    /// Net travel below which a press/release counts as a click
    pub click_threshold_px: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            click_threshold_px: DEFAULT_CLICK_THRESHOLD_PX,
        }
    }
}

impl InteractionConfig {
    fn validate(&self) -> Result<(), MapError> {
        if !(self.click_threshold_px.is_finite() && self.click_threshold_px >= 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "click threshold {} must be a non-negative number",
                self.click_threshold_px
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkerStyleConfig {
    pub diameter: f64,
}

impl Default for MarkerStyleConfig {
    fn default() -> Self {
        Self {
            diameter: DEFAULT_MARKER_DIAMETER,
        }
    }
}

impl MarkerStyleConfig {
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    fn validate(&self) -> Result<(), MapError> {
        if !(self.diameter.is_finite() && self.diameter > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "marker diameter {} must be positive",
                self.diameter
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlConfig {
    pub visible: bool,
    pub button_size: f64,
    pub margin: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            visible: true,
            button_size: DEFAULT_CONTROL_BUTTON_SIZE,
            margin: DEFAULT_CONTROL_MARGIN,
        }
    }
}

impl ControlConfig {
    fn validate(&self) -> Result<(), MapError> {
        if !(self.button_size.is_finite() && self.button_size > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "control button size {} must be positive",
                self.button_size
            )));
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "control margin {} must be non-negative",
                self.margin
            )));
        }
        Ok(())
    }
}
