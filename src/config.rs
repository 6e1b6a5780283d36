// src/config.rs
use crate::error::{Result, ViewerError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_INITIAL_ZOOM: f64 = 1.0;
pub const DEFAULT_MIN_ZOOM: f64 = 0.25;
pub const DEFAULT_MAX_ZOOM: f64 = 8.0;
pub const DEFAULT_ZOOM_STEP: f64 = 0.1;

const PAN_MODES: [&str; 2] = ["drag", "scroll"];
const ZOOM_MODES: [&str; 3] = ["scroll", "click", "super_scroll"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanMode {
    Drag,
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomMode {
    Scroll,
    Click,
    SuperScroll,
}

impl PanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanMode::Drag => "drag",
            PanMode::Scroll => "scroll",
        }
    }
}

impl ZoomMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoomMode::Scroll => "scroll",
            ZoomMode::Click => "click",
            ZoomMode::SuperScroll => "super_scroll",
        }
    }
}

impl fmt::Display for PanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ZoomMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercases and folds every whitespace run into a single underscore.
fn fold_mode(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn normalize_pan_mode(raw: &str) -> Result<PanMode> {
    match fold_mode(raw).as_str() {
        "drag" => Ok(PanMode::Drag),
        "scroll" => Ok(PanMode::Scroll),
        _ => Err(ViewerError::invalid_choice("panMode", raw, &PAN_MODES)),
    }
}

pub fn normalize_zoom_mode(raw: &str) -> Result<ZoomMode> {
    match fold_mode(raw).as_str() {
        "scroll" => Ok(ZoomMode::Scroll),
        "click" => Ok(ZoomMode::Click),
        "super_scroll" => Ok(ZoomMode::SuperScroll),
        _ => Err(ViewerError::invalid_choice("zoomMode", raw, &ZOOM_MODES)),
    }
}

/// Caller-supplied options, as produced by the embedding page. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerOptions {
    pub viewer_id: Option<String>,
    pub svg_url: Option<String>,
    pub initial_zoom: Option<f64>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub zoom_step: Option<f64>,
    pub pan_mode: Option<String>,
    pub zoom_mode: Option<String>,
    pub show_coordinates: Option<bool>,
    pub center_x: Option<f64>,
    pub center_y: Option<f64>,
}

/// Fully resolved configuration. Immutable once a viewer is constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub viewer_id: String,
    pub svg_url: Option<String>,
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub pan_mode: PanMode,
    pub zoom_mode: ZoomMode,
    pub show_coordinates: bool,
    pub center_x: Option<f64>,
    pub center_y: Option<f64>,
}

impl ResolvedConfig {
    /// The configured center, only when both coordinates are present.
    pub fn center(&self) -> Option<(f64, f64)> {
        match (self.center_x, self.center_y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }
}

fn positive(field: &'static str, value: Option<f64>, default: f64) -> Result<f64> {
    match value {
        None => Ok(default),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(ViewerError::invalid_value(
            field,
            v.to_string(),
            "a positive finite number",
        )),
    }
}

fn finite(field: &'static str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(ViewerError::invalid_value(
            field,
            v.to_string(),
            "a finite number",
        )),
        other => Ok(other),
    }
}

/// Merges options with defaults. Pure; fails only on invalid values.
pub fn resolve(options: &ViewerOptions) -> Result<ResolvedConfig> {
    let viewer_id = match options.viewer_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        other => {
            return Err(ViewerError::invalid_value(
                "viewerId",
                other.unwrap_or_default(),
                "a non-empty identifier",
            ))
        }
    };

    let pan_mode = match options.pan_mode.as_deref() {
        Some(raw) => normalize_pan_mode(raw)?,
        None => PanMode::Drag,
    };
    let zoom_mode = match options.zoom_mode.as_deref() {
        Some(raw) => normalize_zoom_mode(raw)?,
        None => ZoomMode::Scroll,
    };

    let max_zoom = positive("maxZoom", options.max_zoom, DEFAULT_MAX_ZOOM)?;
    let mut min_zoom = positive("minZoom", options.min_zoom, DEFAULT_MIN_ZOOM)?;
    let zoom_step = positive("zoomStep", options.zoom_step, DEFAULT_ZOOM_STEP)?;
    let initial_zoom = positive("initialZoom", options.initial_zoom, DEFAULT_INITIAL_ZOOM)?;

    if min_zoom > max_zoom {
        min_zoom = max_zoom;
    }

    Ok(ResolvedConfig {
        viewer_id,
        svg_url: options
            .svg_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string),
        initial_zoom: initial_zoom.clamp(min_zoom, max_zoom),
        min_zoom,
        max_zoom,
        zoom_step,
        pan_mode,
        zoom_mode,
        show_coordinates: options.show_coordinates.unwrap_or(false),
        center_x: finite("centerX", options.center_x)?,
        center_y: finite("centerY", options.center_y)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(id: &str) -> ViewerOptions {
        ViewerOptions {
            viewer_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_modes() {
        assert_eq!(normalize_pan_mode("Drag").unwrap(), PanMode::Drag);
        assert_eq!(normalize_pan_mode("scroll").unwrap().as_str(), "scroll");
        assert_eq!(normalize_zoom_mode("CLICK").unwrap(), ZoomMode::Click);
        assert_eq!(
            normalize_zoom_mode("super scroll").unwrap().as_str(),
            "super_scroll"
        );
        assert_eq!(
            normalize_zoom_mode("  Super   Scroll ").unwrap(),
            ZoomMode::SuperScroll
        );
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = normalize_pan_mode("fly").unwrap_err();
        match err {
            ViewerError::Configuration {
                field, expected, ..
            } => {
                assert_eq!(field, "panMode");
                assert!(expected.contains("drag"));
                assert!(expected.contains("scroll"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(normalize_zoom_mode("superscroll!").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = resolve(&options("viewer-1")).unwrap();
        assert_eq!(config.viewer_id, "viewer-1");
        assert_eq!(config.initial_zoom, DEFAULT_INITIAL_ZOOM);
        assert_eq!(config.min_zoom, DEFAULT_MIN_ZOOM);
        assert_eq!(config.max_zoom, DEFAULT_MAX_ZOOM);
        assert_eq!(config.zoom_step, DEFAULT_ZOOM_STEP);
        assert_eq!(config.pan_mode, PanMode::Drag);
        assert_eq!(config.zoom_mode, ZoomMode::Scroll);
        assert!(!config.show_coordinates);
        assert!(config.center().is_none());
    }

    #[test]
    fn test_min_clamped_to_max_and_initial_clamped() {
        let mut opts = options("v");
        opts.min_zoom = Some(3.0);
        opts.max_zoom = Some(2.0);
        opts.initial_zoom = Some(0.1);
        let config = resolve(&opts).unwrap();
        assert_eq!(config.min_zoom, 2.0);
        assert_eq!(config.max_zoom, 2.0);
        assert_eq!(config.initial_zoom, 2.0);
    }

    #[test]
    fn test_invalid_numbers_fail() {
        let mut opts = options("v");
        opts.zoom_step = Some(0.0);
        assert!(resolve(&opts).is_err());

        let mut opts = options("v");
        opts.center_x = Some(f64::NAN);
        assert!(resolve(&opts).is_err());
    }

    #[test]
    fn test_missing_id_fails() {
        assert!(resolve(&ViewerOptions::default()).is_err());
        assert!(resolve(&options("   ")).is_err());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "viewerId": "viewer-1",
            "svgUrl": "https://example.com/test.svg",
            "minZoom": 0.5,
            "maxZoom": 4,
            "panMode": "Drag",
            "zoomMode": "super scroll",
            "showCoordinates": true,
            "centerX": 10,
            "centerY": null
        }"#;
        let opts: ViewerOptions = serde_json::from_str(json).unwrap();
        let config = resolve(&opts).unwrap();
        assert_eq!(config.svg_url.as_deref(), Some("https://example.com/test.svg"));
        assert_eq!(config.zoom_mode, ZoomMode::SuperScroll);
        assert!(config.show_coordinates);
        assert_eq!(config.center_x, Some(10.0));
        assert!(config.center().is_none());
    }
}
