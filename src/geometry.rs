// src/geometry.rs
use crate::config::ResolvedConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Zoom values are compared and rounded at this resolution so repeated steps
/// land exactly on the bounds instead of drifting by float error.
const ZOOM_EPSILON: f64 = 1e-9;
const ZOOM_ROUNDING: f64 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentPoint {
    pub x: f64,
    pub y: f64,
}

impl ContentPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub left: f64,
    pub top: f64,
}

/// Snapshot of the scrollable container, in CSS pixels.
///
/// `left`/`top` are the container's position in client coordinates, used to
/// turn pointer positions into offsets inside the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerMetrics {
    pub client_width: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub left: f64,
    pub top: f64,
}

impl ContainerMetrics {
    pub fn max_scroll_left(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    pub fn scroll(&self) -> ScrollPosition {
        ScrollPosition {
            left: self.scroll_left,
            top: self.scroll_top,
        }
    }

    pub fn clamp_scroll(&self, left: f64, top: f64) -> ScrollPosition {
        ScrollPosition {
            left: left.min(self.max_scroll_left()).max(0.0),
            top: top.min(self.max_scroll_top()).max(0.0),
        }
    }

    /// Client coordinates to an offset inside the visible area.
    pub fn offset_of(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (client_x - self.left, client_y - self.top)
    }
}

/// Measured once on first successful load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentBox {
    /// Content size at zoom 1, in content units.
    pub base: Size,
    /// Content-space coordinate of the top-left corner.
    pub origin: ContentPoint,
    /// Content units per CSS pixel at zoom 1, per axis.
    pub units_per_css: ContentPoint,
}

impl ContentBox {
    pub fn new(base: Size, origin: ContentPoint, units_per_css: ContentPoint) -> Self {
        let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        Self {
            base,
            origin,
            units_per_css: ContentPoint::new(sane(units_per_css.x), sane(units_per_css.y)),
        }
    }

    /// Rendered size at zoom 1, in CSS pixels.
    pub fn css_size(&self) -> Size {
        Size::new(
            self.base.width / self.units_per_css.x,
            self.base.height / self.units_per_css.y,
        )
    }

    pub fn middle(&self) -> ContentPoint {
        ContentPoint::new(
            self.origin.x + self.base.width / 2.0,
            self.origin.y + self.base.height / 2.0,
        )
    }
}

impl Default for ContentBox {
    fn default() -> Self {
        Self::new(Size::default(), ContentPoint::default(), ContentPoint::new(1.0, 1.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl FromStr for ZoomDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(ZoomDirection::In),
            "out" => Ok(ZoomDirection::Out),
            other => Err(format!("unknown zoom direction: {}", other)),
        }
    }
}

/// Point that must stay visually fixed across a zoom change.
///
/// `focus_x`/`focus_y` are content coordinates; the offsets are CSS pixels
/// inside the container's visible area. Missing offsets default to the
/// viewport center, missing content coordinates to whatever currently sits
/// under the offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusSpec {
    pub focus_x: Option<f64>,
    pub focus_y: Option<f64>,
    pub focus_offset_x: Option<f64>,
    pub focus_offset_y: Option<f64>,
}

impl FocusSpec {
    pub fn at_offset(offset_x: f64, offset_y: f64) -> Self {
        Self {
            focus_offset_x: Some(offset_x),
            focus_offset_y: Some(offset_y),
            ..Default::default()
        }
    }
}

/// A resolved focus: this content point belongs under this pixel offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub content: ContentPoint,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
    content: Option<ContentBox>,
}

impl Geometry {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            zoom: config.initial_zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
            content: None,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    pub fn is_loaded(&self) -> bool {
        self.content.is_some()
    }

    /// Zero-sized box until content has been measured.
    pub fn content(&self) -> ContentBox {
        self.content.unwrap_or_default()
    }

    /// Records the measured content box. Later calls are ignored.
    pub fn set_content(&mut self, content: ContentBox) -> bool {
        if self.content.is_some() {
            return false;
        }
        self.content = Some(content);
        true
    }

    pub fn clamp_zoom(&self, target: f64) -> f64 {
        if target.is_nan() {
            return self.zoom;
        }
        target.clamp(self.min_zoom, self.max_zoom)
    }

    /// Writes a zoom value that is already known to be in range.
    pub(crate) fn set_zoom_unchecked(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn compute_zoom_target(&self, direction: ZoomDirection) -> f64 {
        let raw = match direction {
            ZoomDirection::In => self.zoom + self.zoom_step,
            ZoomDirection::Out => self.zoom - self.zoom_step,
        };
        self.clamp_zoom((raw * ZOOM_ROUNDING).round() / ZOOM_ROUNDING)
    }

    pub fn same_zoom(a: f64, b: f64) -> bool {
        (a - b).abs() < ZOOM_EPSILON
    }

    pub fn at_min(&self) -> bool {
        Self::same_zoom(self.zoom, self.min_zoom)
    }

    pub fn at_max(&self) -> bool {
        Self::same_zoom(self.zoom, self.max_zoom)
    }

    /// Rendered content size at the current zoom, in CSS pixels.
    pub fn scaled_size(&self) -> Size {
        let css = self.content().css_size();
        Size::new(css.width * self.zoom, css.height * self.zoom)
    }

    /// Content coordinate under a pixel offset of the visible area.
    pub fn content_at(&self, offset_x: f64, offset_y: f64, metrics: &ContainerMetrics) -> ContentPoint {
        let content = self.content();
        ContentPoint::new(
            (metrics.scroll_left + offset_x) / self.zoom * content.units_per_css.x + content.origin.x,
            (metrics.scroll_top + offset_y) / self.zoom * content.units_per_css.y + content.origin.y,
        )
    }

    pub fn visible_center(&self, metrics: &ContainerMetrics) -> ContentPoint {
        self.content_at(metrics.client_width / 2.0, metrics.client_height / 2.0, metrics)
    }

    pub fn resolve_anchor(&self, focus: &FocusSpec, metrics: &ContainerMetrics) -> Anchor {
        let offset_x = focus.focus_offset_x.unwrap_or(metrics.client_width / 2.0);
        let offset_y = focus.focus_offset_y.unwrap_or(metrics.client_height / 2.0);
        let under = self.content_at(offset_x, offset_y, metrics);
        Anchor {
            content: ContentPoint::new(
                focus.focus_x.unwrap_or(under.x),
                focus.focus_y.unwrap_or(under.y),
            ),
            offset_x,
            offset_y,
        }
    }

    /// Scroll position that puts the anchor's content point under its pixel
    /// offset at the current zoom, clamped to the container's scroll range.
    pub fn scroll_for(&self, anchor: &Anchor, metrics: &ContainerMetrics) -> ScrollPosition {
        let content = self.content();
        let pixel_x = (anchor.content.x - content.origin.x) / content.units_per_css.x * self.zoom;
        let pixel_y = (anchor.content.y - content.origin.y) / content.units_per_css.y * self.zoom;
        metrics.clamp_scroll(pixel_x - anchor.offset_x, pixel_y - anchor.offset_y)
    }

    pub fn center_anchor(point: ContentPoint, metrics: &ContainerMetrics) -> Anchor {
        Anchor {
            content: point,
            offset_x: metrics.client_width / 2.0,
            offset_y: metrics.client_height / 2.0,
        }
    }
}
