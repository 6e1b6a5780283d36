// src/view.rs
use crate::error::Result;
use crate::geometry::{ContainerMetrics, ScrollPosition, Size};
use futures::future::LocalBoxFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoomButton {
    ZoomIn,
    ZoomOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

/// Everything the viewer needs from its surroundings.
///
/// The browser implementation is `dom::DomView`. Optional elements that are
/// missing turn the matching calls into no-ops; no method may panic.
pub trait ViewBinding {
    /// Handle to a scheduled frame callback. Dropping it cancels the callback.
    type Frame: 'static;

    fn metrics(&self) -> ContainerMetrics;
    fn set_scroll(&self, scroll: ScrollPosition);
    /// Size of the viewport element holding the content, in CSS pixels.
    fn set_content_size(&self, size: Size);
    fn graft_markup(&self, markup: &str);
    fn set_load_state(&self, state: LoadState);

    fn set_zoom_percentage(&self, percent: i64);
    fn set_button_disabled(&self, button: ZoomButton, disabled: bool);
    fn set_slider_value(&self, percent: i64);
    fn set_slider_range(&self, min: i64, max: i64);
    fn set_coordinate_output(&self, text: &str);

    /// `None` when no clipboard is available at all.
    fn write_clipboard(&self, text: &str) -> Option<LocalBoxFuture<'static, Result<()>>>;
    fn prompt(&self, label: &str, value: &str);

    /// Milliseconds on the same clock frame callbacks receive.
    fn now(&self) -> f64;
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Self::Frame;
}
