// src/ui.rs
use crate::geometry::{ContentPoint, Geometry};
use crate::view::{ViewBinding, ZoomButton};

/// Label of the prompt shown when the clipboard cannot be written.
pub const COPY_PROMPT_LABEL: &str = "Copy coordinates";

pub fn zoom_percent(zoom: f64) -> i64 {
    (zoom * 100.0).round() as i64
}

/// `"x, y"` with two decimals each.
pub fn format_coordinates(point: ContentPoint) -> String {
    format!("{:.2}, {:.2}", point.x, point.y)
}

/// Reflects the geometry into the readout, buttons and slider.
pub fn sync<V: ViewBinding + ?Sized>(view: &V, geometry: &Geometry) {
    let percent = zoom_percent(geometry.zoom());
    view.set_zoom_percentage(percent);
    view.set_button_disabled(ZoomButton::ZoomIn, geometry.at_max());
    view.set_button_disabled(ZoomButton::ZoomOut, geometry.at_min());
    view.set_slider_value(percent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinates() {
        assert_eq!(
            format_coordinates(ContentPoint::new(12.345, 67.89)),
            "12.35, 67.89"
        );
        assert_eq!(format_coordinates(ContentPoint::new(1.2, 3.4)), "1.20, 3.40");
        assert_eq!(format_coordinates(ContentPoint::new(-0.5, 0.0)), "-0.50, 0.00");
    }

    #[test]
    fn test_zoom_percent_rounds() {
        assert_eq!(zoom_percent(1.0), 100);
        assert_eq!(zoom_percent(0.255), 26);
        assert_eq!(zoom_percent(1.5), 150);
    }
}
