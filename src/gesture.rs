// src/gesture.rs
//
// Input interpretation that does not need the DOM. The viewer feeds these
// plain structs from browser events and acts on the result.

use crate::config::ZoomMode;
use crate::geometry::{ContainerMetrics, ZoomDirection};

/// Pointer travel (CSS px) below which a press-release still counts as a click.
pub const CLICK_SLOP_PX: f64 = 4.0;

/// Pinch distances below this are too noisy to derive a ratio from.
const MIN_PINCH_DISTANCE: f64 = 10.0;

/// Browsers report a fractional scroll position at the far edge.
const EXTREME_TOLERANCE_PX: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub client_x: f64,
    pub client_y: f64,
}

fn at_extreme(position: f64, client: f64, total: f64, delta: f64) -> bool {
    if delta < 0.0 {
        position <= 0.0
    } else {
        position + client >= total - EXTREME_TOLERANCE_PX
    }
}

/// Whether a wheel event should be turned into a zoom instead of a scroll.
///
/// `super_scroll` always intercepts. `scroll` intercepts only when every axis
/// the wheel moves along is already at its extreme in that direction, so the
/// container's own scrolling wins until it runs out.
pub fn wheel_zoom_eligible(mode: ZoomMode, metrics: &ContainerMetrics, input: &WheelInput) -> bool {
    match mode {
        ZoomMode::SuperScroll => true,
        ZoomMode::Click => false,
        ZoomMode::Scroll => {
            if input.delta_x == 0.0 && input.delta_y == 0.0 {
                return false;
            }
            let x_done = input.delta_x == 0.0
                || at_extreme(
                    metrics.scroll_left,
                    metrics.client_width,
                    metrics.scroll_width,
                    input.delta_x,
                );
            let y_done = input.delta_y == 0.0
                || at_extreme(
                    metrics.scroll_top,
                    metrics.client_height,
                    metrics.scroll_height,
                    input.delta_y,
                );
            x_done && y_done
        }
    }
}

/// Negative deltaY (wheel pushed away) zooms in.
pub fn wheel_direction(delta_y: f64) -> Option<ZoomDirection> {
    if delta_y < 0.0 {
        Some(ZoomDirection::In)
    } else if delta_y > 0.0 {
        Some(ZoomDirection::Out)
    } else {
        None
    }
}

/// Press-move-release tracking for drag panning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    active: bool,
    last_x: f64,
    last_y: f64,
    travelled: f64,
}

impl DragState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn begin(&mut self, x: f64, y: f64) {
        *self = Self {
            active: true,
            last_x: x,
            last_y: y,
            travelled: 0.0,
        };
    }

    /// Pointer delta since the last move, while pressed.
    pub fn move_to(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !self.active {
            return None;
        }
        let (dx, dy) = (x - self.last_x, y - self.last_y);
        self.last_x = x;
        self.last_y = y;
        self.travelled += dx.abs() + dy.abs();
        Some((dx, dy))
    }

    /// Releases the drag. Returns true when the pointer moved far enough
    /// that the following click should be ignored.
    pub fn end(&mut self) -> bool {
        let dragged = self.active && self.travelled > CLICK_SLOP_PX;
        self.active = false;
        dragged
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClickInput {
    pub client_x: f64,
    pub client_y: f64,
    pub button: i16,
    pub shift: bool,
    pub alt: bool,
}

/// Plain primary click zooms in. Shift/Alt-click or a secondary click zooms out.
pub fn click_direction(input: &ClickInput) -> Option<ZoomDirection> {
    match input.button {
        0 if input.shift || input.alt => Some(ZoomDirection::Out),
        0 => Some(ZoomDirection::In),
        2 => Some(ZoomDirection::Out),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

/// Returns (midpoint, distance) for a pair of touches.
pub fn two_finger_geometry(a: TouchPoint, b: TouchPoint) -> (TouchPoint, f64) {
    let mid = TouchPoint {
        client_x: (a.client_x + b.client_x) / 2.0,
        client_y: (a.client_y + b.client_y) / 2.0,
    };
    let dist = ((b.client_x - a.client_x).powi(2) + (b.client_y - a.client_y).powi(2)).sqrt();
    (mid, dist)
}

/// Snapshot taken when a second finger lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchState {
    pub initial_distance: f64,
    pub initial_zoom: f64,
}

impl PinchState {
    pub fn new(initial_distance: f64, initial_zoom: f64) -> Self {
        Self {
            initial_distance,
            initial_zoom,
        }
    }

    /// Unclamped zoom proportional to the finger-distance ratio.
    pub fn zoom_for(&self, distance: f64) -> f64 {
        if self.initial_distance < MIN_PINCH_DISTANCE {
            return self.initial_zoom;
        }
        self.initial_zoom * distance / self.initial_distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    ZoomIn,
    ZoomOut,
    Reset,
}

/// Ctrl (or Cmd) with `+`/`=`, `-`/`_`, `0`.
pub fn key_command(key: &str, ctrl: bool, meta: bool) -> Option<KeyCommand> {
    if !(ctrl || meta) {
        return None;
    }
    match key {
        "+" | "=" => Some(KeyCommand::ZoomIn),
        "-" | "_" => Some(KeyCommand::ZoomOut),
        "0" => Some(KeyCommand::Reset),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(scroll_left: f64, scroll_top: f64) -> ContainerMetrics {
        ContainerMetrics {
            client_width: 500.0,
            client_height: 400.0,
            scroll_width: 600.0,
            scroll_height: 800.0,
            scroll_left,
            scroll_top,
            ..Default::default()
        }
    }

    fn wheel(delta_x: f64, delta_y: f64) -> WheelInput {
        WheelInput {
            delta_x,
            delta_y,
            client_x: 250.0,
            client_y: 200.0,
        }
    }

    #[test]
    fn test_scroll_mode_zooms_only_at_extreme() {
        let up = wheel(0.0, -160.0);
        assert!(wheel_zoom_eligible(ZoomMode::Scroll, &container(0.0, 0.0), &up));
        assert!(!wheel_zoom_eligible(ZoomMode::Scroll, &container(0.0, 120.0), &up));

        let down = wheel(0.0, 160.0);
        assert!(!wheel_zoom_eligible(ZoomMode::Scroll, &container(0.0, 0.0), &down));
        assert!(wheel_zoom_eligible(ZoomMode::Scroll, &container(0.0, 400.0), &down));
        assert!(wheel_zoom_eligible(ZoomMode::Scroll, &container(0.0, 399.5), &down));
    }

    #[test]
    fn test_scroll_mode_checks_horizontal_axis() {
        let diagonal = wheel(30.0, -160.0);
        assert!(!wheel_zoom_eligible(ZoomMode::Scroll, &container(0.0, 0.0), &diagonal));
        assert!(wheel_zoom_eligible(ZoomMode::Scroll, &container(100.0, 0.0), &diagonal));
    }

    #[test]
    fn test_other_modes() {
        let up = wheel(0.0, -160.0);
        assert!(wheel_zoom_eligible(ZoomMode::SuperScroll, &container(0.0, 120.0), &up));
        assert!(!wheel_zoom_eligible(ZoomMode::Click, &container(0.0, 0.0), &up));
        assert!(!wheel_zoom_eligible(ZoomMode::Scroll, &container(0.0, 0.0), &wheel(0.0, 0.0)));
    }

    #[test]
    fn test_non_scrollable_container_is_always_at_extreme() {
        let flat = ContainerMetrics::default();
        assert!(wheel_zoom_eligible(ZoomMode::Scroll, &flat, &wheel(0.0, 50.0)));
        assert!(wheel_zoom_eligible(ZoomMode::Scroll, &flat, &wheel(0.0, -50.0)));
    }

    #[test]
    fn test_wheel_direction() {
        assert_eq!(wheel_direction(-1.0), Some(ZoomDirection::In));
        assert_eq!(wheel_direction(3.0), Some(ZoomDirection::Out));
        assert_eq!(wheel_direction(0.0), None);
    }

    #[test]
    fn test_drag_state() {
        let mut drag = DragState::default();
        assert_eq!(drag.move_to(5.0, 5.0), None);

        drag.begin(10.0, 10.0);
        assert_eq!(drag.move_to(15.0, 7.0), Some((5.0, -3.0)));
        assert_eq!(drag.move_to(16.0, 7.0), Some((1.0, 0.0)));
        assert!(drag.end());
        assert!(!drag.is_active());

        drag.begin(0.0, 0.0);
        drag.move_to(1.0, 1.0);
        assert!(!drag.end());
    }

    #[test]
    fn test_click_direction() {
        let plain = ClickInput::default();
        assert_eq!(click_direction(&plain), Some(ZoomDirection::In));
        let shifted = ClickInput {
            shift: true,
            ..plain
        };
        assert_eq!(click_direction(&shifted), Some(ZoomDirection::Out));
        let secondary = ClickInput { button: 2, ..plain };
        assert_eq!(click_direction(&secondary), Some(ZoomDirection::Out));
        let middle = ClickInput { button: 1, ..plain };
        assert_eq!(click_direction(&middle), None);
    }

    #[test]
    fn test_pinch() {
        let (mid, dist) = two_finger_geometry(
            TouchPoint { client_x: 0.0, client_y: 0.0 },
            TouchPoint { client_x: 30.0, client_y: 40.0 },
        );
        assert_eq!(mid, TouchPoint { client_x: 15.0, client_y: 20.0 });
        assert_eq!(dist, 50.0);

        let pinch = PinchState::new(50.0, 1.0);
        assert_eq!(pinch.zoom_for(100.0), 2.0);
        assert_eq!(PinchState::new(2.0, 1.5).zoom_for(100.0), 1.5);
    }

    #[test]
    fn test_key_command() {
        assert_eq!(key_command("+", true, false), Some(KeyCommand::ZoomIn));
        assert_eq!(key_command("=", false, true), Some(KeyCommand::ZoomIn));
        assert_eq!(key_command("-", true, false), Some(KeyCommand::ZoomOut));
        assert_eq!(key_command("0", true, false), Some(KeyCommand::Reset));
        assert_eq!(key_command("+", false, false), None);
        assert_eq!(key_command("a", true, false), None);
    }
}
