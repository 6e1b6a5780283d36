// src/viewer.rs
use crate::animator::ZoomAnimation;
use crate::config::{resolve, PanMode, ResolvedConfig, ViewerOptions, ZoomMode};
use crate::error::{Result, ViewerError};
use crate::geometry::{
    Anchor, ContentBox, ContentPoint, FocusSpec, Geometry, Size, ZoomDirection,
};
use crate::gesture::{
    click_direction, key_command, two_finger_geometry, wheel_direction, wheel_zoom_eligible,
    ClickInput, DragState, KeyCommand, PinchState, TouchPoint, WheelInput,
};
use crate::loader::{fetch_svg, measure_svg};
use crate::ui::{self, format_coordinates, zoom_percent, COPY_PROMPT_LABEL};
use crate::view::{LoadState, ViewBinding};
use std::cell::RefCell;
use std::rc::Rc;

/// Options for `Viewer::set_zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomOptions {
    /// Defaults to animated.
    pub animate: Option<bool>,
    /// When absent the scroll position is left alone.
    pub focus: Option<FocusSpec>,
}

impl ZoomOptions {
    pub fn immediate() -> Self {
        Self {
            animate: Some(false),
            focus: None,
        }
    }

    /// Animated, keeping the viewport center fixed.
    pub fn centered() -> Self {
        Self {
            animate: None,
            focus: Some(FocusSpec::default()),
        }
    }

    pub fn with_focus(mut self, focus: FocusSpec) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = Some(animate);
        self
    }
}

struct ViewerState<V: ViewBinding> {
    config: ResolvedConfig,
    geometry: Geometry,
    animation: Option<ZoomAnimation>,
    frame: Option<V::Frame>,
    drag: DragState,
    suppress_click: bool,
    pinch: Option<PinchState>,
    center_probe: Option<Box<dyn Fn() -> ContentPoint>>,
    ready: bool,
}

impl<V: ViewBinding> ViewerState<V> {
    fn cancel_animation(&mut self) {
        self.animation = None;
        self.frame.take();
    }

    /// Writes an in-range zoom, resizes the content, re-anchors the scroll
    /// position and resyncs the controls, in that order.
    fn apply_zoom(&mut self, view: &V, zoom: f64, anchor: Option<&Anchor>) {
        self.geometry.set_zoom_unchecked(zoom);
        if self.geometry.is_loaded() {
            view.set_content_size(self.geometry.scaled_size());
        }
        if let Some(anchor) = anchor {
            let metrics = view.metrics();
            view.set_scroll(self.geometry.scroll_for(anchor, &metrics));
        }
        ui::sync(view, &self.geometry);
    }

    /// Configured center, else the middle of the content.
    fn home_point(&self) -> ContentPoint {
        match self.config.center() {
            Some((x, y)) => ContentPoint::new(x, y),
            None => self.geometry.content().middle(),
        }
    }
}

/// One embedded SVG viewer.
///
/// Cloning yields another handle to the same instance. All state lives on the
/// single UI thread; frame callbacks hold only a weak reference, so dropping
/// the last handle cancels any running animation.
pub struct Viewer<V: ViewBinding + 'static> {
    view: Rc<V>,
    state: Rc<RefCell<ViewerState<V>>>,
}

impl<V: ViewBinding + 'static> Clone for Viewer<V> {
    fn clone(&self) -> Self {
        Self {
            view: self.view.clone(),
            state: self.state.clone(),
        }
    }
}

impl<V: ViewBinding + 'static> Viewer<V> {
    pub fn new(options: &ViewerOptions, view: V) -> Result<Self> {
        let config = resolve(options)?;
        Ok(Self::with_config(config, view))
    }

    pub fn with_config(config: ResolvedConfig, view: V) -> Self {
        view.set_load_state(LoadState::Loading);
        view.set_slider_range(zoom_percent(config.min_zoom), zoom_percent(config.max_zoom));

        let geometry = Geometry::new(&config);
        ui::sync(&view, &geometry);

        Self {
            view: Rc::new(view),
            state: Rc::new(RefCell::new(ViewerState {
                config,
                geometry,
                animation: None,
                frame: None,
                drag: DragState::default(),
                suppress_click: false,
                pinch: None,
                center_probe: None,
                ready: false,
            })),
        }
    }

    pub fn view(&self) -> Rc<V> {
        self.view.clone()
    }

    pub fn id(&self) -> String {
        self.state.borrow().config.viewer_id.clone()
    }

    pub fn config(&self) -> ResolvedConfig {
        self.state.borrow().config.clone()
    }

    pub fn current_zoom(&self) -> f64 {
        self.state.borrow().geometry.zoom()
    }

    pub fn content_box(&self) -> Option<ContentBox> {
        let state = self.state.borrow();
        state
            .geometry
            .is_loaded()
            .then(|| state.geometry.content())
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().ready
    }

    pub fn is_animating(&self) -> bool {
        self.state.borrow().animation.is_some()
    }

    /// Whether the coordinate copy affordance is offered.
    pub fn coordinates_enabled(&self) -> bool {
        self.state.borrow().config.show_coordinates
    }

    // ------ LOADING ------

    /// Fetches the configured SVG and grafts it in. Failures are logged and
    /// leave the viewer interactive with an empty viewport.
    pub async fn load(&self) {
        let url = self.state.borrow().config.svg_url.clone();
        let Some(url) = url else {
            self.fail_load(&ViewerError::Load("no svgUrl configured".to_string()));
            return;
        };
        match fetch_svg(&url).await {
            Ok(markup) => {
                if let Err(e) = self.content_loaded(&markup) {
                    log::debug!("SVG viewer {} stays empty: {}", self.id(), e);
                }
            }
            Err(e) => self.fail_load(&e),
        }
    }

    fn fail_load(&self, error: &ViewerError) {
        log::error!("SVG viewer {}: {}", self.id(), error);
        self.view.set_load_state(LoadState::Failed);
    }

    /// Grafts fetched markup, measures it once, then applies the current zoom
    /// and centers on the configured point. A zoom still animating lands on
    /// its target first.
    ///
    /// Failures are logged and the load state set before they are returned.
    pub fn content_loaded(&self, markup: &str) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }
        let svg = match measure_svg(markup) {
            Ok(svg) => svg,
            Err(e) => {
                self.fail_load(&e);
                return Err(e);
            }
        };
        self.view.graft_markup(markup);

        let fallback = {
            let metrics = self.view.metrics();
            Size::new(metrics.client_width, metrics.client_height)
        };
        let content = svg.content_box(fallback);
        {
            let mut state = self.state.borrow_mut();
            state.geometry.set_content(content);
            state.ready = true;
            let zoom = match state.animation.take() {
                Some(animation) => {
                    state.frame.take();
                    animation.to_zoom
                }
                None => state.geometry.zoom(),
            };
            state.apply_zoom(&self.view, zoom, None);
        }
        log::info!(
            "SVG viewer {} loaded: {}x{} content units",
            self.id(),
            content.base.width,
            content.base.height
        );
        self.view.set_load_state(LoadState::Ready);
        self.center_view();
        Ok(())
    }

    // ------ GEOMETRY ------

    /// Clamps `target` into the zoom range and applies it, animated unless
    /// told otherwise. A focus keeps its content point under the same pixel.
    pub fn set_zoom(&self, target: f64, options: ZoomOptions) {
        let mut state = self.state.borrow_mut();
        state.cancel_animation();

        let target = state.geometry.clamp_zoom(target);
        let current = state.geometry.zoom();
        if Geometry::same_zoom(target, current) {
            ui::sync(&*self.view, &state.geometry);
            return;
        }

        let anchor = options.focus.map(|focus| {
            let metrics = self.view.metrics();
            state.geometry.resolve_anchor(&focus, &metrics)
        });

        if options.animate.unwrap_or(true) {
            log::debug!("zoom animation {} -> {}", current, target);
            state.animation = Some(ZoomAnimation::new(
                current,
                target,
                self.view.now(),
                anchor,
            ));
            drop(state);
            self.schedule_frame();
        } else {
            state.apply_zoom(&self.view, target, anchor.as_ref());
        }
    }

    pub fn compute_zoom_target(&self, direction: ZoomDirection) -> f64 {
        self.state.borrow().geometry.compute_zoom_target(direction)
    }

    /// Content coordinate at the center of the visible area.
    pub fn visible_center_point(&self) -> ContentPoint {
        let state = self.state.borrow();
        match &state.center_probe {
            Some(probe) => probe(),
            None => state.geometry.visible_center(&self.view.metrics()),
        }
    }

    /// Replaces how `visible_center_point` is computed.
    pub fn set_center_probe(&self, probe: impl Fn() -> ContentPoint + 'static) {
        self.state.borrow_mut().center_probe = Some(Box::new(probe));
    }

    // ------ ANIMATION ------

    fn schedule_frame(&self) {
        let weak = Rc::downgrade(&self.state);
        let view = self.view.clone();
        let frame = self.view.request_frame(Box::new(move |timestamp| {
            if let Some(state) = weak.upgrade() {
                Viewer { view, state }.on_frame(timestamp);
            }
        }));
        let mut state = self.state.borrow_mut();
        if state.animation.is_some() {
            state.frame = Some(frame);
        }
    }

    fn on_frame(&self, timestamp: f64) {
        let mut state = self.state.borrow_mut();
        state.frame = None;
        let Some(animation) = state.animation.clone() else {
            return;
        };
        let sample = animation.sample(timestamp);
        state.apply_zoom(&self.view, sample.zoom, animation.anchor.as_ref());
        if sample.finished {
            state.animation = None;
            log::debug!("zoom animation finished at {}", sample.zoom);
        } else {
            drop(state);
            self.schedule_frame();
        }
    }

    // ------ BUTTONS & KEYS ------

    pub fn zoom_in(&self) {
        self.set_zoom(self.compute_zoom_target(ZoomDirection::In), ZoomOptions::centered());
    }

    pub fn zoom_out(&self) {
        self.set_zoom(self.compute_zoom_target(ZoomDirection::Out), ZoomOptions::centered());
    }

    /// Back to the initial zoom with the home point centered.
    pub fn reset(&self) {
        let (initial, home) = {
            let state = self.state.borrow();
            (state.config.initial_zoom, state.home_point())
        };
        let focus = FocusSpec {
            focus_x: Some(home.x),
            focus_y: Some(home.y),
            ..Default::default()
        };
        let already_there = Geometry::same_zoom(initial, self.current_zoom());
        self.set_zoom(initial, ZoomOptions::default().with_focus(focus));
        if already_there {
            self.center_view();
        }
    }

    /// Scrolls the home point to the viewport center without changing zoom.
    pub fn center_view(&self) {
        let mut state = self.state.borrow_mut();
        state.cancel_animation();
        let metrics = self.view.metrics();
        let anchor = Geometry::center_anchor(state.home_point(), &metrics);
        self.view.set_scroll(state.geometry.scroll_for(&anchor, &metrics));
    }

    pub fn handle_key(&self, key: &str, ctrl: bool, meta: bool) -> bool {
        match key_command(key, ctrl, meta) {
            Some(KeyCommand::ZoomIn) => self.zoom_in(),
            Some(KeyCommand::ZoomOut) => self.zoom_out(),
            Some(KeyCommand::Reset) => self.reset(),
            None => return false,
        }
        true
    }

    /// Slider values are percentages.
    pub fn handle_slider_input(&self, value: &str) {
        match value.trim().parse::<f64>() {
            Ok(percent) if percent.is_finite() => self.set_zoom(percent / 100.0, ZoomOptions::default()),
            _ => log::warn!("ignoring slider value {:?}", value),
        }
    }

    // ------ WHEEL ------

    /// Returns true when the event was turned into a zoom and its default
    /// scrolling should be suppressed.
    pub fn handle_mouse_wheel(&self, input: &WheelInput) -> bool {
        let mode = self.state.borrow().config.zoom_mode;
        let metrics = self.view.metrics();
        if !wheel_zoom_eligible(mode, &metrics, input) {
            return false;
        }
        self.perform_wheel_zoom(input);
        true
    }

    /// One zoom step around the wheel position, without animation.
    pub fn perform_wheel_zoom(&self, input: &WheelInput) -> bool {
        let Some(direction) = wheel_direction(input.delta_y) else {
            return false;
        };
        let target = self.compute_zoom_target(direction);
        let (offset_x, offset_y) = self.view.metrics().offset_of(input.client_x, input.client_y);
        self.set_zoom(
            target,
            ZoomOptions::immediate().with_focus(FocusSpec::at_offset(offset_x, offset_y)),
        );
        true
    }

    // ------ POINTER ------

    /// Arms a drag when panning by drag. Returns whether the press was taken.
    ///
    /// Every new press starts a new gesture, so a click swallow left over from
    /// an earlier drag that never produced its click is dropped here.
    pub fn begin_drag(&self, client_x: f64, client_y: f64) -> bool {
        let mut state = self.state.borrow_mut();
        state.suppress_click = false;
        if state.config.pan_mode != PanMode::Drag {
            return false;
        }
        state.drag.begin(client_x, client_y);
        true
    }

    pub fn drag_to(&self, client_x: f64, client_y: f64) -> bool {
        let Some((dx, dy)) = self.state.borrow_mut().drag.move_to(client_x, client_y) else {
            return false;
        };
        let metrics = self.view.metrics();
        self.view
            .set_scroll(metrics.clamp_scroll(metrics.scroll_left - dx, metrics.scroll_top - dy));
        true
    }

    /// Ends a mouse drag. Travel beyond the click slop swallows the click the
    /// browser fires right after the release.
    pub fn end_drag(&self) {
        let mut state = self.state.borrow_mut();
        if state.drag.end() {
            state.suppress_click = true;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().drag.is_active()
    }

    /// Click-to-zoom. A click that ends a drag is swallowed.
    pub fn handle_click(&self, input: &ClickInput) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if std::mem::take(&mut state.suppress_click) {
                return false;
            }
            if state.config.zoom_mode != ZoomMode::Click {
                return false;
            }
        }
        let Some(direction) = click_direction(input) else {
            return false;
        };
        let target = self.compute_zoom_target(direction);
        let (offset_x, offset_y) = self.view.metrics().offset_of(input.client_x, input.client_y);
        self.set_zoom(
            target,
            ZoomOptions::default().with_focus(FocusSpec::at_offset(offset_x, offset_y)),
        );
        true
    }

    // ------ TOUCH ------

    pub fn touch_start(&self, touches: &[TouchPoint]) -> bool {
        match touches {
            [a, b] => {
                let (_, distance) = two_finger_geometry(*a, *b);
                let mut state = self.state.borrow_mut();
                state.drag.end();
                state.suppress_click = false;
                let zoom = state.geometry.zoom();
                state.pinch = Some(PinchState::new(distance, zoom));
                true
            }
            [single] => self.begin_drag(single.client_x, single.client_y),
            _ => false,
        }
    }

    pub fn touch_move(&self, touches: &[TouchPoint]) -> bool {
        match touches {
            [a, b] => {
                let Some(pinch) = self.state.borrow().pinch else {
                    return false;
                };
                let (mid, distance) = two_finger_geometry(*a, *b);
                let (offset_x, offset_y) = self.view.metrics().offset_of(mid.client_x, mid.client_y);
                self.set_zoom(
                    pinch.zoom_for(distance),
                    ZoomOptions::immediate().with_focus(FocusSpec::at_offset(offset_x, offset_y)),
                );
                true
            }
            [single] => self.drag_to(single.client_x, single.client_y),
            _ => false,
        }
    }

    pub fn touch_end(&self, remaining: &[TouchPoint]) {
        if remaining.len() < 2 {
            self.state.borrow_mut().pinch = None;
        }
        // No click follows a touch pan, so nothing is armed to swallow one.
        if remaining.is_empty() {
            self.state.borrow_mut().drag.end();
        }
    }

    // ------ COORDINATES ------

    /// Copies the visible center as `"x.xx, y.yy"`. Falls back to a prompt
    /// when the clipboard is missing or rejects the write.
    pub async fn copy_center_coordinates(&self) -> String {
        let text = format_coordinates(self.visible_center_point());
        match self.view.write_clipboard(&text) {
            Some(write) => match write.await {
                Ok(()) => self.view.set_coordinate_output(&text),
                Err(e) => {
                    log::warn!("SVG viewer {}: {}", self.id(), e);
                    self.view.prompt(COPY_PROMPT_LABEL, &text);
                }
            },
            None => self.view.prompt(COPY_PROMPT_LABEL, &text),
        }
        text
    }
}
