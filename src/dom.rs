// src/dom.rs
//
// Browser side of the viewer: finds the instance's elements once, implements
// `ViewBinding` on top of them and wires DOM events into the engine.

use crate::config::{resolve, ViewerOptions};
use crate::error::{Result, ViewerError};
use crate::geometry::{ContainerMetrics, ScrollPosition, Size};
use crate::gesture::{ClickInput, TouchPoint, WheelInput};
use crate::view::{LoadState, ViewBinding, ZoomButton};
use crate::viewer::Viewer;
use futures::future::LocalBoxFuture;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo_events::{EventListener, EventListenerOptions};
use gloo_utils::{document, window};
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Element, HtmlButtonElement, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent,
    TouchEvent, WheelEvent,
};

/// Elements of one viewer instance, located by class + `data-viewer` id.
pub struct ViewElements {
    pub wrapper: Option<HtmlElement>,
    pub container: HtmlElement,
    pub viewport: HtmlElement,
    pub zoom_in: Vec<HtmlElement>,
    pub zoom_out: Vec<HtmlElement>,
    pub reset: Vec<HtmlElement>,
    pub center: Vec<HtmlElement>,
    pub coord_copy: Vec<HtmlElement>,
    pub coord_output: Vec<HtmlElement>,
    pub percentage: Vec<HtmlElement>,
    pub sliders: Vec<HtmlInputElement>,
}

fn query_all<T: JsCast>(id: &str, class: &str) -> Vec<T> {
    let selector = format!("[data-viewer=\"{}\"].{}", id, class);
    let Ok(list) = document().query_selector_all(&selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

fn query_one(id: &str, class: &str) -> Result<HtmlElement> {
    query_all::<HtmlElement>(id, class)
        .into_iter()
        .next()
        .ok_or_else(|| {
            ViewerError::invalid_value(
                "viewerId",
                id,
                format!("an id shared by a .{} element", class),
            )
        })
}

impl ViewElements {
    pub fn locate(id: &str) -> Result<Self> {
        Ok(Self {
            wrapper: document()
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            container: query_one(id, "svg-container")?,
            viewport: query_one(id, "svg-viewport")?,
            zoom_in: query_all(id, "zoom-in-btn"),
            zoom_out: query_all(id, "zoom-out-btn"),
            reset: query_all(id, "reset-zoom-btn"),
            center: query_all(id, "center-view-btn"),
            coord_copy: query_all(id, "coord-copy-btn"),
            coord_output: query_all(id, "coord-output"),
            percentage: query_all(id, "zoom-percentage"),
            sliders: query_all(id, "zoom-slider"),
        })
    }
}

pub struct DomView {
    elements: ViewElements,
}

impl DomView {
    pub fn locate(id: &str) -> Result<Self> {
        Ok(Self {
            elements: ViewElements::locate(id)?,
        })
    }

    pub fn elements(&self) -> &ViewElements {
        &self.elements
    }

    fn set_style(element: &HtmlElement, property: &str, value: &str) {
        let _ = element.style().set_property(property, value);
    }
}

fn clipboard_error(value: JsValue) -> ViewerError {
    ViewerError::Clipboard(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

impl ViewBinding for DomView {
    type Frame = AnimationFrame;

    fn metrics(&self) -> ContainerMetrics {
        let container = &self.elements.container;
        let rect = container.get_bounding_client_rect();
        ContainerMetrics {
            client_width: container.client_width() as f64,
            client_height: container.client_height() as f64,
            scroll_width: container.scroll_width() as f64,
            scroll_height: container.scroll_height() as f64,
            scroll_left: container.scroll_left() as f64,
            scroll_top: container.scroll_top() as f64,
            left: rect.left(),
            top: rect.top(),
        }
    }

    fn set_scroll(&self, scroll: ScrollPosition) {
        self.elements
            .container
            .scroll_to_with_x_and_y(scroll.left.round(), scroll.top.round());
    }

    fn set_content_size(&self, size: Size) {
        let viewport = &self.elements.viewport;
        Self::set_style(viewport, "width", &format!("{}px", size.width));
        Self::set_style(viewport, "height", &format!("{}px", size.height));
    }

    fn graft_markup(&self, markup: &str) {
        let viewport = &self.elements.viewport;
        viewport.set_inner_html(markup);
        if let Ok(Some(svg)) = viewport.query_selector("svg") {
            let style = format!(
                "{}display:block;width:100%;height:100%;",
                svg.get_attribute("style").unwrap_or_default()
            );
            let _ = svg.set_attribute("style", &style);
        }
    }

    fn set_load_state(&self, state: LoadState) {
        let Some(wrapper) = &self.elements.wrapper else {
            return;
        };
        let classes = wrapper.class_list();
        let _ = classes.remove_3("is-loading", "is-ready", "has-error");
        let _ = classes.add_1(match state {
            LoadState::Loading => "is-loading",
            LoadState::Ready => "is-ready",
            LoadState::Failed => "has-error",
        });
    }

    fn set_zoom_percentage(&self, percent: i64) {
        let text = percent.to_string();
        for el in &self.elements.percentage {
            el.set_text_content(Some(&text));
        }
    }

    fn set_button_disabled(&self, button: ZoomButton, disabled: bool) {
        let buttons = match button {
            ZoomButton::ZoomIn => &self.elements.zoom_in,
            ZoomButton::ZoomOut => &self.elements.zoom_out,
        };
        for el in buttons {
            if let Some(btn) = el.dyn_ref::<HtmlButtonElement>() {
                btn.set_disabled(disabled);
            }
            let _ = el.set_attribute("aria-disabled", if disabled { "true" } else { "false" });
        }
    }

    fn set_slider_value(&self, percent: i64) {
        let value = percent.to_string();
        for slider in &self.elements.sliders {
            slider.set_value(&value);
        }
    }

    fn set_slider_range(&self, min: i64, max: i64) {
        for slider in &self.elements.sliders {
            slider.set_min(&min.to_string());
            slider.set_max(&max.to_string());
        }
    }

    fn set_coordinate_output(&self, text: &str) {
        for el in &self.elements.coord_output {
            el.set_text_content(Some(text));
        }
    }

    fn write_clipboard(&self, text: &str) -> Option<LocalBoxFuture<'static, Result<()>>> {
        let navigator = window().navigator();
        let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .ok()
            .filter(|value| value.is_object())?;
        let write_text = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;

        let promise = match write_text.call1(&clipboard, &JsValue::from_str(text)) {
            Ok(value) => value
                .dyn_into::<Promise>()
                .unwrap_or_else(|value| Promise::resolve(&value)),
            Err(e) => {
                let error = clipboard_error(e);
                return Some(Box::pin(async move { Err(error) }));
            }
        };
        Some(Box::pin(async move {
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(clipboard_error)
        }))
    }

    fn prompt(&self, label: &str, value: &str) {
        let _ = gloo::dialogs::prompt(label, Some(value));
    }

    fn now(&self) -> f64 {
        window()
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> AnimationFrame {
        request_animation_frame(callback)
    }
}

fn touch_points(event: &TouchEvent) -> Vec<TouchPoint> {
    let touches = event.touches();
    (0..touches.length())
        .filter_map(|i| touches.get(i))
        .map(|t| TouchPoint {
            client_x: t.client_x() as f64,
            client_y: t.client_y() as f64,
        })
        .collect()
}

fn click_input(event: &MouseEvent) -> ClickInput {
    ClickInput {
        client_x: event.client_x() as f64,
        client_y: event.client_y() as f64,
        button: event.button(),
        shift: event.shift_key(),
        alt: event.alt_key(),
    }
}

/// Listeners that may call `prevent_default` must not be passive.
fn active() -> EventListenerOptions {
    EventListenerOptions::enable_prevent_default()
}

fn on_click(targets: &[HtmlElement], viewer: &Viewer<DomView>, action: fn(&Viewer<DomView>)) -> Vec<EventListener> {
    targets
        .iter()
        .map(|el| {
            let viewer = viewer.clone();
            EventListener::new(el, "click", move |_| action(&viewer))
        })
        .collect()
}

/// Hooks buttons, slider, pointer, wheel, touch and keyboard input up to the
/// viewer. Dropping the returned listeners detaches everything.
pub fn install_listeners(viewer: &Viewer<DomView>) -> Vec<EventListener> {
    let view = viewer.view();
    let el = view.elements();
    let container: &Element = &el.container;
    let mut listeners = Vec::new();

    // ------ BUTTONS ------
    listeners.extend(on_click(&el.zoom_in, viewer, Viewer::zoom_in));
    listeners.extend(on_click(&el.zoom_out, viewer, Viewer::zoom_out));
    listeners.extend(on_click(&el.reset, viewer, Viewer::reset));
    listeners.extend(on_click(&el.center, viewer, Viewer::center_view));
    if viewer.coordinates_enabled() {
        listeners.extend(on_click(&el.coord_copy, viewer, |viewer| {
            let viewer = viewer.clone();
            spawn_local(async move {
                viewer.copy_center_coordinates().await;
            });
        }));
    }

    // ------ SLIDER ------
    for slider in &el.sliders {
        let viewer = viewer.clone();
        let input = slider.clone();
        listeners.push(EventListener::new(slider, "input", move |_| {
            viewer.handle_slider_input(&input.value());
        }));
    }

    // ------ WHEEL ------
    {
        let viewer = viewer.clone();
        listeners.push(EventListener::new_with_options(container, "wheel", active(), move |event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            let input = WheelInput {
                delta_x: wheel.delta_x(),
                delta_y: wheel.delta_y(),
                client_x: wheel.client_x() as f64,
                client_y: wheel.client_y() as f64,
            };
            if viewer.handle_mouse_wheel(&input) {
                event.prevent_default();
            }
        }));
    }

    // ------ DRAG ------
    {
        let viewer = viewer.clone();
        listeners.push(EventListener::new_with_options(container, "mousedown", active(), move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            if mouse.button() == 0 && viewer.begin_drag(mouse.client_x() as f64, mouse.client_y() as f64) {
                event.prevent_default();
            }
        }));
    }
    {
        let viewer = viewer.clone();
        listeners.push(EventListener::new(&window(), "mousemove", move |event| {
            if !viewer.is_dragging() {
                return;
            }
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                viewer.drag_to(mouse.client_x() as f64, mouse.client_y() as f64);
            }
        }));
    }
    {
        let viewer = viewer.clone();
        listeners.push(EventListener::new(&window(), "mouseup", move |_| viewer.end_drag()));
    }

    // ------ CLICK ZOOM ------
    {
        let viewer = viewer.clone();
        listeners.push(EventListener::new_with_options(container, "click", active(), move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                if viewer.handle_click(&click_input(mouse)) {
                    event.prevent_default();
                }
            }
        }));
    }
    {
        let viewer = viewer.clone();
        listeners.push(EventListener::new_with_options(container, "contextmenu", active(), move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let input = ClickInput {
                    button: 2,
                    ..click_input(mouse)
                };
                if viewer.handle_click(&input) {
                    event.prevent_default();
                }
            }
        }));
    }

    // ------ TOUCH ------
    {
        let viewer = viewer.clone();
        listeners.push(EventListener::new_with_options(container, "touchstart", active(), move |event| {
            if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                if viewer.touch_start(&touch_points(touch)) {
                    event.prevent_default();
                }
            }
        }));
    }
    {
        let viewer = viewer.clone();
        listeners.push(EventListener::new_with_options(container, "touchmove", active(), move |event| {
            if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                if viewer.touch_move(&touch_points(touch)) {
                    event.prevent_default();
                }
            }
        }));
    }
    for name in ["touchend", "touchcancel"] {
        let viewer = viewer.clone();
        listeners.push(EventListener::new(container, name, move |event| {
            if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                viewer.touch_end(&touch_points(touch));
            }
        }));
    }

    // ------ KEYBOARD ------
    if let Some(wrapper) = &el.wrapper {
        let viewer = viewer.clone();
        listeners.push(EventListener::new_with_options(wrapper, "keydown", active(), move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if viewer.handle_key(&key.key(), key.ctrl_key(), key.meta_key()) {
                event.prevent_default();
            }
        }));
    }

    listeners
}

/// A viewer attached to its DOM subtree. Dropping it detaches all listeners
/// and cancels any running animation.
pub struct MountedViewer {
    pub viewer: Viewer<DomView>,
    _listeners: Vec<EventListener>,
}

/// Resolves options, binds the existing subtree, wires events and starts the
/// SVG fetch. Returns before the content has loaded.
pub fn mount(options: &ViewerOptions) -> Result<MountedViewer> {
    let config = resolve(options)?;
    let view = DomView::locate(&config.viewer_id)?;
    let viewer = Viewer::with_config(config, view);
    let listeners = install_listeners(&viewer);

    let loading = viewer.clone();
    spawn_local(async move {
        loading.load().await;
    });

    log::info!("SVG viewer {} mounted", viewer.id());
    Ok(MountedViewer {
        viewer,
        _listeners: listeners,
    })
}
