// src/embed.rs
//
// JavaScript surface for host pages that render the viewer markup themselves
// and only need the engine attached to it.

use crate::config::{normalize_pan_mode, normalize_zoom_mode, ViewerOptions};
use crate::dom::{mount, MountedViewer};
use crate::geometry::{FocusSpec, ZoomDirection};
use crate::gesture::WheelInput;
use crate::viewer::ZoomOptions;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

fn from_js<T: DeserializeOwned + Default>(value: &JsValue) -> Result<T, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    let json: String = js_sys::JSON::stringify(value)
        .map_err(|_| JsError::new("value is not JSON-serializable"))?
        .into();
    Ok(serde_json::from_str(&json)?)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(|_| JsError::new("failed to build JS value"))
}

/// `{ animate, focusX, focusY, focusOffsetX, focusOffsetY }`, all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JsZoomOptions {
    animate: Option<bool>,
    #[serde(flatten)]
    focus: FocusSpec,
}

impl From<JsZoomOptions> for ZoomOptions {
    fn from(js: JsZoomOptions) -> Self {
        let focus = js.focus;
        let has_focus = focus.focus_x.is_some()
            || focus.focus_y.is_some()
            || focus.focus_offset_x.is_some()
            || focus.focus_offset_y.is_some();
        ZoomOptions {
            animate: js.animate,
            focus: has_focus.then_some(focus),
        }
    }
}

#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    wasm_logger::init(wasm_logger::Config::default());
}

#[wasm_bindgen(js_name = SVGViewer)]
pub struct EmbeddedViewer {
    mounted: MountedViewer,
}

#[wasm_bindgen(js_class = SVGViewer)]
impl EmbeddedViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<EmbeddedViewer, JsError> {
        let options: ViewerOptions = from_js(&config)?;
        let mounted = mount(&options).map_err(|e| {
            log::error!("{}", e);
            e
        })?;
        Ok(EmbeddedViewer { mounted })
    }

    #[wasm_bindgen(js_name = normalizePanMode)]
    pub fn normalize_pan_mode(raw: &str) -> Result<String, JsError> {
        Ok(normalize_pan_mode(raw)?.as_str().to_string())
    }

    #[wasm_bindgen(js_name = normalizeZoomMode)]
    pub fn normalize_zoom_mode(raw: &str) -> Result<String, JsError> {
        Ok(normalize_zoom_mode(raw)?.as_str().to_string())
    }

    #[wasm_bindgen(getter, js_name = currentZoom)]
    pub fn current_zoom(&self) -> f64 {
        self.mounted.viewer.current_zoom()
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&self, target: f64, options: JsValue) -> Result<(), JsError> {
        let options: JsZoomOptions = from_js(&options)?;
        self.mounted.viewer.set_zoom(target, options.into());
        Ok(())
    }

    #[wasm_bindgen(js_name = computeZoomTarget)]
    pub fn compute_zoom_target(&self, direction: &str) -> Result<f64, JsError> {
        let direction: ZoomDirection = direction.parse().map_err(|e: String| JsError::new(&e))?;
        Ok(self.mounted.viewer.compute_zoom_target(direction))
    }

    #[wasm_bindgen(js_name = getVisibleCenterPoint)]
    pub fn visible_center_point(&self) -> Result<JsValue, JsError> {
        to_js(&self.mounted.viewer.visible_center_point())
    }

    #[wasm_bindgen(js_name = handleMouseWheel)]
    pub fn handle_mouse_wheel(&self, event: &web_sys::WheelEvent) -> bool {
        let input = WheelInput {
            delta_x: event.delta_x(),
            delta_y: event.delta_y(),
            client_x: event.client_x() as f64,
            client_y: event.client_y() as f64,
        };
        let handled = self.mounted.viewer.handle_mouse_wheel(&input);
        if handled {
            event.prevent_default();
        }
        handled
    }

    #[wasm_bindgen(js_name = performWheelZoom)]
    pub fn perform_wheel_zoom(&self, delta_y: f64, client_x: f64, client_y: f64) -> bool {
        self.mounted.viewer.perform_wheel_zoom(&WheelInput {
            delta_x: 0.0,
            delta_y,
            client_x,
            client_y,
        })
    }

    /// Resolves with the copied `"x, y"` string.
    #[wasm_bindgen(js_name = copyCenterCoordinates)]
    pub fn copy_center_coordinates(&self) -> js_sys::Promise {
        let viewer = self.mounted.viewer.clone();
        future_to_promise(async move {
            let text = viewer.copy_center_coordinates().await;
            Ok(JsValue::from_str(&text))
        })
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&self) {
        self.mounted.viewer.reset();
    }

    #[wasm_bindgen(js_name = centerView)]
    pub fn center_view(&self) {
        self.mounted.viewer.center_view();
    }
}
