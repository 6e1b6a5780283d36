// src/components/svg_viewer.rs
use crate::dom::mount;
use crate::manifest::ViewerEntry;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SvgViewerProps {
    pub entry: ViewerEntry,
}

fn control(id: &str, class: &'static str, label: &'static str, text: &'static str) -> Html {
    html! {
        <button
            type="button"
            class={classes!("svg-viewer-btn", class)}
            data-viewer={id.to_string()}
            aria-label={label}
            title={label}
        >
            {text}
        </button>
    }
}

/// Renders the viewer markup and attaches a viewer engine to it once it is
/// in the document. The engine is torn down with the component.
#[function_component(SvgViewer)]
pub fn svg_viewer(props: &SvgViewerProps) -> Html {
    let entry = &props.entry;
    let id = entry.id().unwrap_or_default().to_string();
    let error = use_state(|| None::<String>);

    // ------ ENGINE ------
    {
        let error = error.clone();
        use_effect_with(entry.clone(), move |entry| {
            let mounted = match mount(&entry.resolved_options()) {
                Ok(mounted) => {
                    error.set(None);
                    Some(mounted)
                }
                Err(e) => {
                    log::error!("Failed to mount viewer: {}", e);
                    error.set(Some(e.to_string()));
                    None
                }
            };

            // Cleanup closure
            move || drop(mounted)
        });
    }

    let coordinates = if entry.show_coordinates() {
        html! {
            <>
                {control(&id, "coord-copy-btn", "Copy center coordinates", "⌖")}
                <span class="coord-output" data-viewer={id.clone()} aria-live="polite"></span>
            </>
        }
    } else {
        html! {}
    };

    let slider = if entry.slider {
        html! {
            <input
                type="range"
                class="zoom-slider"
                data-viewer={id.clone()}
                step="1"
                aria-label="Zoom level"
            />
        }
    } else {
        html! {}
    };

    html! {
        <div
            id={id.clone()}
            class={classes!("svg-viewer-wrapper", "is-loading", entry.class.clone())}
            tabindex="0"
        >
            <div class="svg-controls">
                {control(&id, "zoom-in-btn", "Zoom in", "+")}
                {control(&id, "zoom-out-btn", "Zoom out", "−")}
                {control(&id, "reset-zoom-btn", "Reset zoom", "⟲")}
                {control(&id, "center-view-btn", "Center view", "◎")}
                {coordinates}
                <span class="zoom-display">
                    <span class="zoom-percentage" data-viewer={id.clone()}>{"100"}</span>
                    {"%"}
                </span>
                {slider}
            </div>
            <div
                class="svg-container"
                data-viewer={id.clone()}
                style={format!("height: {};", entry.height)}
            >
                <div class="svg-viewport" data-viewer={id.clone()}></div>
            </div>
            if let Some(message) = (*error).clone() {
                <div class="error">{message}</div>
            }
        </div>
    }
}
