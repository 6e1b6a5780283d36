// src/manifest.rs
use crate::config::{resolve, ViewerOptions};
use crate::error::{Result, ViewerError};
use crate::utils::resource_url;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MANIFEST_URL: &str = "public/viewers.json";
pub const DEFAULT_HEIGHT: &str = "600px";

fn default_height() -> String {
    DEFAULT_HEIGHT.to_string()
}

/// Page listing the viewers to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerManifest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub viewers: Vec<ViewerEntry>,
}

/// One embedded viewer: its options plus the frame it is rendered in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerEntry {
    pub options: ViewerOptions,
    #[serde(default = "default_height")]
    pub height: String,
    /// Extra CSS class on the wrapper.
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub slider: bool,
}

impl ViewerManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: ViewerManifest = serde_json::from_str(json)
            .map_err(|e| ViewerError::invalid_value("manifest", MANIFEST_URL, e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn get_viewer_count(&self) -> usize {
        self.viewers.len()
    }

    /// Every entry needs a distinct, non-empty `viewerId`, since the DOM
    /// lookup is keyed on it.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.viewers {
            let id = match entry.id() {
                Some(id) if !id.trim().is_empty() => id,
                _ => {
                    return Err(ViewerError::invalid_value(
                        "viewerId",
                        "",
                        "a non-empty identifier",
                    ))
                }
            };
            if !seen.insert(id) {
                return Err(ViewerError::invalid_value(
                    "viewerId",
                    id,
                    "an identifier unique within the manifest",
                ));
            }
        }
        Ok(())
    }
}

impl ViewerEntry {
    pub fn id(&self) -> Option<&str> {
        self.options.viewer_id.as_deref()
    }

    /// Same answer the mounted viewer gives; entries that fail to resolve
    /// render no coordinate controls.
    pub fn show_coordinates(&self) -> bool {
        resolve(&self.options)
            .map(|config| config.show_coordinates)
            .unwrap_or(false)
    }

    /// Options with the SVG source passed through `locate`.
    pub fn options_with(&self, locate: impl Fn(&str) -> String) -> ViewerOptions {
        ViewerOptions {
            svg_url: self.options.svg_url.as_deref().map(locate),
            ..self.options.clone()
        }
    }

    /// Options with the SVG source resolved for the current page location.
    pub fn resolved_options(&self) -> ViewerOptions {
        self.options_with(resource_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::join_resource_url;

    fn new_entry(id: &str, svg_url: &str) -> ViewerEntry {
        ViewerEntry {
            options: ViewerOptions {
                viewer_id: Some(id.to_string()),
                svg_url: Some(svg_url.to_string()),
                ..Default::default()
            },
            height: default_height(),
            class: String::new(),
            slider: false,
        }
    }

    fn entry<'a>(manifest: &'a ViewerManifest, id: &str) -> &'a ViewerEntry {
        manifest.viewers.iter().find(|v| v.id() == Some(id)).unwrap()
    }

    const SAMPLE: &str = r#"{
        "title": "Floor plans",
        "viewers": [
            {
                "options": { "viewerId": "ground", "svgUrl": "ground.svg", "zoomMode": "click" },
                "class": "bordered",
                "slider": true
            },
            {
                "height": "400px",
                "options": { "viewerId": "roof", "svgUrl": "/public/svg/roof.svg", "showCoordinates": true }
            }
        ]
    }"#;

    #[test]
    fn test_manifest_defaults() {
        let manifest = ViewerManifest::from_json(SAMPLE).unwrap();
        assert_eq!(manifest.title, "Floor plans");
        assert_eq!(manifest.description, "");
        assert_eq!(manifest.get_viewer_count(), 2);

        let ground = entry(&manifest, "ground");
        assert_eq!(ground.height, DEFAULT_HEIGHT);
        assert_eq!(ground.class, "bordered");
        assert!(ground.slider);
        assert!(!ground.show_coordinates());
        assert_eq!(ground.options.zoom_mode.as_deref(), Some("click"));

        let roof = entry(&manifest, "roof");
        assert_eq!(roof.height, "400px");
        assert!(!roof.slider);
        assert!(roof.show_coordinates());

        let bad_mode = ViewerEntry {
            options: ViewerOptions {
                zoom_mode: Some("sideways".to_string()),
                show_coordinates: Some(true),
                ..roof.options.clone()
            },
            ..roof.clone()
        };
        assert!(!bad_mode.show_coordinates());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let manifest = ViewerManifest {
            title: "Dupes".to_string(),
            description: String::new(),
            viewers: vec![new_entry("a", "a.svg"), new_entry("a", "b.svg")],
        };
        let err = manifest.validate().unwrap_err();
        assert!(err.to_string().contains("unique"));
    }

    #[test]
    fn test_missing_id_rejected() {
        let json = r#"{ "title": "t", "viewers": [ { "options": { "svgUrl": "a.svg" } } ] }"#;
        assert!(matches!(
            ViewerManifest::from_json(json),
            Err(ViewerError::Configuration { field: "viewerId", .. })
        ));
    }

    #[test]
    fn test_malformed_manifest() {
        assert!(matches!(
            ViewerManifest::from_json("{ \"viewers\": 3 }"),
            Err(ViewerError::Configuration { field: "manifest", .. })
        ));
    }

    #[test]
    fn test_options_with_resolves_only_the_url() {
        let entry = new_entry("plan", "plan.svg");
        let options = entry.options_with(|p| join_resource_url("/svg-viewer", p));
        assert_eq!(options.svg_url.as_deref(), Some("/svg-viewer/public/svg/plan.svg"));
        assert_eq!(options.viewer_id.as_deref(), Some("plan"));
        assert_eq!(options.zoom_mode, entry.options.zoom_mode);
    }
}
