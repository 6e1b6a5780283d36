// src/lib.rs
//! Pan and zoom viewer for SVG documents embedded in a page.
//!
//! The engine ([`viewer::Viewer`]) is independent of the browser and talks to
//! its surroundings through [`view::ViewBinding`]; [`dom`] provides the web-sys
//! binding, [`embed`] the JavaScript surface and [`components`] a Yew wrapper.

pub mod animator;
pub mod components;
pub mod config;
pub mod dom;
pub mod embed;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod loader;
pub mod manifest;
pub mod ui;
pub mod utils;
pub mod view;
pub mod viewer;

pub use config::{ResolvedConfig, ViewerOptions};
pub use error::{Result, ViewerError};
pub use viewer::{Viewer, ZoomOptions};
