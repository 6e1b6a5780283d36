// src/components/mod.rs
pub mod svg_viewer;
