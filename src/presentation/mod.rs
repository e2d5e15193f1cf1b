//! The display tree, its HTML rendering and the drivers around it.

pub mod app;
pub mod components;
pub mod session;
pub mod surface;
pub mod views;
