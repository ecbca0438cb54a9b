//! egui user interface: state, controller and renderer.
/// App controller bridging state and IO.
pub mod controller;
/// Shared state types and the home-screen reducer.
pub mod state;
/// egui renderer.
pub mod ui;
/// Domain-to-view conversions.
pub mod view_model;
