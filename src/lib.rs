//! ENEM exam results dashboard.
//!
//! [`data`] is the UI-independent core: load the exam table, narrow it with a
//! [`FilterSpec`](data::filter::FilterSpec) and aggregate the subset. The
//! remaining modules wire that core into an egui application.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
