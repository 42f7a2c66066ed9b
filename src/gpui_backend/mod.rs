//! GPUI integration for gpui_payoff.
//!
//! This module provides a GPUI view that acts as the host chart for the
//! draggable-points overlay: it projects data through its viewport, routes
//! mouse input to the gesture adapter, and pans when native scrolling is on.

mod config;
mod frame;
mod paint;
mod state;
mod text;
mod view;

pub use config::PayoffViewConfig;
pub use view::{GpuiPayoffView, PayoffHandle};
