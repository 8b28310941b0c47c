//! Layout module orchestrator.
//!
//! Downstream code imports layout types from here while the packing engine
//! lives in the private `core` module.

mod core;
pub mod gesture;
pub mod responsive;

pub use core::{ActiveItem, Layout, LayoutEngine, LayoutItem};
pub use gesture::{Gesture, PointerGesture};
pub use responsive::ResponsiveLayouts;
