//! Breakpoint resolver.
//!
//! Maps a viewport width onto a named breakpoint and its column count.

mod core;

pub use core::{Breakpoint, BreakpointTable, BreakpointTransition};
