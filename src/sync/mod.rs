//! Synchronizer: the only path by which resolved geometry reaches the
//! section store.

mod core;

pub use core::{SyncReport, Synchronizer};
