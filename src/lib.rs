//! This is a plugin for Bevy game engine to calculate cached FlowFields on a
//! mutable obstacle grid, precompute where multi-cell actors fit and discover
//! the distinct routes between two points
//!

pub mod bundle;
pub mod flowfields;
pub mod plugin;

pub mod prelude;
