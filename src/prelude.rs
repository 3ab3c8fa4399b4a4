//! `use bevy_flowfield_routes::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::flowfields::{
	config::*,
	fields::{flow_field::*, passability_field::*, *},
	routes::*,
	utilities::*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	plugin::{cost_layer::*, flow_layer::*, *},
};
