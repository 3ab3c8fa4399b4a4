//! Defines the Bevy [Plugin] for FlowFieldRoutes
//!
//! The host inserts an [ObstacleGrid] resource and spawns a [FlowFieldBundle]
//! (or [CompositeFlowFieldBundle]) for every group of actors sharing targets.
//! Each tick the cached fields advance towards their [FlowTargets], edits of
//! the grid are announced with [EventObstaclesChanged] and routes are
//! requested with [EventRouteRequest] and read back from the [RouteCache].
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod cost_layer;
pub mod flow_layer;

/// Order in which the systems of the plugin run
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Expire and resize cached data
	Tidy,
	/// Apply grid edits, update fields and answer route requests
	Calculate,
}

/// Registers the navigation systems, events and resources
pub struct FlowFieldRoutesPlugin;

impl Plugin for FlowFieldRoutesPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<Ordinal>()
			.register_type::<GridCell>()
			.register_type::<GridDimensions>()
			.register_type::<RegionOfInterest>()
			.register_type::<StepCosts>()
			.register_type::<Footprint>()
			.register_type::<ObstacleGrid>()
			.register_type::<NavigationConfig>()
			.register_type::<RouteMetadata>()
			.register_type::<Waypoint>()
			.register_type::<BranchPoint>()
			.init_resource::<NavigationConfig>()
			.init_resource::<RouteCache>()
			.add_event::<cost_layer::EventObstaclesChanged>()
			.add_event::<flow_layer::EventRouteRequest>()
			.configure_sets(
				Update,
				(OrderingSet::Tidy, OrderingSet::Calculate)
					.chain()
					.run_if(resource_exists::<ObstacleGrid>),
			)
			.add_systems(
				Update,
				(
					(flow_layer::cleanup_old_routes, cost_layer::resize_fields)
						.in_set(OrderingSet::Tidy),
					(
						cost_layer::process_obstacle_changes,
						flow_layer::update_flow_field_caches,
						flow_layer::event_insert_route_queue,
						flow_layer::process_route_queue,
					)
						.chain()
						.in_set(OrderingSet::Calculate),
				),
			);
	}
}
