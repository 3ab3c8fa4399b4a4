//! Drive the plugin through a Bevy [App] the way a host would
//!

use bevy::prelude::*;
use bevy_flowfield_routes::prelude::*;

/// An app with the plugin, a clock and the given grid
fn app_with_grid(grid: ObstacleGrid) -> App {
	let mut app = App::new();
	app.add_plugins(FlowFieldRoutesPlugin)
		.init_resource::<Time>()
		.insert_resource(grid);
	app
}

#[test]
fn cache_computes_on_first_tick() {
	let grid = ObstacleGrid::new(20, 20);
	let mut app = app_with_grid(grid.clone());
	let config = NavigationConfig::default();
	let entity = app
		.world_mut()
		.spawn(FlowFieldBundle::new(&grid, &config, vec![GridCell::new(10, 10)]))
		.id();
	app.update();
	let cache = app.world().get::<FlowFieldCache>(entity).unwrap();
	assert!(cache.get_field().is_valid());
	assert_eq!(0, cache.get_distance(10, 10));
	assert_eq!(Ordinal::East, cache.get_direction(9, 10));
}

#[test]
fn moved_targets_are_followed() {
	let grid = ObstacleGrid::new(20, 20);
	let mut app = app_with_grid(grid.clone());
	let config = NavigationConfig::default();
	let entity = app
		.world_mut()
		.spawn(FlowFieldBundle::new(&grid, &config, vec![GridCell::new(10, 10)]))
		.id();
	app.update();
	// far enough to skip the cooldown
	app.world_mut()
		.get_mut::<FlowTargets>(entity)
		.unwrap()
		.set(vec![GridCell::new(15, 10)]);
	app.update();
	let cache = app.world().get::<FlowFieldCache>(entity).unwrap();
	assert_eq!(0, cache.get_distance(15, 10));
}

#[test]
fn nothing_runs_without_a_grid() {
	let mut app = App::new();
	app.add_plugins(FlowFieldRoutesPlugin).init_resource::<Time>();
	let grid = ObstacleGrid::new(5, 5);
	let entity = app
		.world_mut()
		.spawn(FlowFieldBundle::new(&grid, &NavigationConfig::default(), vec![GridCell::new(1, 1)]))
		.id();
	app.update();
	let cache = app.world().get::<FlowFieldCache>(entity).unwrap();
	assert!(!cache.get_field().is_valid());
}

#[test]
fn route_requests_are_answered_one_per_tick() {
	let grid = ObstacleGrid::from_rows(&[
		"...........",
		"...#####...",
		"...#####...",
		"...#####...",
		"...#####...",
		"...#####...",
		"...........",
	]);
	let mut app = app_with_grid(grid);
	let first = EventRouteRequest::new(GridCell::new(1, 3), GridCell::new(9, 3));
	let second = EventRouteRequest::new(GridCell::new(0, 0), GridCell::new(10, 6));
	let first_key = first.get_metadata();
	let second_key = second.get_metadata();
	app.world_mut().send_event(first);
	app.world_mut().send_event(EventRouteRequest::new(GridCell::new(1, 3), GridCell::new(9, 3)));
	app.world_mut().send_event(second);
	app.update();
	{
		let cache = app.world().resource::<RouteCache>();
		let graph = cache.get_route_graph(&first_key).unwrap();
		assert_eq!(2, graph.get_routes().len());
		// the duplicate was dropped, only the second request is waiting
		assert_eq!(1, cache.get_queue().len());
		assert_eq!(Some(&second_key), cache.get_queue().front());
	}
	app.update();
	let cache = app.world().resource::<RouteCache>();
	assert!(cache.get_route_graph(&second_key).is_some());
	assert!(cache.get_queue().is_empty());
}

#[test]
fn impossible_requests_are_not_cached() {
	let grid = ObstacleGrid::from_rows(&["..#..", "..#..", "..#.."]);
	let mut app = app_with_grid(grid);
	let request = EventRouteRequest::new(GridCell::new(0, 0), GridCell::new(4, 0));
	let key = request.get_metadata();
	app.world_mut().send_event(request);
	app.update();
	let cache = app.world().resource::<RouteCache>();
	assert!(cache.get_route_graph(&key).is_none());
	assert!(cache.get_queue().is_empty());
}

#[test]
fn obstacle_edit_purges_routes_and_refreshes_fields() {
	let grid = ObstacleGrid::new(12, 12);
	let config = NavigationConfig::default().with_min_ticks_between_compute(2);
	let mut app = app_with_grid(grid.clone());
	app.insert_resource(config.clone());
	let entity = app
		.world_mut()
		.spawn(FlowFieldBundle::new(&grid, &config, vec![GridCell::new(6, 6)]))
		.id();
	let request = EventRouteRequest::new(GridCell::new(0, 0), GridCell::new(6, 6));
	let key = request.get_metadata();
	app.world_mut().send_event(request);
	app.update();
	assert!(app.world().resource::<RouteCache>().get_route_graph(&key).is_some());
	assert_eq!(10, app.world().get::<FlowFieldCache>(entity).unwrap().get_distance(5, 6));

	app.world_mut().resource_mut::<ObstacleGrid>().set_blocked(5, 6, true);
	app.world_mut().send_event(EventObstaclesChanged::single(GridCell::new(5, 6)));
	app.update();
	assert!(app.world().resource::<RouteCache>().get_route_graph(&key).is_none());
	// one more tick to satisfy the cooldown
	app.update();
	let cache = app.world().get::<FlowFieldCache>(entity).unwrap();
	assert!(!cache.is_pending());
	assert_eq!(-1, cache.get_distance(5, 6));
	// corners of the new wall cannot be cut
	assert_eq!(40, cache.get_distance(4, 6));
}

#[test]
fn composite_entities_use_their_footprint() {
	let grid = ObstacleGrid::from_rows(&[
		".......",
		"...#...",
		".......",
		".......",
		".......",
	]);
	let mut app = app_with_grid(grid.clone());
	let config = NavigationConfig::default();
	let entity = app
		.world_mut()
		.spawn(CompositeFlowFieldBundle::new(
			&grid,
			Footprint::new(2, 2, 0, 0),
			&config,
			vec![GridCell::new(5, 2)],
		))
		.id();
	app.update();
	let cache = app.world().get::<FlowFieldCache>(entity).unwrap();
	assert_eq!(0, cache.get_distance(5, 2));
	// a single cell actor could stand here, a 2x2 body would overlap the wall
	assert_eq!(-1, cache.get_distance(2, 0));
	assert!(cache.get_distance(0, 0) > 0);
}
