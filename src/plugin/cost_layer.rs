//! Logic for reacting to edits of the [ObstacleGrid]. Composite passability
//! around the edit is rebuilt, cached fields are flagged for a recompute and
//! cached routes that ran through the edit are dropped
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Sent by the host after it has edited the [ObstacleGrid]
#[derive(Event)]
pub struct EventObstaclesChanged {
	/// Cells that changed, inclusive
	region: RegionOfInterest,
}

impl EventObstaclesChanged {
	/// Create a new instance of [EventObstaclesChanged] covering every cell
	/// between `a` and `b`
	pub fn new(a: GridCell, b: GridCell) -> Self {
		EventObstaclesChanged {
			region: RegionOfInterest::new(a, b),
		}
	}
	/// Create a new instance of [EventObstaclesChanged] for a single cell
	pub fn single(cell: GridCell) -> Self {
		EventObstaclesChanged::new(cell, cell)
	}
	/// Get the changed region
	pub fn get_region(&self) -> RegionOfInterest {
		self.region
	}
}

/// Keep every field sized to the [ObstacleGrid]. A resized [FlowFieldCache]
/// recomputes on its next update and a resized [CompositePassability] is
/// recomputed straight away
#[cfg(not(tarpaulin_include))]
pub fn resize_fields(
	grid: Res<ObstacleGrid>,
	mut query: Query<
		(Option<&mut FlowFieldCache>, Option<&mut CompositePassability>),
		Or<(With<FlowFieldCache>, With<CompositePassability>)>,
	>,
) {
	let dimensions = grid.get_dimensions();
	let (width, height) = (dimensions.get_width(), dimensions.get_height());
	for (cache, passability) in query.iter_mut() {
		if let Some(mut cache) = cache {
			if cache.get_field().get_dimensions() != dimensions {
				debug!("Resizing flow field cache to {}x{}", width, height);
				cache.resize(width, height);
			}
		}
		if let Some(mut passability) = passability {
			if passability.get_dimensions() != dimensions {
				debug!("Resizing composite passability to {}x{}", width, height);
				passability.resize(width, height);
				passability.compute(&*grid);
			}
		}
	}
}

/// Read [EventObstaclesChanged] and bring everything derived from the
/// [ObstacleGrid] back in line with it
#[cfg(not(tarpaulin_include))]
pub fn process_obstacle_changes(
	mut events: EventReader<EventObstaclesChanged>,
	grid: Res<ObstacleGrid>,
	mut query: Query<
		(Option<&mut FlowFieldCache>, Option<&mut CompositePassability>),
		Or<(With<FlowFieldCache>, With<CompositePassability>)>,
	>,
	mut route_cache: ResMut<RouteCache>,
) {
	// coalesce events, the same wall may be toggled by several systems in a tick
	let mut regions: Vec<RegionOfInterest> = Vec::new();
	for event in events.read() {
		let region = event.get_region();
		if !regions.contains(&region) {
			regions.push(region);
		}
	}
	if regions.is_empty() {
		return;
	}
	for (cache, passability) in query.iter_mut() {
		if let Some(mut passability) = passability {
			let footprint = passability.get_footprint();
			for region in regions.iter() {
				passability.compute_region(&*grid, footprint.affected_headers(region));
			}
			if let Some(mut cache) = cache {
				let patched = cache.patch(&*passability);
				trace!("Patched {} header cells after an obstacle change", patched);
				cache.mark_dirty();
			}
		} else if let Some(mut cache) = cache {
			let patched = cache.patch(&*grid);
			trace!("Patched {} cells after an obstacle change", patched);
			cache.mark_dirty();
		}
	}
	let purged = route_cache.purge_touching(&regions);
	if purged > 0 {
		debug!("Purged {} cached route graphs crossing changed cells", purged);
	}
}
