//! Logic relating to keeping [FlowFieldCache]s current and answering route
//! requests with cached [RouteGraph]s
//!

use std::{
	collections::{BTreeMap, VecDeque},
	time::Duration,
};

use crate::prelude::*;
use bevy::prelude::*;

/// Cached route graphs older than this are purged
pub const ROUTE_EXPIRY: Duration = Duration::from_secs(900);

/// A request to discover the routes from a source to a target for actors of
/// a given footprint
#[derive(Event)]
pub struct EventRouteRequest {
	/// Where the actor is
	source: GridCell,
	/// Where the actor wants to go
	target: GridCell,
	/// Body of the actor
	footprint: Footprint,
}

impl EventRouteRequest {
	/// Create a new instance of [EventRouteRequest] for a single cell actor
	pub fn new(source: GridCell, target: GridCell) -> Self {
		EventRouteRequest {
			source,
			target,
			footprint: Footprint::single(),
		}
	}
	/// Create a new instance of [EventRouteRequest] for an actor of `footprint`
	pub fn with_footprint(source: GridCell, target: GridCell, footprint: Footprint) -> Self {
		EventRouteRequest {
			source,
			target,
			footprint,
		}
	}
	/// Get the key the answer is cached under
	pub fn get_metadata(&self) -> RouteMetadata {
		RouteMetadata::new(self.source, self.target, self.footprint)
	}
}

/// Identifies a cached [RouteGraph]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Reflect)]
pub struct RouteMetadata {
	/// Where the routes start
	source: GridCell,
	/// Where the routes end
	target: GridCell,
	/// Body the routes were planned for
	footprint: Footprint,
}

impl RouteMetadata {
	/// Create a new instance of [RouteMetadata]
	pub fn new(source: GridCell, target: GridCell, footprint: Footprint) -> Self {
		RouteMetadata {
			source,
			target,
			footprint,
		}
	}
	/// Get the source
	pub fn get_source(&self) -> GridCell {
		self.source
	}
	/// Get the target
	pub fn get_target(&self) -> GridCell {
		self.target
	}
	/// Get the footprint
	pub fn get_footprint(&self) -> Footprint {
		self.footprint
	}
}

/// Route graphs computed so far along with when they were generated, and the
/// requests still waiting to be computed
#[derive(Resource, Default)]
pub struct RouteCache {
	/// Computed graphs
	routes: BTreeMap<RouteMetadata, (Duration, RouteGraph)>,
	/// Requests not yet computed, oldest first
	queue: VecDeque<RouteMetadata>,
}

impl RouteCache {
	/// Get the cached graphs
	pub fn get_routes(&self) -> &BTreeMap<RouteMetadata, (Duration, RouteGraph)> {
		&self.routes
	}
	/// Get the graph cached for `metadata`
	pub fn get_route_graph(&self, metadata: &RouteMetadata) -> Option<&RouteGraph> {
		self.routes.get(metadata).map(|(_, graph)| graph)
	}
	/// Get the pending requests
	pub fn get_queue(&self) -> &VecDeque<RouteMetadata> {
		&self.queue
	}
	/// Queue a request unless it has already been answered or queued. Returns
	/// `true` if it was queued
	pub fn add_to_queue(&mut self, metadata: RouteMetadata) -> bool {
		if self.routes.contains_key(&metadata) || self.queue.contains(&metadata) {
			return false;
		}
		self.queue.push_back(metadata);
		true
	}
	/// Take the oldest pending request
	pub fn pop_queue(&mut self) -> Option<RouteMetadata> {
		self.queue.pop_front()
	}
	/// Store a computed graph
	pub fn insert_route_graph(
		&mut self,
		metadata: RouteMetadata,
		graph: RouteGraph,
		time_generated: Duration,
	) {
		self.routes.insert(metadata, (time_generated, graph));
	}
	/// Remove a cached graph
	pub fn remove_route_graph(&mut self, metadata: &RouteMetadata) -> Option<RouteGraph> {
		self.routes.remove(metadata).map(|(_, graph)| graph)
	}
	/// Remove every graph with a route that can reach a cell of `regions`.
	/// Returns the number of graphs removed
	pub fn purge_touching(&mut self, regions: &[RegionOfInterest]) -> usize {
		let before = self.routes.len();
		self.routes.retain(|_, (_, graph)| {
			!graph
				.get_routes()
				.iter()
				.any(|route| reaches_any(route.get_field(), regions))
		});
		before - self.routes.len()
	}
	/// Remove every graph generated before `elapsed - max_age`. Returns the
	/// number of graphs removed
	pub fn purge_older_than(&mut self, elapsed: Duration, max_age: Duration) -> usize {
		let before = self.routes.len();
		self.routes
			.retain(|_, (generated, _)| elapsed.saturating_sub(*generated) <= max_age);
		before - self.routes.len()
	}
}

/// Does `field` have a distance for any cell of `regions`
fn reaches_any(field: &FlowField, regions: &[RegionOfInterest]) -> bool {
	let dimensions = field.get_dimensions();
	regions.iter().filter_map(|r| r.clamp(&dimensions)).any(|region| {
		let (min, max) = (region.get_min(), region.get_max());
		(min.get_y()..=max.get_y())
			.any(|y| (min.get_x()..=max.get_x()).any(|x| field.get_distance(x, y) >= 0))
	})
}

/// Advance every [FlowFieldCache] by one tick towards its [FlowTargets]. An
/// entity with a [CompositePassability] has its field computed over header
/// positions instead of the raw [ObstacleGrid]
#[cfg(not(tarpaulin_include))]
pub fn update_flow_field_caches(
	grid: Res<ObstacleGrid>,
	mut query: Query<(&FlowTargets, &mut FlowFieldCache, Option<&CompositePassability>)>,
) {
	for (targets, mut cache, passability) in query.iter_mut() {
		let recomputed = match passability {
			Some(passability) => cache.update(targets.get(), passability),
			None => cache.update(targets.get(), &*grid),
		};
		if recomputed {
			trace!("Recomputed flow field towards {:?}", targets.get());
		}
	}
}

/// Read [EventRouteRequest]s and queue the ones without a cached answer.
/// Several actors often ask for the same thing in one tick so duplicates are
/// dropped here
#[cfg(not(tarpaulin_include))]
pub fn event_insert_route_queue(
	mut events: EventReader<EventRouteRequest>,
	mut cache: ResMut<RouteCache>,
) {
	for event in events.read() {
		if cache.add_to_queue(event.get_metadata()) {
			trace!("Queued route request {:?}", event.get_metadata());
		}
	}
}

/// Route discovery is expensive, compute a single queued request per tick
#[cfg(not(tarpaulin_include))]
pub fn process_route_queue(
	grid: Res<ObstacleGrid>,
	config: Res<NavigationConfig>,
	mut cache: ResMut<RouteCache>,
	time: Res<Time>,
) {
	let Some(metadata) = cache.pop_queue() else {
		return;
	};
	match compute_route_graph(
		metadata.get_source(),
		metadata.get_target(),
		grid.get_dimensions(),
		metadata.get_footprint(),
		&*grid,
		&config,
	) {
		Some(graph) => cache.insert_route_graph(metadata, graph, time.elapsed()),
		None => debug!("No routes exist for {:?}", metadata),
	}
}

/// Purge any route graphs older than [ROUTE_EXPIRY]
#[cfg(not(tarpaulin_include))]
pub fn cleanup_old_routes(mut cache: ResMut<RouteCache>, time: Res<Time>) {
	let purged = cache.purge_older_than(time.elapsed(), ROUTE_EXPIRY);
	if purged > 0 {
		debug!("Purged {} expired route graphs", purged);
	}
}
