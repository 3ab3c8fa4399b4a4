//! A single flow field always funnels actors down the one cheapest path. For
//! variety a [RouteGraph] discovers the materially distinct ways of getting
//! from a source to a target, gives each a sampling weight and builds a
//! dedicated [FlowField] per route.
//!
//! Discovery works in stages:
//!
//! 1. Distance fields are computed from both the source and the target
//! 2. The solution band keeps every cell whose detour costs no more than the
//!    optimal distance plus a map sized slack
//! 3. Band cells with three or more band neighbours are junctions, touching
//!    junctions merge into components and the single-file corridors between
//!    them become edges of a contracted graph
//! 4. Simple paths through the contracted graph become routes
//! 5. Each route's field treats every band cell it does not use as a wall,
//!    so an actor steering by it cannot drift onto a sibling corridor
//!
//! Route discovery is expensive compared to a cached field update and is
//! meant to be run on discrete events, such as an actor spawning.
//!

mod route_graph_node_edges;
mod solution_band;

use std::collections::HashMap;

use crate::prelude::*;
use bevy::prelude::*;
use route_graph_node_edges::ContractedGraph;
use solution_band::SolutionBand;

/// A junction where routes diverge. Shared between every route passing
/// through it so that the same fork can be recognised across routes
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub struct BranchPoint {
	/// Unique within its [RouteGraph]
	id: usize,
	/// Cell standing in for the junction
	cell: GridCell,
	/// Number of ways out of the junction
	choice_count: usize,
}

impl BranchPoint {
	/// Get the ID
	pub fn get_id(&self) -> usize {
		self.id
	}
	/// Get the cell
	pub fn get_cell(&self) -> GridCell {
		self.cell
	}
	/// Get the number of choices
	pub fn get_choice_count(&self) -> usize {
		self.choice_count
	}
}

/// Which way a route leaves a [BranchPoint]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub struct BranchChoice {
	/// ID of the [BranchPoint] being resolved
	branch_point: usize,
	/// Index of the way out taken, below the branch point's choice count
	choice: usize,
}

impl BranchChoice {
	/// Get the ID of the [BranchPoint]
	pub fn get_branch_point(&self) -> usize {
		self.branch_point
	}
	/// Get the choice index
	pub fn get_choice(&self) -> usize {
		self.choice
	}
}

/// A cell along a [Route]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub struct Waypoint {
	/// Position
	cell: GridCell,
	/// Set when the waypoint resolves a fork
	branch: Option<BranchChoice>,
}

impl Waypoint {
	/// Create a waypoint that resolves no fork
	pub fn new(cell: GridCell) -> Self {
		Waypoint { cell, branch: None }
	}
	/// Create a waypoint taking `choice` at `branch_point`
	pub fn at_branch(cell: GridCell, branch_point: usize, choice: usize) -> Self {
		Waypoint {
			cell,
			branch: Some(BranchChoice {
				branch_point,
				choice,
			}),
		}
	}
	/// Get the cell
	pub fn get_cell(&self) -> GridCell {
		self.cell
	}
	/// Get the fork resolved here, if any
	pub fn get_branch(&self) -> Option<BranchChoice> {
		self.branch
	}
}

/// One way from the source to the target along with the field that keeps an
/// actor on it
#[derive(Clone, Debug)]
pub struct Route {
	/// Stable within its [RouteGraph]
	id: usize,
	/// Source, the forks taken in order, then the target
	waypoints: Vec<Waypoint>,
	/// Weighted cost from source to target along this route
	total_distance: i32,
	/// Normalised sampling weight
	weight: f32,
	/// Field that treats sibling corridors as walls
	field: FlowField,
}

impl Route {
	/// Get the ID
	pub fn get_id(&self) -> usize {
		self.id
	}
	/// Get the waypoints
	pub fn get_waypoints(&self) -> &[Waypoint] {
		&self.waypoints
	}
	/// Get the weighted cost of the whole route
	pub fn get_total_distance(&self) -> i32 {
		self.total_distance
	}
	/// Get the sampling weight
	pub fn get_weight(&self) -> f32 {
		self.weight
	}
	/// Get the route's own [FlowField]
	pub fn get_field(&self) -> &FlowField {
		&self.field
	}
	/// Direction an actor committed to this route should move from `(x, y)`
	pub fn get_direction(&self, x: i32, y: i32) -> Ordinal {
		self.field.get_direction(x, y)
	}
	/// Distance to the target along this route, `-1` if unreachable
	pub fn get_distance(&self, x: i32, y: i32) -> i32 {
		self.field.get_distance(x, y)
	}
}

/// The distinct routes between a source and a target
#[derive(Clone, Debug)]
pub struct RouteGraph {
	/// Where the routes start
	source: GridCell,
	/// Where the routes end
	target: GridCell,
	/// Body the routes were planned for
	footprint: Footprint,
	/// Cost of the shortest path ignoring route constraints
	optimal_distance: i32,
	/// Forks shared between routes
	branch_points: Vec<BranchPoint>,
	/// Discovered routes, IDs match their index
	routes: Vec<Route>,
}

impl RouteGraph {
	/// A graph of one route where no fork exists between source and target
	fn trivial(
		source: GridCell,
		target: GridCell,
		footprint: Footprint,
		optimal_distance: i32,
		field: FlowField,
	) -> Self {
		RouteGraph {
			source,
			target,
			footprint,
			optimal_distance,
			branch_points: Vec::new(),
			routes: vec![Route {
				id: 0,
				waypoints: vec![Waypoint::new(source), Waypoint::new(target)],
				total_distance: optimal_distance,
				weight: 1.0,
				field,
			}],
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
	/// Get the shortest possible distance from source to target
	pub fn get_optimal_distance(&self) -> i32 {
		self.optimal_distance
	}
	/// Get the branch points
	pub fn get_branch_points(&self) -> &[BranchPoint] {
		&self.branch_points
	}
	/// Get the routes
	pub fn get_routes(&self) -> &[Route] {
		&self.routes
	}
	/// Get a route by its ID
	pub fn get_route(&self, id: usize) -> Option<&Route> {
		self.routes.iter().find(|r| r.id == id)
	}
	/// Pick a route by weight. `roll` is a uniform sample in `[0, 1)` owned
	/// by the caller so that selection stays deterministic under a seeded
	/// source of randomness
	pub fn sample_route(&self, roll: f32) -> Option<&Route> {
		let roll = roll.clamp(0.0, 1.0);
		let mut cumulative = 0.0;
		for route in self.routes.iter() {
			cumulative += route.weight;
			if roll < cumulative {
				return Some(route);
			}
		}
		self.routes.last()
	}
}

/// Discover the routes from `source` to `target`.
///
/// For a composite `footprint` the raw walls of `is_blocked` are first turned
/// into a [CompositePassability] so that routes are planned for the header
/// of the body. Returns [None] if either end is outside the grid or blocked,
/// or if the target cannot be reached
pub fn compute_route_graph<P: BlockedPredicate + ?Sized>(
	source: GridCell,
	target: GridCell,
	dimensions: GridDimensions,
	footprint: Footprint,
	is_blocked: &P,
	config: &NavigationConfig,
) -> Option<RouteGraph> {
	if footprint.is_composite() {
		let mut passability = CompositePassability::new(dimensions, footprint);
		passability.compute(is_blocked);
		build_route_graph(source, target, dimensions, footprint, &passability, config)
	} else {
		build_route_graph(source, target, dimensions, footprint, is_blocked, config)
	}
}

/// A route candidate that survived constraint
struct Candidate {
	/// Edge indices of the contracted graph
	path: Vec<usize>,
	/// Source distance in the constrained field
	distance: i32,
	/// The constrained field
	field: FlowField,
}

/// Route discovery against a predicate that already accounts for the body
fn build_route_graph<P: BlockedPredicate + ?Sized>(
	source: GridCell,
	target: GridCell,
	dimensions: GridDimensions,
	footprint: Footprint,
	is_blocked: &P,
	config: &NavigationConfig,
) -> Option<RouteGraph> {
	for cell in [source, target] {
		let (x, y) = cell.get();
		if !dimensions.in_bounds(x, y) || is_blocked.is_blocked(x, y) {
			debug!("Route request rejected, {:?} is out of bounds or blocked", cell);
			return None;
		}
	}
	let mut from_source = FlowField::from_config(dimensions, config);
	from_source.compute(&[source], is_blocked, None);
	let mut from_target = FlowField::from_config(dimensions, config);
	from_target.compute(&[target], is_blocked, None);
	let optimal = from_source.get_distance(target.get_x(), target.get_y());
	if optimal < 0 {
		debug!("No path from {:?} to {:?}", source, target);
		return None;
	}
	let step_costs = config.get_step_costs();
	let tolerance = dimensions.get_width().max(dimensions.get_height()) as i64
		* step_costs.get_diagonal() as i64
		/ 2;
	let budget = optimal as i64 + tolerance;
	let band = SolutionBand::new(&from_source, &from_target, budget, source, target, is_blocked);
	let source_node = band.get_component_of(source)?;
	let target_node = band.get_component_of(target)?;
	if source_node == target_node {
		trace!("Source and target share a junction component, single route");
		return Some(RouteGraph::trivial(source, target, footprint, optimal, from_target));
	}

	let graph = ContractedGraph::contract(&band, step_costs, is_blocked);
	let components = band.get_components();
	let paths = graph.enumerate_paths(
		source_node,
		target_node,
		config.get_max_routes(),
		config.get_max_branch_fanout(),
		budget,
		|node| {
			let (x, y) = components[node].get_representative().get();
			from_target.get_distance(x, y) as i64
		},
	);

	let mut candidates = Vec::new();
	for path in paths {
		let allowed = allowed_cells(&band, &graph, source_node, &path);
		let constrained = |x: i32, y: i32| {
			is_blocked.is_blocked(x, y)
				|| (band.contains(x, y) && !dimensions.index(x, y).is_some_and(|i| allowed[i]))
		};
		let mut field = FlowField::from_config(dimensions, config);
		field.compute(&[target], &constrained, None);
		let distance = field.get_distance(source.get_x(), source.get_y());
		if distance < 0 {
			trace!("Dropping a route its own constraints made unreachable");
			continue;
		}
		candidates.push(Candidate {
			path,
			distance,
			field,
		});
	}
	if candidates.is_empty() {
		debug!("No route survived constraint, falling back to the shortest path");
		return Some(RouteGraph::trivial(source, target, footprint, optimal, from_target));
	}

	// every junction a route leaves that offers more than one way out is a fork
	let mut branch_points: Vec<BranchPoint> = Vec::new();
	let mut branch_of_node: HashMap<usize, usize> = HashMap::new();
	for candidate in candidates.iter() {
		for edge in candidate.path.iter() {
			let node = graph.get_edge(*edge).get_from();
			let choice_count = graph.get_outgoing(node).len();
			if choice_count < 2 || branch_of_node.contains_key(&node) {
				continue;
			}
			branch_of_node.insert(node, branch_points.len());
			branch_points.push(BranchPoint {
				id: branch_points.len(),
				cell: components[node].get_representative(),
				choice_count,
			});
		}
	}

	let distances: Vec<i32> = candidates.iter().map(|c| c.distance).collect();
	let weights = assign_weights(&distances, config.get_min_route_weight());
	let mut routes = Vec::with_capacity(candidates.len());
	for (id, (candidate, weight)) in candidates.into_iter().zip(weights).enumerate() {
		let mut waypoints = vec![Waypoint::new(source)];
		for edge in candidate.path.iter() {
			let node = graph.get_edge(*edge).get_from();
			let Some(branch) = branch_of_node.get(&node).copied() else {
				continue;
			};
			let choice = graph
				.get_outgoing(node)
				.iter()
				.position(|outgoing| outgoing == edge)
				.unwrap_or(0);
			waypoints.push(Waypoint::at_branch(branch_points[branch].cell, branch, choice));
		}
		waypoints.push(Waypoint::new(target));
		routes.push(Route {
			id,
			waypoints,
			total_distance: candidate.distance,
			weight,
			field: candidate.field,
		});
	}
	debug!(
		"Route graph from {:?} to {:?} found {} routes with {} branch points",
		source,
		target,
		routes.len(),
		branch_points.len()
	);
	Some(RouteGraph {
		source,
		target,
		footprint,
		optimal_distance: optimal,
		branch_points,
		routes,
	})
}

/// Cells a route may use: every junction component it passes through and the
/// corridors of the edges it takes
fn allowed_cells(
	band: &SolutionBand,
	graph: &ContractedGraph,
	source_node: usize,
	path: &[usize],
) -> Vec<bool> {
	let dimensions = band.get_dimensions();
	let mut allowed = vec![false; dimensions.get_cell_count()];
	let mut allow = |cell: &GridCell| {
		if let Some(i) = dimensions.index(cell.get_x(), cell.get_y()) {
			allowed[i] = true;
		}
	};
	let components = band.get_components();
	components[source_node].get_cells().iter().for_each(&mut allow);
	for edge in path.iter().map(|e| graph.get_edge(*e)) {
		components[edge.get_to()].get_cells().iter().for_each(&mut allow);
		allow(&edge.get_entry());
		edge.get_corridor().iter().for_each(&mut allow);
	}
	allowed
}

/// Turn route distances into sampling weights that sum to 1.
///
/// Shorter routes are favoured in proportion to how much shorter they are.
/// No weight ends up below `floor`, routes under it are pinned to it and the
/// rest rescaled, unless `floor` is too large for every route to reach it in
/// which case the weights are uniform
fn assign_weights(distances: &[i32], floor: f32) -> Vec<f32> {
	let n = distances.len();
	if n == 0 {
		return Vec::new();
	}
	let uniform = vec![1.0 / n as f32; n];
	if distances.iter().all(|d| *d == 0) || floor * n as f32 >= 1.0 {
		return uniform;
	}
	let longest = distances.iter().copied().max().unwrap_or(0).max(1) as f32;
	let raw: Vec<f32> = distances.iter().map(|d| longest / (*d).max(1) as f32).collect();
	let total: f32 = raw.iter().sum();
	let mut weights: Vec<f32> = raw.iter().map(|w| w / total).collect();
	let mut pinned = vec![false; n];
	loop {
		let mut changed = false;
		for (weight, pin) in weights.iter().zip(pinned.iter_mut()) {
			if !*pin && *weight < floor {
				*pin = true;
				changed = true;
			}
		}
		if !changed {
			break;
		}
		let free: f32 = raw
			.iter()
			.zip(pinned.iter())
			.filter(|(_, pin)| !**pin)
			.map(|(w, _)| *w)
			.sum();
		let share = 1.0 - floor * pinned.iter().filter(|p| **p).count() as f32;
		for ((weight, pin), w) in weights.iter_mut().zip(pinned.iter()).zip(raw.iter()) {
			*weight = if *pin { floor } else { w / free * share };
		}
	}
	weights
}
