//! The solution band contracted into a graph. Each junction component is a
//! node and each way of leaving a component and arriving at another is a
//! directed edge, either a direct step between two components or a corridor
//! of single-file band cells.
//!
//! The graph only lives for the duration of a route request, callers only
//! ever see the paths enumerated through it.
//!

use std::collections::HashSet;

use super::solution_band::SolutionBand;
use crate::prelude::*;
use bevy::prelude::*;

/// Upper limit of nodes visited while enumerating the paths of one request
const MAX_SEARCH_STEPS: usize = 100_000;

/// A directed connection between two junction components
pub(super) struct RouteGraphEdge {
	/// Component the edge leaves
	from: usize,
	/// Component the edge arrives at
	to: usize,
	/// First cell outside of `from` stepped onto
	entry: GridCell,
	/// Weighted cost of every step from `from` to `to`
	cost: i32,
	/// Non-junction cells walked through, empty for a direct edge
	corridor: Vec<GridCell>,
}

impl RouteGraphEdge {
	/// Get the component the edge leaves
	pub(super) fn get_from(&self) -> usize {
		self.from
	}
	/// Get the component the edge arrives at
	pub(super) fn get_to(&self) -> usize {
		self.to
	}
	/// Get the first cell beyond the origin component
	pub(super) fn get_entry(&self) -> GridCell {
		self.entry
	}
	/// Get the weighted cost
	pub(super) fn get_cost(&self) -> i32 {
		self.cost
	}
	/// Get the corridor cells
	pub(super) fn get_corridor(&self) -> &[GridCell] {
		&self.corridor
	}
}

/// A junction component and the edges leaving it
#[derive(Default)]
struct RouteGraphNode {
	/// Indices of the edges leaving this node
	outgoing: Vec<usize>,
}

/// The contracted band
pub(super) struct ContractedGraph {
	/// Nodes, indexed by junction component id
	nodes: Vec<RouteGraphNode>,
	/// Every edge of the graph
	edges: Vec<RouteGraphEdge>,
}

impl ContractedGraph {
	/// Contract `band` by scanning every neighbour of every junction cell.
	/// Edges are deduplicated by origin, destination and entry cell, corridors
	/// that dead end or lead back to their origin are dropped
	pub(super) fn contract<P: BlockedPredicate + ?Sized>(
		band: &SolutionBand,
		step_costs: StepCosts,
		is_blocked: &P,
	) -> Self {
		let mut nodes: Vec<RouteGraphNode> = (0..band.get_components().len())
			.map(|_| RouteGraphNode::default())
			.collect();
		let mut edges: Vec<RouteGraphEdge> = Vec::new();
		let mut seen: HashSet<(usize, usize, GridCell)> = HashSet::new();
		for (from, component) in band.get_components().iter().enumerate() {
			for cell in component.get_cells() {
				for (ordinal, entry) in band.band_neighbours(*cell, is_blocked) {
					let step = step_costs.cost_of(ordinal);
					let found = match band.get_component_of(entry) {
						Some(to) => Some((to, step, Vec::new())),
						None => walk_corridor(band, step_costs, is_blocked, *cell, entry, step),
					};
					let Some((to, cost, corridor)) = found else {
						continue;
					};
					if to == from || !seen.insert((from, to, entry)) {
						continue;
					}
					nodes[from].outgoing.push(edges.len());
					edges.push(RouteGraphEdge {
						from,
						to,
						entry,
						cost,
						corridor,
					});
				}
			}
		}
		trace!(
			"Contracted route graph has {} nodes and {} edges",
			nodes.len(),
			edges.len()
		);
		ContractedGraph { nodes, edges }
	}
	/// Get an edge by index
	pub(super) fn get_edge(&self, index: usize) -> &RouteGraphEdge {
		&self.edges[index]
	}
	/// Get the indices of the edges leaving `node`, in discovery order
	pub(super) fn get_outgoing(&self, node: usize) -> &[usize] {
		&self.nodes[node].outgoing
	}
	/// Depth first search for simple paths from `source` to `target`, each
	/// returned as a list of edge indices.
	///
	/// At most `max_routes` paths are returned and only the `max_fanout`
	/// most promising edges of a node are explored, ranked by edge cost plus
	/// `remaining` at the destination. Partial paths whose edge costs exceed
	/// `budget` are abandoned
	pub(super) fn enumerate_paths(
		&self,
		source: usize,
		target: usize,
		max_routes: usize,
		max_fanout: usize,
		budget: i64,
		remaining: impl Fn(usize) -> i64,
	) -> Vec<Vec<usize>> {
		let choices: Vec<Vec<usize>> = self
			.nodes
			.iter()
			.map(|node| {
				let mut ranked = node.outgoing.clone();
				ranked.sort_by_key(|e| self.edges[*e].cost as i64 + remaining(self.edges[*e].to));
				ranked.truncate(max_fanout);
				ranked
			})
			.collect();
		let mut search = PathSearch {
			graph: self,
			choices,
			target,
			max_routes,
			budget,
			on_path: vec![false; self.nodes.len()],
			path: Vec::new(),
			paths: Vec::new(),
			steps: 0,
		};
		search.visit(source, 0);
		if search.steps >= MAX_SEARCH_STEPS {
			debug!(
				"Route enumeration hit its search limit with {} paths",
				search.paths.len()
			);
		}
		search.paths
	}
}

/// Follow a corridor from `origin` through `entry` until it reaches a
/// junction component. Returns the component, accumulated cost and the
/// corridor cells, or [None] if the corridor dead ends
fn walk_corridor<P: BlockedPredicate + ?Sized>(
	band: &SolutionBand,
	step_costs: StepCosts,
	is_blocked: &P,
	origin: GridCell,
	entry: GridCell,
	entry_cost: i32,
) -> Option<(usize, i32, Vec<GridCell>)> {
	let limit = band.get_dimensions().get_cell_count();
	let mut previous = origin;
	let mut current = entry;
	let mut cost = entry_cost;
	let mut corridor = vec![entry];
	while corridor.len() <= limit {
		let (ordinal, next) = band
			.band_neighbours(current, is_blocked)
			.into_iter()
			.find(|(_, cell)| *cell != previous)?;
		cost += step_costs.cost_of(ordinal);
		if let Some(to) = band.get_component_of(next) {
			return Some((to, cost, corridor));
		}
		corridor.push(next);
		previous = current;
		current = next;
	}
	None
}

/// State of a single path enumeration
struct PathSearch<'a> {
	/// Graph being searched
	graph: &'a ContractedGraph,
	/// Ranked and truncated outgoing edges of each node
	choices: Vec<Vec<usize>>,
	/// Node paths must end at
	target: usize,
	/// Stop once this many paths have been found
	max_routes: usize,
	/// Largest accumulated edge cost of a path
	budget: i64,
	/// Nodes on the current partial path
	on_path: Vec<bool>,
	/// Edges of the current partial path
	path: Vec<usize>,
	/// Completed paths
	paths: Vec<Vec<usize>>,
	/// Nodes visited so far
	steps: usize,
}

impl PathSearch<'_> {
	/// Extend the partial path from `node`
	fn visit(&mut self, node: usize, cost: i64) {
		if self.paths.len() >= self.max_routes || self.steps >= MAX_SEARCH_STEPS {
			return;
		}
		self.steps += 1;
		if node == self.target {
			self.paths.push(self.path.clone());
			return;
		}
		self.on_path[node] = true;
		let graph = self.graph;
		for i in 0..self.choices[node].len() {
			let edge_index = self.choices[node][i];
			let edge = graph.get_edge(edge_index);
			let next_cost = cost + edge.get_cost() as i64;
			if self.on_path[edge.get_to()] || next_cost > self.budget {
				continue;
			}
			self.path.push(edge_index);
			self.visit(edge.get_to(), next_cost);
			self.path.pop();
		}
		self.on_path[node] = false;
	}
}
