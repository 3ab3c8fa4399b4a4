//! The solution band is every cell whose detour through it, source to cell
//! to target, costs no more than the optimal distance plus some slack.
//!
//! Within the band a cell with three or more band neighbours is a junction.
//! Touching junctions are merged into components, which become the nodes of
//! the contracted route graph, while the thin chains of cells between them
//! become its edges:
//!
//! ```text
//!  J J J c c c c c J J J
//!  J J J           J J J
//!  S J J           J J T
//!  J J J           J J J
//!  J J J c c c c c J J J
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A maximal group of touching junction cells
pub(super) struct JunctionComponent {
	/// Every junction cell of the component
	cells: Vec<GridCell>,
	/// The member closest to the centroid of the component
	representative: GridCell,
}

impl JunctionComponent {
	/// Get the member cells
	pub(super) fn get_cells(&self) -> &[GridCell] {
		&self.cells
	}
	/// Get the cell standing in for the whole component
	pub(super) fn get_representative(&self) -> GridCell {
		self.representative
	}
}

/// Band membership and junction components of a single route request
pub(super) struct SolutionBand {
	/// Size of the grid
	dimensions: GridDimensions,
	/// Whether each cell lies in the band
	in_band: Vec<bool>,
	/// The junction component each cell belongs to, if any
	component_of: Vec<Option<usize>>,
	/// Junction components indexed by their id
	components: Vec<JunctionComponent>,
}

impl SolutionBand {
	/// Build the band from a pair of distance fields, one rooted at the
	/// source and one at the target, admitting every cell whose combined
	/// distance is no greater than `limit`
	pub(super) fn new<P: BlockedPredicate + ?Sized>(
		from_source: &FlowField,
		from_target: &FlowField,
		limit: i64,
		source: GridCell,
		target: GridCell,
		is_blocked: &P,
	) -> Self {
		let dimensions = from_source.get_dimensions();
		let count = dimensions.get_cell_count();
		let mut in_band = vec![false; count];
		for (index, member) in in_band.iter_mut().enumerate() {
			let (x, y) = dimensions.cell_from_index(index).get();
			let to_source = from_source.get_distance(x, y);
			let to_target = from_target.get_distance(x, y);
			*member = to_source >= 0 && to_target >= 0 && to_source as i64 + to_target as i64 <= limit;
		}
		let mut band = SolutionBand {
			dimensions,
			in_band,
			component_of: vec![None; count],
			components: Vec::new(),
		};
		band.find_junction_components(source, target, is_blocked);
		let size = band.in_band.iter().filter(|b| **b).count();
		trace!(
			"Solution band holds {} cells in {} junction components",
			size,
			band.components.len()
		);
		band
	}
	/// Get the grid size
	pub(super) fn get_dimensions(&self) -> GridDimensions {
		self.dimensions
	}
	/// Is `(x, y)` part of the band
	pub(super) fn contains(&self, x: i32, y: i32) -> bool {
		self.dimensions.index(x, y).is_some_and(|i| self.in_band[i])
	}
	/// Get the id of the junction component containing `cell`
	pub(super) fn get_component_of(&self, cell: GridCell) -> Option<usize> {
		self.dimensions
			.index(cell.get_x(), cell.get_y())
			.and_then(|i| self.component_of[i])
	}
	/// Get every junction component
	pub(super) fn get_components(&self) -> &[JunctionComponent] {
		&self.components
	}
	/// Band cells that can be stepped to from `cell` without leaving the band
	/// or cutting a corner
	pub(super) fn band_neighbours<P: BlockedPredicate + ?Sized>(
		&self,
		cell: GridCell,
		is_blocked: &P,
	) -> Vec<(Ordinal, GridCell)> {
		let outside = |x: i32, y: i32| is_blocked.is_blocked(x, y) || !self.contains(x, y);
		let (x, y) = cell.get();
		Ordinal::ALL
			.into_iter()
			.filter(|ordinal| can_step(&self.dimensions, x, y, *ordinal, &outside))
			.map(|ordinal| (ordinal, cell.step(ordinal)))
			.collect()
	}
	/// Tag junction cells and flood fill them into components. The source and
	/// target are always junctions so that they anchor the graph
	fn find_junction_components<P: BlockedPredicate + ?Sized>(
		&mut self,
		source: GridCell,
		target: GridCell,
		is_blocked: &P,
	) {
		let count = self.dimensions.get_cell_count();
		let mut is_junction = vec![false; count];
		for (index, junction) in is_junction.iter_mut().enumerate() {
			if !self.in_band[index] {
				continue;
			}
			let cell = self.dimensions.cell_from_index(index);
			*junction = cell == source
				|| cell == target
				|| self.band_neighbours(cell, is_blocked).len() >= 3;
		}
		self.flood_junctions(&is_junction);
	}
	/// Merge junction cells touching in any of the 8 directions into
	/// components. Walls are ignored here, a pair of diagonal junctions with
	/// blocked corners still belongs to one component
	fn flood_junctions(&mut self, is_junction: &[bool]) {
		let mut stack = Vec::new();
		for start in 0..is_junction.len() {
			if !is_junction[start] || self.component_of[start].is_some() {
				continue;
			}
			let id = self.components.len();
			let mut cells = Vec::new();
			self.component_of[start] = Some(id);
			stack.push(self.dimensions.cell_from_index(start));
			while let Some(cell) = stack.pop() {
				cells.push(cell);
				for ordinal in Ordinal::ALL {
					let neighbour = cell.step(ordinal);
					let Some(index) = self.dimensions.index(neighbour.get_x(), neighbour.get_y()) else {
						continue;
					};
					if is_junction[index] && self.component_of[index].is_none() {
						self.component_of[index] = Some(id);
						stack.push(neighbour);
					}
				}
			}
			let representative = centroid_member(&cells);
			self.components.push(JunctionComponent {
				cells,
				representative,
			});
		}
	}
}

/// The member of `cells` nearest to their mean position
fn centroid_member(cells: &[GridCell]) -> GridCell {
	let n = cells.len().max(1) as f32;
	let mean_x = cells.iter().map(|c| c.get_x() as f32).sum::<f32>() / n;
	let mean_y = cells.iter().map(|c| c.get_y() as f32).sum::<f32>() / n;
	let mut best = GridCell::default();
	let mut best_distance = f32::MAX;
	for cell in cells {
		let dx = cell.get_x() as f32 - mean_x;
		let dy = cell.get_y() as f32 - mean_y;
		let distance = dx * dx + dy * dy;
		if distance < best_distance {
			best_distance = distance;
			best = *cell;
		}
	}
	best
}
