//! A [FlowField] is a pair of dense arrays covering a grid: the [Ordinal] an
//! actor standing on a cell should move in and the weighted distance from
//! that cell to the nearest target. A steering pipeline/character controller
//! reads and interprets a [FlowField] to provide movement.
//!
//! Fields are built with a multi-source Dijkstra expanding outwards from the
//! targets. When a cell is improved it records the direction back towards
//! the cell that reached it, which is the step an actor on it should take:
//!
//! ```text
//!  _____________________________
//! |     |     |     |     |     |
//! | 28  | 24  | 20  | 24  | 28  |
//! | SE  | SE  |  S  | SW  | SW  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! | 24  | 14  | 10  | 14  | 24  |
//! | SE  | SE  |  S  | SW  | SW  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! | 20  | 10  |  0  | 10  | 20  |
//! |  E  |  E  |GOAL |  W  |  W  |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! Recomputing a field happens often so nothing is cleared between passes.
//! Every cell carries the generation it was last written in and only cells
//! tagged with the current generation are considered live, everything else
//! reads as unreachable. The binary heap used by Dijkstra is kept between
//! passes for the same reason.
//!

use std::{cmp::Reverse, collections::BinaryHeap};

use crate::prelude::*;
use bevy::prelude::*;

/// Internal distance of a cell that has not been reached
pub const UNREACHABLE_DISTANCE: i32 = i32::MAX;
/// Distance reported by the query API for unreachable or unknown cells
pub const NO_DISTANCE: i32 = -1;
/// Default number of rings searched around a blocked target for open cells
/// to stand in as virtual targets
pub const DEFAULT_VIRTUAL_TARGET_RADIUS: i32 = 8;

/// Directions and distances towards one or more targets
#[derive(Clone, Debug)]
pub struct FlowField {
	/// Size of the grid the field covers
	dimensions: GridDimensions,
	/// Best direction of each cell
	directions: Vec<Ordinal>,
	/// Weighted cost to the nearest target of each cell
	distances: Vec<i32>,
	/// Generation each cell was last written in
	visited_generation: Vec<u32>,
	/// Cells whose generation tag matches this are live
	current_generation: u32,
	/// Whether the most recent computation succeeded
	valid: bool,
	/// Edge weights
	step_costs: StepCosts,
	/// How far to search for virtual targets around a blocked target
	virtual_target_radius: i32,
	/// The region the last computation was restricted to
	last_roi: Option<RegionOfInterest>,
	/// Dijkstra frontier as `(distance, cell index)`, kept between passes
	heap: BinaryHeap<Reverse<(i32, usize)>>,
	/// Patches gathered by [FlowField::incremental_update] before applying
	pending_patches: Vec<(usize, i32, Ordinal)>,
}

impl FlowField {
	/// Create a new, invalid, [FlowField] covering `width` by `height` cells
	pub fn new(width: i32, height: i32) -> Self {
		let dimensions = GridDimensions::new(width, height);
		let cells = dimensions.get_cell_count();
		FlowField {
			dimensions,
			directions: vec![Ordinal::Zero; cells],
			distances: vec![UNREACHABLE_DISTANCE; cells],
			visited_generation: vec![0; cells],
			current_generation: 0,
			valid: false,
			step_costs: StepCosts::default(),
			virtual_target_radius: DEFAULT_VIRTUAL_TARGET_RADIUS,
			last_roi: None,
			heap: BinaryHeap::new(),
			pending_patches: Vec::new(),
		}
	}
	/// Create a new [FlowField] using the step costs and virtual target
	/// radius of a [NavigationConfig]
	pub fn from_config(dimensions: GridDimensions, config: &NavigationConfig) -> Self {
		FlowField::new(dimensions.get_width(), dimensions.get_height())
			.with_step_costs(config.get_step_costs())
			.with_virtual_target_radius(config.get_virtual_target_radius())
	}
	/// Use different edge weights, invalidates the field
	pub fn with_step_costs(mut self, step_costs: StepCosts) -> Self {
		self.step_costs = step_costs;
		self.valid = false;
		self
	}
	/// Change how many rings around a blocked target are searched for virtual targets
	pub fn with_virtual_target_radius(mut self, radius: i32) -> Self {
		self.virtual_target_radius = radius.max(0);
		self
	}
	/// Get the grid size
	pub fn get_dimensions(&self) -> GridDimensions {
		self.dimensions
	}
	/// Get the number of columns
	pub fn get_width(&self) -> i32 {
		self.dimensions.get_width()
	}
	/// Get the number of rows
	pub fn get_height(&self) -> i32 {
		self.dimensions.get_height()
	}
	/// Get the edge weights
	pub fn get_step_costs(&self) -> StepCosts {
		self.step_costs
	}
	/// Has the field been successfully computed
	pub fn is_valid(&self) -> bool {
		self.valid
	}
	/// Get the generation counter
	pub fn get_current_generation(&self) -> u32 {
		self.current_generation
	}
	/// The region used by the most recent computation
	pub fn get_last_roi(&self) -> Option<RegionOfInterest> {
		self.last_roi
	}
	/// Mark the field as unusable until the next computation
	pub fn invalidate(&mut self) {
		self.valid = false;
	}
	/// Change the size of the grid. Storage is only reallocated when it is too
	/// small, either way the generation state restarts so that tags from
	/// before the resize cannot alias cells after it
	pub fn resize(&mut self, width: i32, height: i32) {
		let dimensions = GridDimensions::new(width, height);
		let cells = dimensions.get_cell_count();
		if self.visited_generation.capacity() < cells {
			debug!(
				"Reallocating flow field storage from {} to {} cells",
				self.visited_generation.capacity(),
				cells
			);
		}
		self.directions.resize(cells, Ordinal::Zero);
		self.distances.resize(cells, UNREACHABLE_DISTANCE);
		self.visited_generation.resize(cells, 0);
		self.visited_generation.fill(0);
		self.current_generation = 0;
		self.dimensions = dimensions;
		self.last_roi = None;
		self.valid = false;
	}
	/// Index of `(x, y)` if the cell holds data from the current generation
	fn live_index(&self, x: i32, y: i32) -> Option<usize> {
		if !self.valid {
			return None;
		}
		let index = self.dimensions.index(x, y)?;
		if self.visited_generation[index] == self.current_generation {
			Some(index)
		} else {
			None
		}
	}
	/// Direction an actor at `(x, y)` should move in. [Ordinal::Goal] on a
	/// target and [Ordinal::Zero] for anything blocked, unreachable, out of
	/// bounds or when the field is invalid
	pub fn get_direction(&self, x: i32, y: i32) -> Ordinal {
		match self.live_index(x, y) {
			Some(index) => self.directions[index],
			None => Ordinal::Zero,
		}
	}
	/// Weighted distance from `(x, y)` to the nearest target, [NO_DISTANCE]
	/// for the same cases where [FlowField::get_direction] gives [Ordinal::Zero]
	pub fn get_distance(&self, x: i32, y: i32) -> i32 {
		match self.live_index(x, y) {
			Some(index) => self.distances[index],
			None => NO_DISTANCE,
		}
	}
	/// The neighbouring cell an actor at `(x, y)` should step onto, [None] when
	/// it is already on a target or has no route
	pub fn get_next_cell(&self, x: i32, y: i32) -> Option<GridCell> {
		let ordinal = self.get_direction(x, y);
		if ordinal.is_movement() {
			Some(GridCell::new(x, y).step(ordinal))
		} else {
			None
		}
	}
	/// Begin a new generation, on wrap-around the tags are cleared once so a
	/// stale tag can never match
	fn next_generation(&mut self) {
		self.current_generation = self.current_generation.wrapping_add(1);
		if self.current_generation == 0 {
			self.visited_generation.fill(0);
			self.current_generation = 1;
		}
	}
	/// Record a distance for a cell if it improves on what this generation
	/// already holds. Returns `true` if the cell was updated
	fn relax(&mut self, index: usize, distance: i32, direction: Ordinal) -> bool {
		let seen = self.visited_generation[index] == self.current_generation;
		if seen && distance >= self.distances[index] {
			return false;
		}
		self.visited_generation[index] = self.current_generation;
		self.distances[index] = distance;
		self.directions[index] = direction;
		true
	}
	/// Seed a target cell, or if it is blocked, seed the nearest open ring of
	/// cells around it as virtual targets
	fn seed_target<P: BlockedPredicate + ?Sized>(
		&mut self,
		target: GridCell,
		is_blocked: &P,
		roi: &RegionOfInterest,
	) -> usize {
		let (tx, ty) = target.get();
		if !is_blocked.is_blocked(tx, ty) {
			if !roi.contains(tx, ty) {
				return 0;
			}
			let Some(index) = self.dimensions.index(tx, ty) else {
				return 0;
			};
			if self.relax(index, 0, Ordinal::Goal) {
				self.heap.push(Reverse((0, index)));
			}
			return 1;
		}
		let mut seeded = 0;
		for radius in 1..=self.virtual_target_radius {
			for dy in -radius..=radius {
				for dx in -radius..=radius {
					// only walk the ring
					if dx.abs() != radius && dy.abs() != radius {
						continue;
					}
					let (x, y) = (tx + dx, ty + dy);
					if !roi.contains(x, y) || is_blocked.is_blocked(x, y) {
						continue;
					}
					let Some(index) = self.dimensions.index(x, y) else {
						continue;
					};
					let distance = self.step_costs.manhattan_cost(dx, dy);
					if self.relax(index, distance, Ordinal::Goal) {
						self.heap.push(Reverse((distance, index)));
					}
					seeded += 1;
				}
			}
			if seeded > 0 {
				trace!(
					"Target {:?} is blocked, seeded {} virtual targets at radius {}",
					target,
					seeded,
					radius
				);
				break;
			}
		}
		seeded
	}
	/// Calculate the field towards `targets`.
	///
	/// Only cells inside `roi` (the whole grid when [None]) are examined or
	/// written, cells outside of it read as unreachable afterwards. Targets
	/// outside the grid are ignored and if no target can be seeded the field
	/// is left invalid
	pub fn compute<P: BlockedPredicate + ?Sized>(
		&mut self,
		targets: &[GridCell],
		is_blocked: &P,
		roi: Option<RegionOfInterest>,
	) {
		self.valid = false;
		self.heap.clear();
		self.next_generation();
		let region = match roi {
			Some(r) => r.clamp(&self.dimensions),
			None => RegionOfInterest::full(&self.dimensions).clamp(&self.dimensions),
		};
		let Some(region) = region else {
			warn!("Flow field ROI {:?} does not overlap the grid", roi);
			return;
		};
		self.last_roi = Some(region);

		let mut seeded = 0;
		for target in targets.iter() {
			if !self.dimensions.in_bounds(target.get_x(), target.get_y()) {
				warn!("Ignoring flow field target {:?} outside of the grid", target);
				continue;
			}
			seeded += self.seed_target(*target, is_blocked, &region);
		}
		if seeded == 0 {
			debug!("No flow field targets could be seeded from {:?}", targets);
			return;
		}

		let mut settled = 0;
		while let Some(Reverse((distance, index))) = self.heap.pop() {
			// a cheaper route was found after this entry was queued
			if distance > self.distances[index] {
				continue;
			}
			settled += 1;
			let cell = self.dimensions.cell_from_index(index);
			for ordinal in Ordinal::ALL {
				let neighbour = cell.step(ordinal);
				if !region.contains(neighbour.get_x(), neighbour.get_y()) {
					continue;
				}
				if !can_step(&self.dimensions, cell.get_x(), cell.get_y(), ordinal, is_blocked) {
					continue;
				}
				let Some(n_index) = self.dimensions.index(neighbour.get_x(), neighbour.get_y())
				else {
					continue;
				};
				let n_distance = distance + self.step_costs.cost_of(ordinal);
				if self.relax(n_index, n_distance, ordinal.inverse()) {
					self.heap.push(Reverse((n_distance, n_index)));
				}
			}
		}
		trace!(
			"Flow field generation {} settled {} cells from {} seeds",
			self.current_generation,
			settled,
			seeded
		);
		self.valid = true;
	}
	/// Give cells that have opened up since the last computation a direction
	/// without a full Dijkstra pass.
	///
	/// Each open cell of the last ROI that holds no data for the current
	/// generation takes the cheapest live neighbour it can legally step to.
	/// Patches are gathered first and applied afterwards so a single call only
	/// reaches one cell deep into a newly opened area, later calls (or the
	/// next full recompute) fill in the rest. Returns the number of patched cells
	pub fn incremental_update<P: BlockedPredicate + ?Sized>(&mut self, is_blocked: &P) -> usize {
		if !self.valid {
			return 0;
		}
		let Some(region) = self.last_roi else {
			return 0;
		};
		self.pending_patches.clear();
		let (min, max) = (region.get_min(), region.get_max());
		for y in min.get_y()..=max.get_y() {
			for x in min.get_x()..=max.get_x() {
				let Some(index) = self.dimensions.index(x, y) else {
					continue;
				};
				if self.visited_generation[index] == self.current_generation
					|| is_blocked.is_blocked(x, y)
				{
					continue;
				}
				let mut best: Option<(i32, Ordinal)> = None;
				for ordinal in Ordinal::ALL {
					let neighbour = GridCell::new(x, y).step(ordinal);
					if !region.contains(neighbour.get_x(), neighbour.get_y()) {
						continue;
					}
					if !can_step(&self.dimensions, x, y, ordinal, is_blocked) {
						continue;
					}
					let n_distance = self.get_distance(neighbour.get_x(), neighbour.get_y());
					if n_distance < 0 {
						continue;
					}
					let candidate = n_distance + self.step_costs.cost_of(ordinal);
					if best.is_none_or(|(d, _)| candidate < d) {
						best = Some((candidate, ordinal));
					}
				}
				if let Some((distance, ordinal)) = best {
					self.pending_patches.push((index, distance, ordinal));
				}
			}
		}
		let patched = self.pending_patches.len();
		for i in 0..patched {
			let (index, distance, ordinal) = self.pending_patches[i];
			self.visited_generation[index] = self.current_generation;
			self.distances[index] = distance;
			self.directions[index] = ordinal;
		}
		if patched > 0 {
			trace!("Incremental update patched {} cells", patched);
		}
		patched
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;

	/// Build a predicate from an ascii map where `#` is a wall
	fn walls<'a>(rows: &'a [&'a str]) -> impl Fn(i32, i32) -> bool + 'a {
		move |x: i32, y: i32| {
			if x < 0 || y < 0 || y as usize >= rows.len() {
				return true;
			}
			match rows[y as usize].as_bytes().get(x as usize) {
				Some(b) => *b == b'#',
				None => true,
			}
		}
	}

	/// Walk the field from `start` asserting that distance strictly decreases
	/// until a goal is reached
	fn assert_descends(field: &FlowField, start: GridCell) {
		let mut cell = start;
		let mut distance = field.get_distance(cell.get_x(), cell.get_y());
		assert!(distance >= 0, "{:?} is unreachable", start);
		let max_steps = distance / field.get_step_costs().get_minimum() + 1;
		let mut steps = 0;
		while let Some(next) = field.get_next_cell(cell.get_x(), cell.get_y()) {
			let next_distance = field.get_distance(next.get_x(), next.get_y());
			assert!(next_distance >= 0 && next_distance < distance, "distance rose stepping {:?} -> {:?}", cell, next);
			cell = next;
			distance = next_distance;
			steps += 1;
			assert!(steps <= max_steps);
		}
		assert_eq!(Ordinal::Goal, field.get_direction(cell.get_x(), cell.get_y()));
	}

	#[test]
	fn open_grid_diagonal_approach() {
		let mut field = FlowField::new(10, 10);
		field.compute(&[GridCell::new(9, 9)], &|_x: i32, _y: i32| false, None);
		assert!(field.is_valid());
		assert_eq!(Ordinal::SouthEast, field.get_direction(8, 8));
		assert_eq!(0, field.get_distance(9, 9));
		assert_eq!(Ordinal::Goal, field.get_direction(9, 9));
		assert_eq!(14 * 9, field.get_distance(0, 0));
		assert_eq!(Ordinal::East, field.get_direction(0, 9));
	}
	#[test]
	fn field_matches_module_diagram() {
		let mut field = FlowField::new(5, 3);
		field.compute(&[GridCell::new(2, 2)], &|_x: i32, _y: i32| false, None);
		let distances: Vec<i32> = (0..3).flat_map(|y| (0..5).map(move |x| (x, y))).map(|(x, y)| field.get_distance(x, y)).collect();
		assert_eq!(vec![
			28, 24, 20, 24, 28,
			24, 14, 10, 14, 24,
			20, 10, 0, 10, 20,
		], distances);
		assert_eq!(Ordinal::SouthWest, field.get_direction(4, 0));
		assert_eq!(Ordinal::South, field.get_direction(2, 0));
	}
	#[test]
	fn queries_outside_grid() {
		let mut field = FlowField::new(4, 4);
		assert_eq!(Ordinal::Zero, field.get_direction(1, 1));
		assert_eq!(-1, field.get_distance(1, 1));
		field.compute(&[GridCell::new(0, 0)], &|_x: i32, _y: i32| false, None);
		assert_eq!(Ordinal::Zero, field.get_direction(-1, 0));
		assert_eq!(-1, field.get_distance(4, 0));
		assert_eq!(None, field.get_next_cell(0, 0));
	}
	#[test]
	fn out_of_range_target_leaves_field_invalid() {
		let mut field = FlowField::new(4, 4);
		field.compute(&[GridCell::new(4, 1)], &|_x: i32, _y: i32| false, None);
		assert!(!field.is_valid());
		assert_eq!(-1, field.get_distance(0, 0));
	}
	#[test]
	fn corner_cutting_is_excluded() {
		let map = [
			".#.",
			"...",
			"...",
		];
		let mut field = FlowField::new(3, 3);
		field.compute(&[GridCell::new(0, 0)], &walls(&map), None);
		// (1, 1) -> (0, 0) would clip the wall at (1, 0)
		assert_eq!(Ordinal::West, field.get_direction(1, 1));
		assert_eq!(20, field.get_distance(1, 1));
		// the cell beyond the wall has to go around
		assert_eq!(Ordinal::South, field.get_direction(2, 0));
		assert_eq!(Ordinal::Zero, field.get_direction(1, 0));
		for y in 0..3 {
			for x in 0..3 {
				let ord = field.get_direction(x, y);
				if ord.is_diagonal() {
					let (dx, dy) = ord.offset();
					assert!(!walls(&map)(x + dx, y) && !walls(&map)(x, y + dy));
				}
			}
		}
	}
	#[test]
	fn directions_descend_to_goal() {
		let map = [
			"..........",
			".########.",
			".#......#.",
			".#.####.#.",
			".#.#..#.#.",
			".#.#..#...",
			".#.##.###.",
			".#........",
			".########.",
			"..........",
		];
		let mut field = FlowField::new(10, 10);
		field.compute(&[GridCell::new(4, 4)], &walls(&map), None);
		for y in 0..10 {
			for x in 0..10 {
				if field.get_distance(x, y) >= 0 {
					assert_descends(&field, GridCell::new(x, y));
				} else {
					assert!(walls(&map)(x, y));
				}
			}
		}
	}
	#[test]
	fn multiple_targets_pick_nearest() {
		let mut field = FlowField::new(11, 1);
		field.compute(&[GridCell::new(0, 0), GridCell::new(10, 0)], &|_x: i32, _y: i32| false, None);
		assert_eq!(Ordinal::West, field.get_direction(4, 0));
		assert_eq!(Ordinal::East, field.get_direction(6, 0));
		assert_eq!(50, field.get_distance(5, 0));
		assert_eq!(Ordinal::Goal, field.get_direction(10, 0));
	}
	#[test]
	fn blocked_target_uses_virtual_targets() {
		let map = [
			".....",
			".###.",
			".###.",
			".###.",
			".....",
		];
		let mut field = FlowField::new(5, 5);
		field.compute(&[GridCell::new(2, 2)], &walls(&map), None);
		assert!(field.is_valid());
		// ring 2 is the first ring holding open cells, its cells become goals
		assert_eq!(Ordinal::Goal, field.get_direction(2, 0));
		assert_eq!(20, field.get_distance(2, 0));
		assert_eq!(Ordinal::Goal, field.get_direction(0, 0));
		assert_eq!(40, field.get_distance(0, 0));
		// virtual targets are scored by their weighted offset from the real target
		assert_eq!(Ordinal::Goal, field.get_direction(1, 0));
		assert_eq!(30, field.get_distance(1, 0));
		assert_eq!(Ordinal::Zero, field.get_direction(2, 2));
	}
	#[test]
	fn enclosed_blocked_target_beyond_radius() {
		let mut field = FlowField::new(5, 5).with_virtual_target_radius(1);
		field.compute(&[GridCell::new(2, 2)], &|x: i32, y: i32| (1..=3).contains(&x) && (1..=3).contains(&y), None);
		assert!(!field.is_valid());
	}
	#[test]
	fn roi_restricts_cells() {
		let mut field = FlowField::new(20, 20);
		let roi = RegionOfInterest::new(GridCell::new(5, 5), GridCell::new(10, 10));
		field.compute(&[GridCell::new(7, 7)], &|_x: i32, _y: i32| false, Some(roi));
		assert_eq!(30, field.get_distance(10, 7));
		assert_eq!(-1, field.get_distance(11, 7));
		assert_eq!(-1, field.get_distance(0, 0));
		assert_eq!(Some(roi), field.get_last_roi());
	}
	#[test]
	fn target_outside_roi_is_not_seeded() {
		let mut field = FlowField::new(20, 20);
		let roi = RegionOfInterest::new(GridCell::new(0, 0), GridCell::new(4, 4));
		field.compute(&[GridCell::new(15, 15)], &|_x: i32, _y: i32| false, Some(roi));
		assert!(!field.is_valid());
	}
	#[test]
	fn generation_isolation() {
		let mut field = FlowField::new(10, 10);
		field.compute(&[GridCell::new(0, 0)], &|_x: i32, _y: i32| false, None);
		let first_generation = field.get_current_generation();
		assert_eq!(14 * 9, field.get_distance(9, 9));
		// wall off the bottom right and aim somewhere else
		let wall = |x: i32, y: i32| x >= 5 || y >= 5;
		field.compute(&[GridCell::new(1, 1)], &wall, None);
		assert_eq!(first_generation + 1, field.get_current_generation());
		assert_eq!(-1, field.get_distance(9, 9));
		assert_eq!(Ordinal::Zero, field.get_direction(9, 9));
		assert_eq!(14, field.get_distance(0, 0));
	}
	#[test]
	fn resize_reuses_storage_and_resets_generation() {
		let mut field = FlowField::new(10, 10);
		field.compute(&[GridCell::new(0, 0)], &|_x: i32, _y: i32| false, None);
		field.resize(5, 5);
		assert!(!field.is_valid());
		assert_eq!(0, field.get_current_generation());
		assert_eq!(5, field.get_width());
		field.compute(&[GridCell::new(4, 4)], &|_x: i32, _y: i32| false, None);
		assert_eq!(14 * 4, field.get_distance(0, 0));
		assert_eq!(-1, field.get_distance(5, 0));
		field.resize(12, 12);
		field.compute(&[GridCell::new(11, 11)], &|_x: i32, _y: i32| false, None);
		assert_eq!(14 * 11, field.get_distance(0, 0));
	}
	#[test]
	fn incremental_update_patches_one_layer() {
		let mut field = FlowField::new(6, 1);
		let closed = |x: i32, _y: i32| x >= 3;
		field.compute(&[GridCell::new(0, 0)], &closed, None);
		assert_eq!(-1, field.get_distance(3, 0));
		// the wall is knocked down
		let open = |_x: i32, _y: i32| false;
		assert_eq!(1, field.incremental_update(&open));
		assert_eq!(30, field.get_distance(3, 0));
		assert_eq!(Ordinal::West, field.get_direction(3, 0));
		assert_eq!(-1, field.get_distance(4, 0));
		assert_eq!(1, field.incremental_update(&open));
		assert_eq!(40, field.get_distance(4, 0));
		assert_eq!(1, field.incremental_update(&open));
		assert_eq!(0, field.incremental_update(&open));
	}
	#[test]
	fn incremental_update_requires_valid_field() {
		let mut field = FlowField::new(3, 3);
		assert_eq!(0, field.incremental_update(&|_x: i32, _y: i32| false));
	}
	#[test]
	fn anisotropic_costs() {
		let mut field = FlowField::new(3, 3).with_step_costs(StepCosts::from_cell_aspect(1.0, 2.0));
		field.compute(&[GridCell::new(1, 1)], &|_x: i32, _y: i32| false, None);
		assert_eq!(10, field.get_distance(0, 1));
		assert_eq!(20, field.get_distance(1, 0));
		assert_eq!(22, field.get_distance(0, 0));
	}
}
