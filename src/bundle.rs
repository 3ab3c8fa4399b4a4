//! The host owned obstacle grid and the components an entity needs to steer
//! its actors with a cached [FlowField]
//!

use crate::prelude::*;
use bevy::prelude::*;

/// The walls of the world. The host owns and edits it, every computation
/// only ever reads it through [BlockedPredicate]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Resource, Reflect, Clone, Debug, Default)]
pub struct ObstacleGrid {
	/// Size of the grid
	dimensions: GridDimensions,
	/// `true` for each blocked cell, `y * width + x`
	blocked: Vec<bool>,
}

impl ObstacleGrid {
	/// Create a new instance of [ObstacleGrid] with every cell open. Panics if
	/// either side is less than 1
	pub fn new(width: i32, height: i32) -> Self {
		if width < 1 || height < 1 {
			panic!("Obstacle grid must be at least 1x1, got {}x{}", width, height);
		}
		let dimensions = GridDimensions::new(width, height);
		ObstacleGrid {
			dimensions,
			blocked: vec![false; dimensions.get_cell_count()],
		}
	}
	/// Build a grid from rows of text, `#` is a wall and anything else is
	/// open. Rows shorter than the first are padded with walls
	pub fn from_rows(rows: &[&str]) -> Self {
		let width = rows.first().map_or(0, |r| r.chars().count()) as i32;
		let mut grid = ObstacleGrid::new(width, rows.len() as i32);
		for y in 0..grid.dimensions.get_height() {
			let row: Vec<char> = rows[y as usize].chars().collect();
			for x in 0..width {
				let wall = row.get(x as usize).is_none_or(|c| *c == '#');
				grid.set_blocked(x, y, wall);
			}
		}
		grid
	}
	/// Get the grid size
	pub fn get_dimensions(&self) -> GridDimensions {
		self.dimensions
	}
	/// Set whether a cell is blocked. Returns `true` if the cell changed,
	/// writes outside the grid are ignored
	pub fn set_blocked(&mut self, x: i32, y: i32, blocked: bool) -> bool {
		match self.dimensions.index(x, y) {
			Some(i) if self.blocked[i] != blocked => {
				self.blocked[i] = blocked;
				true
			}
			_ => false,
		}
	}
	/// Change the grid size, the overlapping cells keep their state and new
	/// cells are open
	pub fn resize(&mut self, width: i32, height: i32) {
		let dimensions = GridDimensions::new(width, height);
		let mut blocked = vec![false; dimensions.get_cell_count()];
		for y in 0..height.min(self.dimensions.get_height()) {
			for x in 0..width.min(self.dimensions.get_width()) {
				if let (Some(old), Some(new)) = (self.dimensions.index(x, y), dimensions.index(x, y)) {
					blocked[new] = self.blocked[old];
				}
			}
		}
		self.dimensions = dimensions;
		self.blocked = blocked;
	}
}

impl BlockedPredicate for ObstacleGrid {
	fn is_blocked(&self, x: i32, y: i32) -> bool {
		match self.dimensions.index(x, y) {
			Some(i) => self.blocked[i],
			None => true,
		}
	}
}

/// The cells a [FlowFieldCache] steers towards, written by the host each
/// tick as its targets move
#[derive(Component, Clone, Debug, Default)]
pub struct FlowTargets(Vec<GridCell>);

impl FlowTargets {
	/// Create a new instance of [FlowTargets]
	pub fn new(targets: Vec<GridCell>) -> Self {
		FlowTargets(targets)
	}
	/// Get the targets
	pub fn get(&self) -> &[GridCell] {
		&self.0
	}
	/// Replace the targets
	pub fn set(&mut self, targets: Vec<GridCell>) {
		self.0 = targets;
	}
}

/// Everything needed for a group of single cell actors to follow a cached
/// field towards some targets
#[derive(Bundle)]
pub struct FlowFieldBundle {
	/// Where the field leads
	targets: FlowTargets,
	/// The throttled field
	cache: FlowFieldCache,
}

impl FlowFieldBundle {
	/// Create a new instance of [FlowFieldBundle] sized to `grid`
	pub fn new(grid: &ObstacleGrid, config: &NavigationConfig, targets: Vec<GridCell>) -> Self {
		FlowFieldBundle {
			targets: FlowTargets::new(targets),
			cache: FlowFieldCache::new(grid.get_dimensions(), config),
		}
	}
}

/// A [FlowFieldBundle] for actors larger than a single cell, the field is
/// calculated for the header of `footprint`
#[derive(Bundle)]
pub struct CompositeFlowFieldBundle {
	/// Where the field leads
	targets: FlowTargets,
	/// The throttled field
	cache: FlowFieldCache,
	/// Header positions where the body fits
	passability: CompositePassability,
}

impl CompositeFlowFieldBundle {
	/// Create a new instance of [CompositeFlowFieldBundle] sized to `grid`
	/// with its [CompositePassability] already computed
	pub fn new(
		grid: &ObstacleGrid,
		footprint: Footprint,
		config: &NavigationConfig,
		targets: Vec<GridCell>,
	) -> Self {
		let mut passability = CompositePassability::new(grid.get_dimensions(), footprint);
		passability.compute(grid);
		CompositeFlowFieldBundle {
			targets: FlowTargets::new(targets),
			cache: FlowFieldCache::new(grid.get_dimensions(), config),
			passability,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	#[should_panic]
	fn invalid_grid() {
		ObstacleGrid::new(0, 3);
	}
	#[test]
	fn grid_from_rows() {
		let grid = ObstacleGrid::from_rows(&["..#", ".", "#.."]);
		assert_eq!(GridDimensions::new(3, 3), grid.get_dimensions());
		assert!(grid.is_blocked(2, 0));
		assert!(!grid.is_blocked(0, 1));
		assert!(grid.is_blocked(1, 1));
		assert!(grid.is_blocked(0, 2));
		assert!(grid.is_blocked(3, 0));
		assert!(grid.is_blocked(0, -1));
	}
	#[test]
	fn set_blocked_reports_changes() {
		let mut grid = ObstacleGrid::new(4, 4);
		assert!(grid.set_blocked(1, 1, true));
		assert!(!grid.set_blocked(1, 1, true));
		assert!(!grid.set_blocked(9, 9, true));
		assert!(grid.is_blocked(1, 1));
	}
	#[test]
	fn resize_keeps_overlap() {
		let mut grid = ObstacleGrid::new(4, 4);
		grid.set_blocked(1, 1, true);
		grid.set_blocked(3, 3, true);
		grid.resize(6, 2);
		assert!(grid.is_blocked(1, 1));
		assert!(!grid.is_blocked(5, 1));
		assert!(grid.is_blocked(3, 3));
	}
	#[test]
	fn composite_bundle_is_computed() {
		let grid = ObstacleGrid::from_rows(&["....", "..#.", "...."]);
		let bundle = CompositeFlowFieldBundle::new(&grid, Footprint::new(2, 2, 0, 0), &NavigationConfig::default(), vec![GridCell::new(0, 0)]);
		assert!(bundle.passability.is_valid(0, 0));
		assert!(!bundle.passability.is_valid(1, 0));
		assert_eq!(1, bundle.targets.get().len());
	}
}
