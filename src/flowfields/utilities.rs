//! Useful structures and tools used by the fields
//!

use crate::prelude::BlockedPredicate;
use bevy::prelude::*;

/// Cost of an orthogonal step when cells are square
pub const ORTHOGONAL_STEP_COST: i32 = 10;
/// Cost of a diagonal step when cells are square, approximates `10 * sqrt(2)`
pub const DIAGONAL_STEP_COST: i32 = 14;

/// Position of a cell within a grid, `(x, y)` where `x` grows eastwards and
/// `y` grows southwards from the top-left corner
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct GridCell((i32, i32));

impl GridCell {
	/// Create a new instance of [GridCell]
	pub fn new(x: i32, y: i32) -> Self {
		GridCell((x, y))
	}
	/// Get the `(x, y)` tuple
	pub fn get(&self) -> (i32, i32) {
		self.0
	}
	/// Get the column
	pub fn get_x(&self) -> i32 {
		self.0 .0
	}
	/// Get the row
	pub fn get_y(&self) -> i32 {
		self.0 .1
	}
	/// Number of orthogonal steps between two cells
	pub fn manhattan_distance(&self, other: &GridCell) -> i32 {
		(self.get_x() - other.get_x()).abs() + (self.get_y() - other.get_y()).abs()
	}
	/// The adjacent cell in the direction of `ordinal`. The sentinel
	/// ordinals return the cell itself
	pub fn step(&self, ordinal: Ordinal) -> GridCell {
		let (dx, dy) = ordinal.offset();
		GridCell::new(self.get_x() + dx, self.get_y() + dy)
	}
}

impl From<(i32, i32)> for GridCell {
	fn from(value: (i32, i32)) -> Self {
		GridCell(value)
	}
}

/// Width and height of a grid, used to validate coordinates and to map a
/// coordinate onto the dense `y * width + x` arrays backing each field
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect)]
pub struct GridDimensions {
	/// Number of columns
	width: i32,
	/// Number of rows
	height: i32,
}

impl GridDimensions {
	/// Create a new instance of [GridDimensions]. Negative sizes are clamped to zero
	pub fn new(width: i32, height: i32) -> Self {
		GridDimensions {
			width: width.max(0),
			height: height.max(0),
		}
	}
	/// Get the number of columns
	pub fn get_width(&self) -> i32 {
		self.width
	}
	/// Get the number of rows
	pub fn get_height(&self) -> i32 {
		self.height
	}
	/// Total number of cells
	pub fn get_cell_count(&self) -> usize {
		self.width as usize * self.height as usize
	}
	/// Is `(x, y)` within `[0, width) x [0, height)`
	pub fn in_bounds(&self, x: i32, y: i32) -> bool {
		x >= 0 && y >= 0 && x < self.width && y < self.height
	}
	/// Dense array index of `(x, y)`, [None] when out of bounds
	pub fn index(&self, x: i32, y: i32) -> Option<usize> {
		if self.in_bounds(x, y) {
			Some(y as usize * self.width as usize + x as usize)
		} else {
			None
		}
	}
	/// Inverse of [GridDimensions::index]
	pub fn cell_from_index(&self, index: usize) -> GridCell {
		let width = self.width.max(1) as usize;
		GridCell::new((index % width) as i32, (index / width) as i32)
	}
}

/// An inclusive rectangle of cells that a computation is restricted to
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub struct RegionOfInterest {
	/// Top-left corner
	min: GridCell,
	/// Bottom-right corner, inclusive
	max: GridCell,
}

impl RegionOfInterest {
	/// Create a region from two corners in any order
	pub fn new(a: GridCell, b: GridCell) -> Self {
		RegionOfInterest {
			min: GridCell::new(a.get_x().min(b.get_x()), a.get_y().min(b.get_y())),
			max: GridCell::new(a.get_x().max(b.get_x()), a.get_y().max(b.get_y())),
		}
	}
	/// A region covering an entire grid
	pub fn full(dimensions: &GridDimensions) -> Self {
		RegionOfInterest {
			min: GridCell::new(0, 0),
			max: GridCell::new(dimensions.get_width() - 1, dimensions.get_height() - 1),
		}
	}
	/// The bounding box of a set of cells, [None] if `cells` is empty
	pub fn bounding(cells: &[GridCell]) -> Option<Self> {
		let first = cells.first()?;
		let mut region = RegionOfInterest::new(*first, *first);
		for cell in cells.iter().skip(1) {
			region.min = GridCell::new(
				region.min.get_x().min(cell.get_x()),
				region.min.get_y().min(cell.get_y()),
			);
			region.max = GridCell::new(
				region.max.get_x().max(cell.get_x()),
				region.max.get_y().max(cell.get_y()),
			);
		}
		Some(region)
	}
	/// Get the top-left corner
	pub fn get_min(&self) -> GridCell {
		self.min
	}
	/// Get the bottom-right corner
	pub fn get_max(&self) -> GridCell {
		self.max
	}
	/// Grow the region by `margin` cells on every side
	pub fn expand(&self, margin: i32) -> Self {
		RegionOfInterest {
			min: GridCell::new(self.min.get_x() - margin, self.min.get_y() - margin),
			max: GridCell::new(self.max.get_x() + margin, self.max.get_y() + margin),
		}
	}
	/// Clamp the region to the bounds of a grid, [None] if nothing of the
	/// region lies inside it
	pub fn clamp(&self, dimensions: &GridDimensions) -> Option<Self> {
		let min_x = self.min.get_x().max(0);
		let min_y = self.min.get_y().max(0);
		let max_x = self.max.get_x().min(dimensions.get_width() - 1);
		let max_y = self.max.get_y().min(dimensions.get_height() - 1);
		if min_x > max_x || min_y > max_y {
			None
		} else {
			Some(RegionOfInterest {
				min: GridCell::new(min_x, min_y),
				max: GridCell::new(max_x, max_y),
			})
		}
	}
	/// Is `(x, y)` inside the region
	pub fn contains(&self, x: i32, y: i32) -> bool {
		x >= self.min.get_x() && x <= self.max.get_x() && y >= self.min.get_y() && y <= self.max.get_y()
	}
	/// Do two regions share at least one cell
	pub fn intersects(&self, other: &RegionOfInterest) -> bool {
		self.min.get_x() <= other.max.get_x()
			&& other.min.get_x() <= self.max.get_x()
			&& self.min.get_y() <= other.max.get_y()
			&& other.min.get_y() <= self.max.get_y()
	}
}

/// The cost of stepping from one cell to a neighbour. Square cells use
/// `10/14`, non-square cells (a terminal glyph is roughly twice as tall as it
/// is wide) scale the horizontal and vertical costs independently
#[cfg_attr(
	feature = "serde",
	derive(serde::Deserialize, serde::Serialize),
	serde(try_from = "UncheckedStepCosts")
)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub struct StepCosts {
	/// Cost of an east/west step
	horizontal: i32,
	/// Cost of a north/south step
	vertical: i32,
	/// Cost of any diagonal step
	diagonal: i32,
}

/// [StepCosts] as read from a file, checked before use
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedStepCosts {
	/// Cost of an east/west step
	horizontal: i32,
	/// Cost of a north/south step
	vertical: i32,
	/// Cost of any diagonal step
	diagonal: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedStepCosts> for StepCosts {
	type Error = String;
	fn try_from(value: UncheckedStepCosts) -> Result<Self, Self::Error> {
		StepCosts::try_new(value.horizontal, value.vertical, value.diagonal)
	}
}

impl Default for StepCosts {
	fn default() -> Self {
		StepCosts {
			horizontal: ORTHOGONAL_STEP_COST,
			vertical: ORTHOGONAL_STEP_COST,
			diagonal: DIAGONAL_STEP_COST,
		}
	}
}

impl StepCosts {
	/// Create a new instance of [StepCosts]. Panics if any cost is less than `1` as Dijkstra relies on strictly positive edges
	pub fn new(horizontal: i32, vertical: i32, diagonal: i32) -> Self {
		match StepCosts::try_new(horizontal, vertical, diagonal) {
			Ok(costs) => costs,
			Err(e) => panic!("{}", e),
		}
	}
	/// Create a new instance of [StepCosts], rejecting any cost below `1`
	pub fn try_new(horizontal: i32, vertical: i32, diagonal: i32) -> Result<Self, String> {
		if horizontal < 1 || vertical < 1 || diagonal < 1 {
			return Err(format!(
				"Step costs must be positive, got horizontal {}, vertical {}, diagonal {}",
				horizontal, vertical, diagonal
			));
		}
		Ok(StepCosts {
			horizontal,
			vertical,
			diagonal,
		})
	}
	/// Derive costs from the physical width and height of a cell. The shorter side costs [ORTHOGONAL_STEP_COST]
	pub fn from_cell_aspect(cell_width: f32, cell_height: f32) -> Self {
		let shortest = cell_width.min(cell_height).max(f32::EPSILON);
		let horizontal = (ORTHOGONAL_STEP_COST as f32 * cell_width / shortest).round();
		let vertical = (ORTHOGONAL_STEP_COST as f32 * cell_height / shortest).round();
		let diagonal = (horizontal * horizontal + vertical * vertical).sqrt().round();
		StepCosts::new(horizontal as i32, vertical as i32, diagonal as i32)
	}
	/// Get the east/west cost
	pub fn get_horizontal(&self) -> i32 {
		self.horizontal
	}
	/// Get the north/south cost
	pub fn get_vertical(&self) -> i32 {
		self.vertical
	}
	/// Get the diagonal cost
	pub fn get_diagonal(&self) -> i32 {
		self.diagonal
	}
	/// The smallest cost of any single step
	pub fn get_minimum(&self) -> i32 {
		self.horizontal.min(self.vertical).min(self.diagonal)
	}
	/// Cost of moving in the direction of `ordinal`, sentinels cost nothing
	pub fn cost_of(&self, ordinal: Ordinal) -> i32 {
		match ordinal {
			Ordinal::East | Ordinal::West => self.horizontal,
			Ordinal::North | Ordinal::South => self.vertical,
			Ordinal::NorthEast | Ordinal::SouthEast | Ordinal::SouthWest | Ordinal::NorthWest => {
				self.diagonal
			}
			Ordinal::Goal | Ordinal::Zero => 0,
		}
	}
	/// Weighted Manhattan cost of an offset, used to score virtual targets
	pub fn manhattan_cost(&self, dx: i32, dy: i32) -> i32 {
		dx.abs() * self.horizontal + dy.abs() * self.vertical
	}
}

/// The 8 directions of movement a [crate::prelude::FlowField] can point in
/// plus two sentinels
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Reflect)]
pub enum Ordinal {
	North,
	NorthEast,
	East,
	SouthEast,
	South,
	SouthWest,
	West,
	NorthWest,
	/// Special case, the cell is a target (or a virtual target standing in for a blocked one)
	Goal,
	/// Special case, used to indicate a blocked or unreachable cell
	#[default]
	Zero,
}

impl Ordinal {
	/// All directions of movement, orthogonals first so that ties during
	/// expansion favour straight steps
	pub const ALL: [Ordinal; 8] = [
		Ordinal::North,
		Ordinal::East,
		Ordinal::South,
		Ordinal::West,
		Ordinal::NorthEast,
		Ordinal::SouthEast,
		Ordinal::SouthWest,
		Ordinal::NorthWest,
	];
	/// Unit `(dx, dy)` offset of the direction, `(0, 0)` for the sentinels
	pub fn offset(&self) -> (i32, i32) {
		match self {
			Ordinal::North => (0, -1),
			Ordinal::NorthEast => (1, -1),
			Ordinal::East => (1, 0),
			Ordinal::SouthEast => (1, 1),
			Ordinal::South => (0, 1),
			Ordinal::SouthWest => (-1, 1),
			Ordinal::West => (-1, 0),
			Ordinal::NorthWest => (-1, -1),
			Ordinal::Goal | Ordinal::Zero => (0, 0),
		}
	}
	/// Returns the opposite [Ordinal] of the current
	pub fn inverse(&self) -> Ordinal {
		match self {
			Ordinal::North => Ordinal::South,
			Ordinal::NorthEast => Ordinal::SouthWest,
			Ordinal::East => Ordinal::West,
			Ordinal::SouthEast => Ordinal::NorthWest,
			Ordinal::South => Ordinal::North,
			Ordinal::SouthWest => Ordinal::NorthEast,
			Ordinal::West => Ordinal::East,
			Ordinal::NorthWest => Ordinal::SouthEast,
			Ordinal::Goal => Ordinal::Goal,
			Ordinal::Zero => Ordinal::Zero,
		}
	}
	/// Is this one of the four diagonal directions
	pub fn is_diagonal(&self) -> bool {
		matches!(
			self,
			Ordinal::NorthEast | Ordinal::SouthEast | Ordinal::SouthWest | Ordinal::NorthWest
		)
	}
	/// Is this a real direction of movement rather than a sentinel
	pub fn is_movement(&self) -> bool {
		!matches!(self, Ordinal::Goal | Ordinal::Zero)
	}
	/// For two cells next to each other find the [Ordinal] pointing from
	/// `source` to `target`, [None] if they are not adjacent
	pub fn cell_to_cell_direction(target: GridCell, source: GridCell) -> Option<Ordinal> {
		let direction = (target.get_x() - source.get_x(), target.get_y() - source.get_y());
		Ordinal::ALL.into_iter().find(|ord| ord.offset() == direction)
	}
}

/// A diagonal step may only be taken when both orthogonal cells flanking it
/// are open, otherwise an actor would clip the corner of a wall. Cells outside
/// `dimensions` count as blocked
pub fn can_step<P: BlockedPredicate + ?Sized>(
	dimensions: &GridDimensions,
	x: i32,
	y: i32,
	ordinal: Ordinal,
	is_blocked: &P,
) -> bool {
	let (dx, dy) = ordinal.offset();
	let (nx, ny) = (x + dx, y + dy);
	if !dimensions.in_bounds(nx, ny) || is_blocked.is_blocked(nx, ny) {
		return false;
	}
	if ordinal.is_diagonal() {
		let corner_a_open = dimensions.in_bounds(nx, y) && !is_blocked.is_blocked(nx, y);
		let corner_b_open = dimensions.in_bounds(x, ny) && !is_blocked.is_blocked(x, ny);
		return corner_a_open && corner_b_open;
	}
	true
}
