//! Actors larger than a single cell cannot squeeze through every gap a
//! single-cell actor can. Rather than teaching the [FlowField] about bodies
//! the [CompositePassability] field records, for a fixed [Footprint], every
//! header (anchor) position where the whole body fits inside the grid
//! without overlapping a wall. Its inverse is a blocked predicate so the
//! regular [FlowField] can path the header of a large actor unmodified.
//!
//! A `2x2` footprint with its header in the top-left, `#` are walls and `x`
//! the header positions that end up blocked:
//!
//! ```text
//!  raw walls        header view
//!  . . . . .        . . x x x
//!  . . . # .        . . x x x
//!  . . . . .        . . . . x
//!  . . . . .        x x x x x
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Cached footprint fit test for every header position of a grid
#[derive(Component, Clone, Debug)]
pub struct CompositePassability {
	/// Size of the grid
	dimensions: GridDimensions,
	/// Body the header drags around
	footprint: Footprint,
	/// `true` where the whole footprint fits, indexed by header position
	valid: Vec<bool>,
}

impl CompositePassability {
	/// Create a new instance of [CompositePassability]. Every header starts
	/// out blocked until [CompositePassability::compute] is called
	pub fn new(dimensions: GridDimensions, footprint: Footprint) -> Self {
		CompositePassability {
			dimensions,
			footprint,
			valid: vec![false; dimensions.get_cell_count()],
		}
	}
	/// Get the grid size
	pub fn get_dimensions(&self) -> GridDimensions {
		self.dimensions
	}
	/// Get the footprint
	pub fn get_footprint(&self) -> Footprint {
		self.footprint
	}
	/// Change the grid size, all headers become blocked until recomputed
	pub fn resize(&mut self, width: i32, height: i32) {
		self.dimensions = GridDimensions::new(width, height);
		self.valid.clear();
		self.valid.resize(self.dimensions.get_cell_count(), false);
	}
	/// Test every header position of the grid
	pub fn compute<P: BlockedPredicate + ?Sized>(&mut self, is_wall: &P) {
		let region = RegionOfInterest::full(&self.dimensions);
		self.compute_region(is_wall, region);
	}
	/// Test only the header positions within `min..=max`, clamped to the grid
	pub fn compute_roi<P: BlockedPredicate + ?Sized>(
		&mut self,
		is_wall: &P,
		min_x: i32,
		min_y: i32,
		max_x: i32,
		max_y: i32,
	) {
		let region = RegionOfInterest::new(GridCell::new(min_x, min_y), GridCell::new(max_x, max_y));
		self.compute_region(is_wall, region);
	}
	/// Test the header positions within `region`. Only the iteration is
	/// clamped, the footprint of a header near the edge of `region` is still
	/// tested against walls outside of it
	pub fn compute_region<P: BlockedPredicate + ?Sized>(
		&mut self,
		is_wall: &P,
		region: RegionOfInterest,
	) {
		let Some(region) = region.clamp(&self.dimensions) else {
			return;
		};
		let (min, max) = (region.get_min(), region.get_max());
		for y in min.get_y()..=max.get_y() {
			for x in min.get_x()..=max.get_x() {
				let fits = self.footprint_fits(is_wall, x, y);
				if let Some(index) = self.dimensions.index(x, y) {
					self.valid[index] = fits;
				}
			}
		}
		trace!(
			"Composite passability {}x{} recomputed over {:?}",
			self.footprint.get_width(),
			self.footprint.get_height(),
			region
		);
	}
	/// Does the footprint anchored at header `(x, y)` lie inside the grid and
	/// avoid every wall
	fn footprint_fits<P: BlockedPredicate + ?Sized>(&self, is_wall: &P, x: i32, y: i32) -> bool {
		let body = self.footprint.covered_region(x, y);
		let (min, max) = (body.get_min(), body.get_max());
		if !self.dimensions.in_bounds(min.get_x(), min.get_y())
			|| !self.dimensions.in_bounds(max.get_x(), max.get_y())
		{
			return false;
		}
		for by in min.get_y()..=max.get_y() {
			for bx in min.get_x()..=max.get_x() {
				if is_wall.is_blocked(bx, by) {
					return false;
				}
			}
		}
		true
	}
	/// Can the header stand at `(x, y)`, out of bounds is never valid
	pub fn is_valid(&self, x: i32, y: i32) -> bool {
		match self.dimensions.index(x, y) {
			Some(index) => self.valid[index],
			None => false,
		}
	}
}

impl BlockedPredicate for CompositePassability {
	fn is_blocked(&self, x: i32, y: i32) -> bool {
		!self.is_valid(x, y)
	}
}
