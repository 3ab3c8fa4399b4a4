//! The kinds of fields used by the algorithm and the [FlowFieldCache] that
//! decides when a field is worth recomputing
//!

pub mod flow_field;
pub mod passability_field;

use crate::prelude::*;
use bevy::prelude::*;

/// The host's view of its obstacle grid. Implementors must be side-effect
/// free for the duration of a computation and must report `true` for any
/// coordinate outside of the grid
pub trait BlockedPredicate {
	/// Is the cell at `(x, y)` impassable
	fn is_blocked(&self, x: i32, y: i32) -> bool;
}

impl<F: Fn(i32, i32) -> bool + ?Sized> BlockedPredicate for F {
	fn is_blocked(&self, x: i32, y: i32) -> bool {
		self(x, y)
	}
}

/// The rectangle occupied by a multi-cell actor along with the position of
/// its header (anchor) cell inside that rectangle
#[cfg_attr(
	feature = "serde",
	derive(serde::Deserialize, serde::Serialize),
	serde(try_from = "UncheckedFootprint")
)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Reflect)]
pub struct Footprint {
	/// Columns covered by the actor
	width: i32,
	/// Rows covered by the actor
	height: i32,
	/// Column of the header relative to the left edge of the footprint
	header_offset_x: i32,
	/// Row of the header relative to the top edge of the footprint
	header_offset_y: i32,
}

/// [Footprint] as read from a file, checked before use
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedFootprint {
	/// Columns covered by the actor
	width: i32,
	/// Rows covered by the actor
	height: i32,
	/// Column of the header
	header_offset_x: i32,
	/// Row of the header
	header_offset_y: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedFootprint> for Footprint {
	type Error = String;
	fn try_from(value: UncheckedFootprint) -> Result<Self, Self::Error> {
		Footprint::try_new(
			value.width,
			value.height,
			value.header_offset_x,
			value.header_offset_y,
		)
	}
}

impl Default for Footprint {
	fn default() -> Self {
		Footprint::single()
	}
}

impl Footprint {
	/// Create a new instance of [Footprint]. Panics if the size is not
	/// positive or the header lies outside of the rectangle
	pub fn new(width: i32, height: i32, header_offset_x: i32, header_offset_y: i32) -> Self {
		match Footprint::try_new(width, height, header_offset_x, header_offset_y) {
			Ok(footprint) => footprint,
			Err(e) => panic!("{}", e),
		}
	}
	/// Create a new instance of [Footprint], rejecting an empty size or a
	/// header outside of the rectangle
	pub fn try_new(
		width: i32,
		height: i32,
		header_offset_x: i32,
		header_offset_y: i32,
	) -> Result<Self, String> {
		if width < 1 || height < 1 {
			return Err(format!("Footprint must be at least 1x1, got {}x{}", width, height));
		}
		if header_offset_x < 0
			|| header_offset_y < 0
			|| header_offset_x >= width
			|| header_offset_y >= height
		{
			return Err(format!(
				"Header offset ({}, {}) does not sit inside a {}x{} footprint",
				header_offset_x, header_offset_y, width, height
			));
		}
		Ok(Footprint {
			width,
			height,
			header_offset_x,
			header_offset_y,
		})
	}
	/// A footprint covering only its header
	pub fn single() -> Self {
		Footprint {
			width: 1,
			height: 1,
			header_offset_x: 0,
			header_offset_y: 0,
		}
	}
	/// Get the width
	pub fn get_width(&self) -> i32 {
		self.width
	}
	/// Get the height
	pub fn get_height(&self) -> i32 {
		self.height
	}
	/// Get the header `(x, y)` offset within the footprint
	pub fn get_header_offset(&self) -> (i32, i32) {
		(self.header_offset_x, self.header_offset_y)
	}
	/// Does the footprint cover more than one cell
	pub fn is_composite(&self) -> bool {
		self.width > 1 || self.height > 1
	}
	/// The cells covered when the header sits at `(x, y)`, as an inclusive
	/// region
	pub fn covered_region(&self, x: i32, y: i32) -> RegionOfInterest {
		let left = x - self.header_offset_x;
		let top = y - self.header_offset_y;
		RegionOfInterest::new(
			GridCell::new(left, top),
			GridCell::new(left + self.width - 1, top + self.height - 1),
		)
	}
	/// Every header position whose footprint would cover any cell of
	/// `changed`, used to limit recomputation after an obstacle edit
	pub fn affected_headers(&self, changed: &RegionOfInterest) -> RegionOfInterest {
		let min = changed.get_min();
		let max = changed.get_max();
		RegionOfInterest::new(
			GridCell::new(
				min.get_x() - (self.width - 1 - self.header_offset_x),
				min.get_y() - (self.height - 1 - self.header_offset_y),
			),
			GridCell::new(max.get_x() + self.header_offset_x, max.get_y() + self.header_offset_y),
		)
	}
}

/// Wraps a [FlowField] with throttling so that a moving set of targets does
/// not trigger a full Dijkstra pass every tick.
///
/// A recompute happens when an update is pending and enough ticks have
/// passed since the last one, or when the field has never been computed.
/// Targets jumping by at least `dirty_distance` (or the number of targets
/// changing) bypass the cooldown. Between recomputes actors keep reading the
/// previous, slightly stale, directions
#[derive(Component, Clone)]
pub struct FlowFieldCache {
	/// The field actors read from
	field: FlowField,
	/// Targets the field was last computed for
	last_targets: Vec<GridCell>,
	/// Ticks elapsed since the last recompute
	ticks_since_compute: u32,
	/// Cooldown between recomputes
	min_ticks_between_compute: u32,
	/// Manhattan distance a target must move to force an immediate recompute
	dirty_distance: i32,
	/// Cells added around the targets' bounding box to produce the ROI
	roi_margin: i32,
	/// Latched by any detected change, cleared by a recompute
	pending_update: bool,
}

impl FlowFieldCache {
	/// Create a new instance of [FlowFieldCache] for a grid of `dimensions`
	pub fn new(dimensions: GridDimensions, config: &NavigationConfig) -> Self {
		FlowFieldCache {
			field: FlowField::from_config(dimensions, config),
			last_targets: Vec::new(),
			ticks_since_compute: 0,
			min_ticks_between_compute: config.get_min_ticks_between_compute(),
			dirty_distance: config.get_dirty_distance(),
			roi_margin: config.get_roi_margin(),
			pending_update: false,
		}
	}
	/// Get a reference to the cached [FlowField]
	pub fn get_field(&self) -> &FlowField {
		&self.field
	}
	/// Targets used by the most recent recompute
	pub fn get_last_targets(&self) -> &[GridCell] {
		&self.last_targets
	}
	/// Whether a change has been seen that has not yet been computed
	pub fn is_pending(&self) -> bool {
		self.pending_update
	}
	/// Get the number of ticks since the field was last computed
	pub fn get_ticks_since_compute(&self) -> u32 {
		self.ticks_since_compute
	}
	/// Direction to move from `(x, y)`, see [FlowField::get_direction]
	pub fn get_direction(&self, x: i32, y: i32) -> Ordinal {
		self.field.get_direction(x, y)
	}
	/// Distance to the nearest target from `(x, y)`, see [FlowField::get_distance]
	pub fn get_distance(&self, x: i32, y: i32) -> i32 {
		self.field.get_distance(x, y)
	}
	/// Request a recompute once the cooldown allows it, typically after
	/// the obstacle grid has been edited
	pub fn mark_dirty(&mut self) {
		self.pending_update = true;
	}
	/// Give cells that have just opened up a direction without waiting for a
	/// recompute, see [FlowField::incremental_update]. Returns the number of
	/// cells patched
	pub fn patch<P: BlockedPredicate + ?Sized>(&mut self, is_blocked: &P) -> usize {
		self.field.incremental_update(is_blocked)
	}
	/// Resize the underlying field, which invalidates it so the next
	/// [FlowFieldCache::update] recomputes regardless of cooldown
	pub fn resize(&mut self, width: i32, height: i32) {
		self.field.resize(width, height);
		self.pending_update = true;
	}
	/// Advance the cache by one tick. Returns `true` if the field was
	/// recomputed
	pub fn update<P: BlockedPredicate + ?Sized>(
		&mut self,
		targets: &[GridCell],
		is_blocked: &P,
	) -> bool {
		self.ticks_since_compute = self.ticks_since_compute.saturating_add(1);
		self.detect_target_changes(targets);

		let cooled_down = self.ticks_since_compute >= self.min_ticks_between_compute;
		if !(self.pending_update && cooled_down) && self.field.is_valid() {
			return false;
		}
		let dimensions = self.field.get_dimensions();
		let in_bounds: Vec<GridCell> = targets
			.iter()
			.copied()
			.filter(|t| dimensions.in_bounds(t.get_x(), t.get_y()))
			.collect();
		let Some(roi) = RegionOfInterest::bounding(&in_bounds)
			.map(|b| b.expand(self.roi_margin))
			.and_then(|r| r.clamp(&dimensions))
		else {
			trace!("No in-bounds targets, flow field cache left untouched");
			return false;
		};
		self.field.compute(targets, is_blocked, Some(roi));
		self.last_targets.clear();
		self.last_targets.extend_from_slice(targets);
		self.ticks_since_compute = 0;
		self.pending_update = false;
		true
	}
	/// Compare `targets` against the set last computed for and raise the
	/// pending latch (and if the change is large, skip the cooldown)
	fn detect_target_changes(&mut self, targets: &[GridCell]) {
		if targets.len() != self.last_targets.len() {
			self.force_eligible();
			return;
		}
		let mut moved = false;
		for (current, previous) in targets.iter().zip(self.last_targets.iter()) {
			let displacement = current.manhattan_distance(previous);
			if displacement >= self.dirty_distance {
				self.force_eligible();
				return;
			}
			moved |= displacement > 0;
		}
		if moved {
			self.pending_update = true;
		}
	}
	/// Raise the latch and fast-forward the cooldown
	fn force_eligible(&mut self) {
		self.pending_update = true;
		self.ticks_since_compute = self.ticks_since_compute.max(self.min_ticks_between_compute);
	}
}
