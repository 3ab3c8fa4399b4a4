//! Tunable parameters supplied by the host. None of them have a meaning on
//! their own, they trade responsiveness against the amount of work done per
//! tick and per route request
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Default cooldown, in ticks, between two recomputes of a cached field
pub const DEFAULT_MIN_TICKS_BETWEEN_COMPUTE: u32 = 5;
/// Default Manhattan displacement of a target that skips the cooldown
pub const DEFAULT_DIRTY_DISTANCE: i32 = 3;
/// Default number of cells added around the targets to form the ROI
pub const DEFAULT_ROI_MARGIN: i32 = 10;
/// Default cap on the number of routes a [RouteGraph] discovers
pub const DEFAULT_MAX_ROUTES: usize = 8;
/// Default cap on the outgoing edges explored from one junction
pub const DEFAULT_MAX_BRANCH_FANOUT: usize = 4;
/// Default lowest sampling weight any route may be given
pub const DEFAULT_MIN_ROUTE_WEIGHT: f32 = 0.05;

/// Parameters shared by every [FlowFieldCache] and [RouteGraph] created by
/// the plugin
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Resource, Reflect, Clone, Debug, PartialEq)]
pub struct NavigationConfig {
	/// Cooldown between recomputes of a cached field
	min_ticks_between_compute: u32,
	/// Manhattan distance a target must move to skip the cooldown
	dirty_distance: i32,
	/// Cells added around the targets' bounding box to form the ROI
	roi_margin: i32,
	/// Upper limit of routes enumerated per request
	max_routes: usize,
	/// Upper limit of outgoing edges explored from a single junction
	max_branch_fanout: usize,
	/// Floor applied to every route weight before normalisation
	min_route_weight: f32,
	/// Largest ring searched for stand-in goals around a blocked target
	virtual_target_radius: i32,
	/// Cost of each kind of step
	step_costs: StepCosts,
}

impl Default for NavigationConfig {
	fn default() -> Self {
		NavigationConfig {
			min_ticks_between_compute: DEFAULT_MIN_TICKS_BETWEEN_COMPUTE,
			dirty_distance: DEFAULT_DIRTY_DISTANCE,
			roi_margin: DEFAULT_ROI_MARGIN,
			max_routes: DEFAULT_MAX_ROUTES,
			max_branch_fanout: DEFAULT_MAX_BRANCH_FANOUT,
			min_route_weight: DEFAULT_MIN_ROUTE_WEIGHT,
			virtual_target_radius: DEFAULT_VIRTUAL_TARGET_RADIUS,
			step_costs: StepCosts::default(),
		}
	}
}

impl NavigationConfig {
	/// Get the cooldown between recomputes
	pub fn get_min_ticks_between_compute(&self) -> u32 {
		self.min_ticks_between_compute
	}
	/// Get the displacement that skips the cooldown
	pub fn get_dirty_distance(&self) -> i32 {
		self.dirty_distance
	}
	/// Get the ROI margin
	pub fn get_roi_margin(&self) -> i32 {
		self.roi_margin
	}
	/// Get the route cap
	pub fn get_max_routes(&self) -> usize {
		self.max_routes
	}
	/// Get the per-junction fan-out cap
	pub fn get_max_branch_fanout(&self) -> usize {
		self.max_branch_fanout
	}
	/// Get the route weight floor
	pub fn get_min_route_weight(&self) -> f32 {
		self.min_route_weight
	}
	/// Get the virtual target search radius
	pub fn get_virtual_target_radius(&self) -> i32 {
		self.virtual_target_radius
	}
	/// Get the step costs
	pub fn get_step_costs(&self) -> StepCosts {
		self.step_costs
	}
	/// Set the cooldown between recomputes
	pub fn with_min_ticks_between_compute(mut self, ticks: u32) -> Self {
		self.min_ticks_between_compute = ticks;
		self
	}
	/// Set the displacement that skips the cooldown, a value below 1 is
	/// raised to 1 so that a stationary target never counts as moved
	pub fn with_dirty_distance(mut self, distance: i32) -> Self {
		self.dirty_distance = distance.max(1);
		self
	}
	/// Set the ROI margin, negative margins become 0
	pub fn with_roi_margin(mut self, margin: i32) -> Self {
		self.roi_margin = margin.max(0);
		self
	}
	/// Set the route cap, at least one route is always allowed
	pub fn with_max_routes(mut self, max_routes: usize) -> Self {
		self.max_routes = max_routes.max(1);
		self
	}
	/// Set the per-junction fan-out cap, at least one edge is always allowed
	pub fn with_max_branch_fanout(mut self, fanout: usize) -> Self {
		self.max_branch_fanout = fanout.max(1);
		self
	}
	/// Set the route weight floor, clamped to `0.0..=1.0`
	pub fn with_min_route_weight(mut self, weight: f32) -> Self {
		self.min_route_weight = weight.clamp(0.0, 1.0);
		self
	}
	/// Set the virtual target search radius
	pub fn with_virtual_target_radius(mut self, radius: i32) -> Self {
		self.virtual_target_radius = radius.max(0);
		self
	}
	/// Set the step costs
	pub fn with_step_costs(mut self, step_costs: StepCosts) -> Self {
		self.step_costs = step_costs;
		self
	}
	/// From a `ron` file generate the [NavigationConfig]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> Self {
		let file = std::fs::File::open(path).expect("Failed opening NavigationConfig file");
		let config: NavigationConfig = match ron::de::from_reader(file) {
			Ok(config) => config,
			Err(e) => panic!("Failed deserializing NavigationConfig: {}", e),
		};
		config
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn defaults() {
		let config = NavigationConfig::default();
		assert_eq!(5, config.get_min_ticks_between_compute());
		assert_eq!(3, config.get_dirty_distance());
		assert_eq!(10, config.get_roi_margin());
		assert_eq!(8, config.get_max_routes());
		assert_eq!(4, config.get_max_branch_fanout());
		assert_eq!(8, config.get_virtual_target_radius());
		assert_eq!(StepCosts::default(), config.get_step_costs());
	}
	#[test]
	fn builders_clamp() {
		let config = NavigationConfig::default()
			.with_dirty_distance(0)
			.with_roi_margin(-4)
			.with_max_routes(0)
			.with_min_route_weight(3.0);
		assert_eq!(1, config.get_dirty_distance());
		assert_eq!(0, config.get_roi_margin());
		assert_eq!(1, config.get_max_routes());
		assert_eq!(1.0, config.get_min_route_weight());
	}
	#[test]
	#[cfg(feature = "ron")]
	fn config_from_ron() {
		let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/navigation_config.ron";
		let config = NavigationConfig::from_ron(path);
		assert_eq!(2, config.get_min_ticks_between_compute());
		assert_eq!(6, config.get_max_routes());
	}
	#[test]
	#[cfg(feature = "ron")]
	fn config_rejects_negative_step_costs() {
		let text = "(
			min_ticks_between_compute: 2,
			dirty_distance: 3,
			roi_margin: 12,
			max_routes: 6,
			max_branch_fanout: 3,
			min_route_weight: 0.1,
			virtual_target_radius: 6,
			step_costs: (horizontal: -10, vertical: 20, diagonal: 22),
		)";
		assert!(ron::from_str::<NavigationConfig>(text).is_err());
	}
}
