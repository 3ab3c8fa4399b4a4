//! Measure initialising CompositePassability for a large body on a 1000x1000
//! world, and the ROI limited rebuild after a single wall changes
//!

use bevy_flowfield_routes::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Build the passability of a 3x3 body from scratch
fn init_passability(grid: &ObstacleGrid) -> CompositePassability {
	let mut passability = CompositePassability::new(grid.get_dimensions(), Footprint::new(3, 3, 1, 1));
	passability.compute(grid);
	passability
}

/// Rebuild only the headers a single changed cell can affect
fn update_passability(passability: &mut CompositePassability, grid: &ObstacleGrid) {
	let changed = RegionOfInterest::new(GridCell::new(500, 500), GridCell::new(500, 500));
	let headers = passability.get_footprint().affected_headers(&changed);
	passability.compute_region(grid, headers);
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("data_initialisation");
	group.significance_level(0.05).sample_size(100);
	let mut grid = ObstacleGrid::new(1000, 1000);
	for i in (0..1000).step_by(7) {
		grid.set_blocked(i, (i * 3) % 1000, true);
	}
	group.bench_function("init_passability", |b| {
		b.iter(|| init_passability(black_box(&grid)))
	});
	let mut passability = init_passability(&grid);
	group.bench_function("update_passability", |b| {
		b.iter(|| update_passability(black_box(&mut passability), black_box(&grid)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
