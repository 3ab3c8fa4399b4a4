//! Measure FlowField generation for an open world of 1000x1000 cells with an
//! actor in the top right corner pathing to the bottom left, along with the
//! ROI limited recompute a FlowFieldCache performs around a moving target
//!

use bevy_flowfield_routes::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Full grid field towards a single target in the bottom left
fn flow_open(field: &mut FlowField, grid: &ObstacleGrid) {
	field.compute(&[GridCell::new(0, 999)], grid, None);
}

/// A cache following a target that hops far enough to skip the cooldown
fn flow_open_cached(cache: &mut FlowFieldCache, grid: &ObstacleGrid, tick: i32) {
	let x = 500 + (tick % 2) * 10;
	cache.update(&[GridCell::new(x, 500)], grid);
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.1).sample_size(10);
	let grid = ObstacleGrid::new(1000, 1000);
	let mut field = FlowField::new(1000, 1000);
	group.bench_function("calc_flow_open", |b| {
		b.iter(|| flow_open(black_box(&mut field), black_box(&grid)))
	});
	let config = NavigationConfig::default();
	let mut cache = FlowFieldCache::new(grid.get_dimensions(), &config);
	let mut tick = 0;
	group.bench_function("calc_flow_open_cached", |b| {
		b.iter(|| {
			tick += 1;
			flow_open_cached(black_box(&mut cache), black_box(&grid), tick)
		})
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
