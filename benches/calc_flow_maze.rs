//! Measure FlowField generation for a world with a snake-like maze of walls
//! running up and down the entire world
//!
//! ```txt
//!  _____________________________
//! |__|__|__|xx|__|__|__|xx|__|__|
//! |__|xx|__|xx|__|xx|__|xx|__|xx|
//! |__|xx|__|xx|__|xx|__|xx|__|xx|
//! |__|xx|__|xx|__|xx|__|xx|__|xx|
//! |__|xx|__|__|__|xx|__|__|__|xx|
//! ```
//!

use bevy_flowfield_routes::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Every other column is a wall with a gap alternating between the top and
/// bottom rows
fn maze(width: i32, height: i32) -> ObstacleGrid {
	let mut grid = ObstacleGrid::new(width, height);
	for x in (1..width).step_by(2) {
		let gap = if (x / 2) % 2 == 0 { height - 1 } else { 0 };
		for y in 0..height {
			if y != gap {
				grid.set_blocked(x, y, true);
			}
		}
	}
	grid
}

/// Field towards the far end of the maze
fn flow_maze(field: &mut FlowField, grid: &ObstacleGrid) {
	field.compute(&[GridCell::new(0, 0)], grid, None);
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.1).sample_size(10);
	let grid = maze(500, 500);
	let mut field = FlowField::new(500, 500);
	group.bench_function("calc_flow_maze", |b| {
		b.iter(|| flow_maze(black_box(&mut field), black_box(&grid)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
