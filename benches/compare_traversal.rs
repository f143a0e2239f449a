use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use mazerace::algorithms::traversal::BreadthFirstSearch;
use mazerace::algorithms::traversal::DepthFirstSearch;
use mazerace::problems::grid::Grid;
use mazerace::problems::grid_generator::GridGenerator;

const SIDES: [usize; 3] = [15, 30, 50];
const DENSITY: u8 = 30;

fn bfs(grid: &mut Grid) -> usize {
    let (start, end) = (grid.start(), grid.end());
    BreadthFirstSearch::new(grid, start, end)
        .run(|_| {})
        .expanded
}

fn dfs(grid: &mut Grid) -> usize {
    let (start, end) = (grid.start(), grid.end());
    DepthFirstSearch::new(grid, start, end).run(|_| {}).expanded
}

fn compare_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("Grid traversal");
    let generator = GridGenerator::default();

    for side in SIDES {
        for i in 0..3 {
            let mut rng = ChaCha8Rng::seed_from_u64(i);
            let Ok(grid) = generator.generate(&mut rng, side, side, DENSITY) else {
                continue;
            };
            let instance_name = format!("{side}x{side}:{i}");

            let mut bfs_grid = grid.clone();
            group.bench_with_input(
                BenchmarkId::new("BFS", &instance_name),
                &instance_name,
                |b, _| b.iter(|| bfs(&mut bfs_grid)),
            );
            let mut dfs_grid = grid;
            group.bench_with_input(
                BenchmarkId::new("DFS", &instance_name),
                &instance_name,
                |b, _| b.iter(|| dfs(&mut dfs_grid)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, compare_traversal);
criterion_main!(benches);
