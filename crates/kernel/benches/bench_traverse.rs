use std::hint::black_box;
use std::time::Instant;

use scenemap_common::{SceneRecord, TransitionRecord, WorldDescription};
use scenemap_kernel::{GraphBuilder, TraversalConfig, Traverser, VisitStep, visit_fn};

/// Square grid of scenes, each linked to its right and lower neighbour and
/// back, plus one dangling door per scene.
fn make_world(side: usize) -> WorldDescription {
    let name = |x: usize, y: usize| format!("Room_{x}_{y}");
    let mut world = WorldDescription::new();
    for y in 0..side {
        for x in 0..side {
            let mut doors = vec![TransitionRecord::new("dead_end", "Unbuilt")];
            if x + 1 < side {
                doors.push(TransitionRecord::new("right1", name(x + 1, y)));
            }
            if x > 0 {
                doors.push(TransitionRecord::new("left1", name(x - 1, y)));
            }
            if y + 1 < side {
                doors.push(TransitionRecord::new("bot1", name(x, y + 1)));
            }
            if y > 0 {
                doors.push(TransitionRecord::new("top1", name(x, y - 1)));
            }
            world.push(SceneRecord::new(name(x, y), doors));
        }
    }
    world
}

fn bench_build(side: usize, iterations: usize) {
    let world = make_world(side);
    let scenes = side * side;

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(GraphBuilder::new().build(black_box(&world)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  build ({scenes} scenes, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_traverse(side: usize, iterations: usize) {
    let world = make_world(side);
    let scenes = side * side;
    let graph = match GraphBuilder::new().build(&world) {
        Ok(graph) => graph,
        Err(err) => panic!("bench world failed to build: {err}"),
    };

    let start = Instant::now();
    for _ in 0..iterations {
        let mut traverser = Traverser::with_config(&graph, TraversalConfig::claim_seed());
        let mut visitor = visit_fn(|step: VisitStep<'_>| {
            black_box(step.current.id());
            Ok::<_, std::convert::Infallible>(())
        });
        let _ = black_box(pollster::block_on(traverser.traverse("Room_0_0", &mut visitor)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  traverse ({scenes} scenes, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Scene Graph Benchmarks ===\n");

    println!("Graph build:");
    bench_build(10, 1000);
    bench_build(32, 100);
    bench_build(100, 10);

    println!("\nBreadth-first traversal:");
    bench_traverse(10, 1000);
    bench_traverse(32, 100);
    bench_traverse(100, 10);

    println!("\n=== Done ===");
}
