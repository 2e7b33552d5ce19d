use std::convert::Infallible;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scenemap_common::WorldDescription;
use scenemap_kernel::{GraphBuilder, TraversalConfig, VisitStep, Visitor, WorldMap};
use scenemap_tools::GraphInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scenemap-cli", about = "CLI tool for scene map operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print tool version
    Info,
    /// Build the scene graph and report what survived
    Inspect {
        /// World description file (.json, .yaml or .yml)
        #[arg(short, long)]
        world: PathBuf,
        /// Show the doors of one scene
        #[arg(long)]
        scene: Option<String>,
        /// Report scenes unreachable from this scene
        #[arg(long)]
        from: Option<String>,
    },
    /// Walk the scene graph breadth-first from a start scene
    Walk {
        /// World description file (.json, .yaml or .yml)
        #[arg(short, long)]
        world: PathBuf,
        /// Start scene
        #[arg(short, long)]
        start: String,
        /// Visit the start scene only once even if a neighbour links back
        #[arg(long)]
        claim_seed: bool,
        /// Print each scene's doors while walking
        #[arg(long)]
        doors: bool,
    },
}

/// Prints one line per visited scene.
struct PrintVisitor {
    doors: bool,
}

impl Visitor for PrintVisitor {
    type Error = Infallible;

    async fn visit(&mut self, step: VisitStep<'_>) -> Result<(), Infallible> {
        println!(
            "{:>4}  {:<24} after {:<24} visited={}",
            step.step,
            step.current.id(),
            step.previous_visited.map_or("-", |n| n.id()),
            step.visited.len()
        );
        if self.doors {
            for (door, dest) in step.current.connections() {
                println!("        {door} -> {}", dest.scene_name);
            }
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("scenemap-cli v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Inspect { world, scene, from } => {
            tracing::info!(path = %world.display(), "loading world");
            let description = WorldDescription::load(&world)?;
            let mut builder = GraphBuilder::new();
            let graph = builder.build(&description)?;
            let stats = builder.stats();

            println!(
                "Records: {} built={} skipped_scenes={} skipped_doors={} overwritten_doors={}",
                stats.records,
                stats.nodes_built,
                stats.scenes_skipped,
                stats.transitions_skipped,
                stats.doors_overwritten
            );
            println!("{}", GraphInspector::summary(&graph));

            if let Some(id) = scene {
                match GraphInspector::inspect_scene(&graph, &id) {
                    Some(info) => println!("{info}"),
                    None => println!("Scene {id} is not in the graph"),
                }
            }
            if let Some(start) = from {
                let split = GraphInspector::reachability(&graph, &start);
                println!(
                    "From {start}: reachable={} unreachable={}",
                    split.reachable.len(),
                    split.unreachable.len()
                );
                for id in split.unreachable {
                    println!("  {id}");
                }
            }
        }
        Commands::Walk {
            world,
            start,
            claim_seed,
            doors,
        } => {
            let config = if claim_seed {
                TraversalConfig::claim_seed()
            } else {
                TraversalConfig::default()
            };
            tracing::info!(path = %world.display(), start = %start, "loading world");
            let mut map = WorldMap::new(WorldDescription::load(&world)?);
            let mut visitor = PrintVisitor { doors };
            let report = pollster::block_on(map.start_traversal(&start, &mut visitor, config))?;
            println!(
                "Walk {}: status={:?} steps={} visited={}",
                report.id,
                report.status,
                report.steps,
                report.visited.len()
            );
        }
    }

    Ok(())
}
