//! Property tests for graph construction and breadth-first traversal over
//! randomly generated, partially invalid world descriptions.

use std::collections::BTreeSet;

use proptest::{
    collection::vec,
    option::weighted,
    prelude::{Strategy, prop_assert, prop_assert_eq},
    proptest,
    test_runner::Config as ProptestConfig,
};
use scenemap_common::{SceneRecord, TransitionRecord, WorldDescription};
use scenemap_kernel::{
    Graph, GraphBuilder, TraversalConfig, TraversalStatus, Traverser, VisitStep, visit_fn,
};

/// Number of scene names that never exist, so some doors always dangle.
const PHANTOM_SCENES: usize = 3;

/// Scene `Si` at index `i`; each entry may be null, may have a null
/// transition list, and points at `S0..S(n + PHANTOM_SCENES)`.
fn world_strategy() -> impl Strategy<Value = WorldDescription> {
    (1usize..12).prop_flat_map(|n| {
        vec(
            weighted(0.9, weighted(0.85, vec(0..n + PHANTOM_SCENES, 0..4))),
            n,
        )
        .prop_map(|entries| WorldDescription {
            scenes: entries
                .into_iter()
                .enumerate()
                .map(|(i, entry)| {
                    entry.map(|doors| SceneRecord {
                        scene_name: format!("S{i}"),
                        transitions: doors.map(|dests| {
                            dests
                                .into_iter()
                                .enumerate()
                                .map(|(j, d)| TransitionRecord::new(format!("door{j}"), format!("S{d}")))
                                .collect()
                        }),
                    })
                })
                .collect(),
        })
    })
}

/// Scenes a well-formed build must keep: present, with a transition list,
/// and at least one door into a present record.
fn expected_ids(world: &WorldDescription) -> BTreeSet<String> {
    world
        .scenes
        .iter()
        .flatten()
        .filter(|s| {
            s.transitions
                .as_ref()
                .is_some_and(|ts| ts.iter().any(|t| world.find(&t.destination_scene_name).is_some()))
        })
        .map(|s| s.scene_name.clone())
        .collect()
}

/// Reference reachability by depth-first search over resolved connections.
fn reachable(graph: &Graph, start: &str) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![start.to_string()];
    while let Some(id) = stack.pop() {
        let Some(node) = graph.get(&id) else { continue };
        if !seen.insert(id) {
            continue;
        }
        stack.extend(node.destination_ids().map(str::to_string));
    }
    seen
}

fn walk<'g>(
    graph: &'g Graph,
    start: &str,
    config: TraversalConfig,
) -> (TraversalStatus, Vec<String>, Traverser<'g>) {
    walk_until(graph, start, config, None)
}

/// Walk from `start`, raising the cancel flag during step `stop_after` if
/// the walk gets that far.
fn walk_until<'g>(
    graph: &'g Graph,
    start: &str,
    config: TraversalConfig,
    stop_after: Option<usize>,
) -> (TraversalStatus, Vec<String>, Traverser<'g>) {
    let mut order = Vec::new();
    let mut traverser = Traverser::with_config(graph, config);
    let flag = traverser.cancel_flag();
    let status = {
        let mut visitor = visit_fn(|step: VisitStep<'_>| {
            order.push(step.current.id().to_string());
            if stop_after == Some(step.step) {
                flag.cancel();
            }
            Ok::<_, std::convert::Infallible>(())
        });
        pollster::block_on(traverser.traverse(start, &mut visitor)).unwrap()
    };
    (status, order, traverser)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn graph_keeps_exactly_the_well_formed_scenes(world in world_strategy()) {
        let graph = GraphBuilder::new().build(&world).unwrap();
        let ids: BTreeSet<String> = graph.ids().map(str::to_string).collect();

        prop_assert!(graph.len() <= world.len());
        prop_assert_eq!(ids, expected_ids(&world));
        for node in graph.iter() {
            prop_assert!(!node.connections().is_empty());
        }
    }

    #[test]
    fn claim_seed_visits_reachable_set_once(world in world_strategy()) {
        let graph = GraphBuilder::new().build(&world).unwrap();
        let (status, order, traverser) = walk(&graph, "S0", TraversalConfig::claim_seed());

        if !graph.contains("S0") {
            prop_assert_eq!(status, TraversalStatus::Aborted);
            prop_assert!(order.is_empty());
            return Ok(());
        }

        prop_assert_eq!(status, TraversalStatus::Completed);
        let visited: BTreeSet<String> = order.iter().cloned().collect();
        prop_assert_eq!(visited.len(), order.len());
        prop_assert_eq!(&visited, &reachable(&graph, "S0"));
        prop_assert_eq!(traverser.visited().len(), order.len());
        for id in &visited {
            prop_assert!(!traverser.is_remaining(id));
        }
        prop_assert_eq!(traverser.remaining_len() + visited.len(), graph.len());
    }

    #[test]
    fn claim_seed_sets_stay_disjoint_at_every_step(world in world_strategy(), k in 1usize..12) {
        let graph = GraphBuilder::new().build(&world).unwrap();
        let (status, order, traverser) =
            walk_until(&graph, "S0", TraversalConfig::claim_seed(), Some(k));
        if status == TraversalStatus::Aborted {
            return Ok(());
        }

        prop_assert!(order.len() <= k);
        prop_assert_eq!(traverser.visited().len(), order.len());
        let pending: BTreeSet<&str> = traverser.pending_ids().collect();
        prop_assert_eq!(pending.len(), traverser.pending_len());
        for id in traverser.visited().ids() {
            prop_assert!(!traverser.is_remaining(id));
            prop_assert!(!pending.contains(id));
        }
        for id in &pending {
            prop_assert!(!traverser.is_remaining(id));
        }
        prop_assert_eq!(
            traverser.remaining_len() + pending.len() + traverser.visited().len(),
            graph.len()
        );
        if status == TraversalStatus::Cancelled {
            prop_assert_eq!(order.len(), k);
            prop_assert!(!pending.is_empty());
        } else {
            prop_assert_eq!(status, TraversalStatus::Completed);
            prop_assert!(pending.is_empty());
        }
    }

    #[test]
    fn legacy_revisits_only_the_seed(world in world_strategy()) {
        let graph = GraphBuilder::new().build(&world).unwrap();
        let (status, order, traverser) = walk(&graph, "S0", TraversalConfig::default());
        if status == TraversalStatus::Aborted {
            return Ok(());
        }

        let visited: BTreeSet<String> = order.iter().cloned().collect();
        prop_assert_eq!(&visited, &reachable(&graph, "S0"));
        prop_assert_eq!(traverser.visited().len(), visited.len());
        prop_assert!(order.len() <= visited.len() + 1);
        if order.len() == visited.len() + 1 {
            prop_assert_eq!(order.iter().filter(|id| id.as_str() == "S0").count(), 2);
        }
    }
}
