use kiln_task::{resolve, Task, TaskRegistry};
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::{BTreeSet, HashSet};

fn task_name(i: usize) -> String {
    format!("task{i}")
}

/// Task `i` may only depend on tasks with a lower index, so the graph is acyclic
fn build_registry(edges: &[Vec<Index>]) -> (TaskRegistry, Vec<Vec<usize>>) {
    let mut registry = TaskRegistry::new();
    let mut dependencies = Vec::with_capacity(edges.len());

    for (i, targets) in edges.iter().enumerate() {
        let deps: Vec<usize> = if i == 0 {
            Vec::new()
        } else {
            targets.iter().map(|idx| idx.index(i)).collect()
        };
        let task = Task::new(task_name(i), |_, _| Ok(()))
            .depends_on_all(deps.iter().map(|&d| task_name(d)));
        registry.register_task(task).unwrap();
        dependencies.push(deps);
    }

    (registry, dependencies)
}

fn closure(roots: &[usize], dependencies: &[Vec<usize>]) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut pending: Vec<usize> = roots.to_vec();
    while let Some(i) = pending.pop() {
        if seen.insert(task_name(i)) {
            pending.extend(dependencies[i].iter().copied());
        }
    }
    seen
}

fn graph() -> impl Strategy<Value = (Vec<Vec<Index>>, Vec<Index>)> {
    (
        prop::collection::vec(prop::collection::vec(any::<Index>(), 0..4), 1..16),
        prop::collection::vec(any::<Index>(), 1..5),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_plan_is_exactly_the_dependency_closure((edges, picks) in graph()) {
        let (registry, dependencies) = build_registry(&edges);
        let roots: Vec<usize> = picks.iter().map(|idx| idx.index(edges.len())).collect();
        let requested: Vec<String> = roots.iter().map(|&i| task_name(i)).collect();

        let plan = resolve(&requested, &registry).unwrap();

        let planned: BTreeSet<String> = plan.tasks().iter().cloned().collect();
        prop_assert_eq!(planned, closure(&roots, &dependencies));
    }

    #[test]
    fn test_plan_has_no_duplicates_and_respects_dependencies((edges, picks) in graph()) {
        let (registry, dependencies) = build_registry(&edges);
        let requested: Vec<String> = picks
            .iter()
            .map(|idx| task_name(idx.index(edges.len())))
            .collect();

        let plan = resolve(&requested, &registry).unwrap();

        let mut seen = HashSet::new();
        for name in plan.iter() {
            prop_assert!(seen.insert(name.to_string()), "duplicate entry {}", name);
        }

        for (i, deps) in dependencies.iter().enumerate() {
            let Some(position) = plan.position(&task_name(i)) else { continue };
            for &dep in deps {
                let dep_position = plan.position(&task_name(dep));
                prop_assert!(matches!(dep_position, Some(p) if p < position));
            }
        }
    }

    #[test]
    fn test_resolution_is_deterministic((edges, picks) in graph()) {
        let (registry, _) = build_registry(&edges);
        let requested: Vec<String> = picks
            .iter()
            .map(|idx| task_name(idx.index(edges.len())))
            .collect();

        let first = resolve(&requested, &registry).unwrap();
        let second = resolve(&requested, &registry).unwrap();
        prop_assert_eq!(first, second);
    }
}
