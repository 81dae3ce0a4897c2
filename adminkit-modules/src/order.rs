//! Deterministic dependency ordering of modules

use crate::error::{ModuleError, Result};
use crate::manifest::{Manifest, Module};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

/// Topologically order manifests, returning indices into `manifests`.
///
/// Ids are visited depth-first in input order, so independent modules keep
/// their relative input order and every module follows its dependencies.
/// Later manifests reusing an id are skipped.
pub fn order_manifests(manifests: &[Manifest]) -> Result<Vec<usize>> {
    let mut by_id: FxHashMap<&str, usize> = FxHashMap::default();
    let mut roots = Vec::with_capacity(manifests.len());

    for (i, manifest) in manifests.iter().enumerate() {
        if by_id.contains_key(manifest.id.as_str()) {
            warn!("Skipping duplicate module {}", manifest.id);
            continue;
        }
        by_id.insert(manifest.id.as_str(), i);
        roots.push(i);
    }

    let mut sorted = Vec::with_capacity(roots.len());
    let mut visited = FxHashSet::default();
    let mut on_stack = FxHashSet::default();

    for i in roots {
        if !visited.contains(&i) {
            visit(i, manifests, &by_id, &mut visited, &mut on_stack, &mut sorted)?;
        }
    }

    Ok(sorted)
}

fn visit(
    i: usize,
    manifests: &[Manifest],
    by_id: &FxHashMap<&str, usize>,
    visited: &mut FxHashSet<usize>,
    on_stack: &mut FxHashSet<usize>,
    sorted: &mut Vec<usize>,
) -> Result<()> {
    let manifest = &manifests[i];
    on_stack.insert(i);

    let mut deps = Vec::with_capacity(manifest.dependencies.len());
    for dependency in &manifest.dependencies {
        let Some(&dep) = by_id.get(dependency.as_str()) else {
            return Err(ModuleError::MissingDependency {
                module: manifest.id.clone(),
                dependency: dependency.clone(),
            });
        };
        deps.push(dep);
    }

    // Input order, not declaration order, breaks ties between dependencies
    deps.sort_unstable();
    deps.dedup();

    for dep in deps {
        if on_stack.contains(&dep) {
            return Err(ModuleError::DependencyCycle {
                id: manifests[dep].id.clone(),
            });
        }
        if !visited.contains(&dep) {
            visit(dep, manifests, by_id, visited, on_stack, sorted)?;
        }
    }

    on_stack.remove(&i);
    visited.insert(i);
    sorted.push(i);
    Ok(())
}

/// Order boxed modules by dependency; duplicates by id are dropped
pub fn order_modules(modules: Vec<Box<dyn Module>>) -> Result<Vec<Box<dyn Module>>> {
    let manifests: Vec<Manifest> = modules.iter().map(|m| m.manifest()).collect();
    let order = order_manifests(&manifests)?;

    debug!(
        "Module order: {}",
        order
            .iter()
            .map(|&i| manifests[i].id.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    let mut slots: Vec<Option<Box<dyn Module>>> = modules.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(manifests: &[Manifest], order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| manifests[i].id.clone()).collect()
    }

    #[test]
    fn test_shared_dependency() {
        let manifests = vec![
            Manifest::new("A").depends_on("B").depends_on("C"),
            Manifest::new("B").depends_on("D"),
            Manifest::new("C").depends_on("D"),
            Manifest::new("D"),
        ];
        let order = order_manifests(&manifests).unwrap();
        assert_eq!(ids(&manifests, &order), vec!["D", "B", "C", "A"]);
    }

    #[test]
    fn test_insertion_order_breaks_ties() {
        let manifests = vec![
            Manifest::new("A").depends_on("B").depends_on("C"),
            Manifest::new("C").depends_on("D"),
            Manifest::new("B").depends_on("D"),
            Manifest::new("D"),
        ];
        let order = order_manifests(&manifests).unwrap();
        assert_eq!(ids(&manifests, &order), vec!["D", "C", "B", "A"]);

        // Declaration order of dependencies does not matter
        let swapped = vec![
            Manifest::new("A").depends_on("C").depends_on("B"),
            Manifest::new("B").depends_on("D"),
            Manifest::new("C").depends_on("D"),
            Manifest::new("D"),
        ];
        let order = order_manifests(&swapped).unwrap();
        assert_eq!(ids(&swapped, &order), vec!["D", "B", "C", "A"]);

        let independent = vec![Manifest::new("z"), Manifest::new("a"), Manifest::new("m")];
        let order = order_manifests(&independent).unwrap();
        assert_eq!(ids(&independent, &order), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_circular_dependency_detection() {
        let manifests = vec![
            Manifest::new("A").depends_on("B"),
            Manifest::new("B").depends_on("A"),
        ];
        let err = order_manifests(&manifests).unwrap_err();
        match err {
            ModuleError::DependencyCycle { id } => assert!(id == "A" || id == "B"),
            other => panic!("expected cycle, got {other:?}"),
        }

        let self_cycle = vec![Manifest::new("A").depends_on("A")];
        assert!(matches!(
            order_manifests(&self_cycle),
            Err(ModuleError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn test_missing_dependency() {
        let manifests = vec![Manifest::new("pages").depends_on("media")];
        match order_manifests(&manifests).unwrap_err() {
            ModuleError::MissingDependency { module, dependency } => {
                assert_eq!(module, "pages");
                assert_eq!(dependency, "media");
            }
            other => panic!("expected missing dependency, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let manifests = vec![
            Manifest::new("A"),
            Manifest::new("B").depends_on("A"),
            Manifest::new("A").depends_on("B"),
        ];
        let order = order_manifests(&manifests).unwrap();
        assert_eq!(order, vec![0, 1]);
    }
}
