use crate::error::CompilationError;
use ahash::AHashMap;
use std::collections::VecDeque;

/// Kahn's algorithm over step node names.
///
/// Returns the names in a valid linearization. Zero in-degree nodes are seeded in
/// declaration order and successors are visited in edge order, so the result is
/// deterministic. Nodes whose in-degree never reaches zero sit on or behind a cycle.
pub(super) fn topological_order<'g>(
    names: &[&'g str],
    next_steps: &AHashMap<&'g str, Vec<&'g str>>,
) -> Result<Vec<&'g str>, CompilationError> {
    let mut in_degree: AHashMap<&str, usize> = names.iter().map(|&name| (name, 0)).collect();

    for name in names {
        for target in next_steps.get(name).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(target) {
                *degree += 1;
            }
        }
    }

    let mut queue: VecDeque<&str> = names
        .iter()
        .copied()
        .filter(|name| in_degree.get(name) == Some(&0))
        .collect();
    let mut ordered = Vec::with_capacity(names.len());

    while let Some(name) = queue.pop_front() {
        ordered.push(name);
        for &target in next_steps.get(name).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(target) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(target);
                }
            }
        }
    }

    if ordered.len() != names.len() {
        let nodes = names
            .iter()
            .filter(|name| in_degree.get(*name).is_some_and(|&degree| degree > 0))
            .map(|name| name.to_string())
            .collect();
        return Err(CompilationError::CyclicGraph { nodes });
    }
    Ok(ordered)
}
