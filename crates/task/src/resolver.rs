//! Dependency resolution: requested task names to an ordered execution plan
//!
//! Resolution is a depth-first post-order traversal. Requested names are
//! visited in the order given and each task's dependencies in the order they
//! were declared, so a fixed registration yields the same plan every time.
//! A task reachable through several paths is placed where the first
//! traversal reaches it and appears only once.

use crate::registry::TaskRegistry;
use kiln_core::{Error, Result};
use std::collections::HashMap;

/// Ordered, duplicate-free sequence of task names to execute.
///
/// Every task's transitive dependencies precede it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPlan {
    order: Vec<String>,
}

impl ExecutionPlan {
    pub fn tasks(&self) -> &[String] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of a task in the plan
    pub fn position(&self, task_name: &str) -> Option<usize> {
        self.order.iter().position(|name| name == task_name)
    }
}

impl<'a> IntoIterator for &'a ExecutionPlan {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Resolve `requested` against `registry` into an execution plan.
///
/// Fails with `NoTasksRequested` for an empty request, `UnknownTask` for the
/// first requested or depended-on name without a registration, and
/// `CyclicDependency` when a task is reached again while its own
/// dependencies are still being resolved.
pub fn resolve<S: AsRef<str>>(requested: &[S], registry: &TaskRegistry) -> Result<ExecutionPlan> {
    if requested.is_empty() {
        return Err(Error::NoTasksRequested);
    }

    // Validate all requested names up front so nothing is traversed for a bad request
    let mut roots: Vec<&str> = Vec::with_capacity(requested.len());
    for name in requested {
        let task = registry.lookup(name.as_ref())?;
        if !roots.contains(&task.name()) {
            roots.push(task.name());
        }
    }

    let mut traversal = Traversal {
        registry,
        marks: HashMap::with_capacity(registry.len()),
        stack: Vec::new(),
        order: Vec::with_capacity(registry.len()),
    };

    for root in roots {
        traversal.visit(root, None)?;
    }

    tracing::debug!(
        requested = %roots_display(requested),
        plan = ?traversal.order,
        "Resolved execution plan"
    );

    Ok(ExecutionPlan {
        order: traversal.order,
    })
}

fn roots_display<S: AsRef<str>>(requested: &[S]) -> String {
    requested
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

struct Traversal<'r> {
    registry: &'r TaskRegistry,
    marks: HashMap<&'r str, Mark>,
    stack: Vec<&'r str>,
    order: Vec<String>,
}

impl<'r> Traversal<'r> {
    fn visit(&mut self, name: &str, required_by: Option<&str>) -> Result<()> {
        match self.marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => return Err(self.cycle_error(name)),
            None => {}
        }

        let registry = self.registry;
        let task = match required_by {
            Some(parent) => registry
                .get(name)
                .ok_or_else(|| Error::unknown_dependency(name, parent))?,
            None => registry.lookup(name)?,
        };
        let name = task.name();

        self.marks.insert(name, Mark::InProgress);
        self.stack.push(name);

        for dependency in task.dependencies() {
            self.visit(dependency, Some(name))?;
        }

        self.stack.pop();
        self.marks.insert(name, Mark::Done);
        self.order.push(name.to_string());

        Ok(())
    }

    /// Build the error for a cycle closed by revisiting `name`
    fn cycle_error(&self, name: &str) -> Error {
        let start = self
            .stack
            .iter()
            .position(|entry| *entry == name)
            .unwrap_or(0);
        let mut cycle: Vec<String> = self.stack[start..].iter().map(|s| s.to_string()).collect();
        cycle.push(name.to_string());

        Error::cyclic_dependency(name, cycle)
    }
}
