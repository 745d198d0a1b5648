//! Process graph type and execution.

use std::fmt;
use std::sync::Arc;

/// A single step: mutates the context, returns nothing on success.
pub type Step<C, E> = Arc<dyn Fn(&mut C) -> Result<(), E> + Send + Sync>;

/// Entry of a process: a step or a nested process.
pub enum Node<C, E> {
    Step(Step<C, E>),
    Process(Process<C, E>),
}

impl<C, E> Clone for Node<C, E> {
    fn clone(&self) -> Self {
        match self {
            Node::Step(step) => Node::Step(Arc::clone(step)),
            Node::Process(process) => Node::Process(process.clone()),
        }
    }
}

impl<C, E> fmt::Debug for Node<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Step(_) => f.write_str("Step"),
            Node::Process(process) => f.debug_tuple("Process").field(process).finish(),
        }
    }
}

/// Ordered mapping from name to [`Node`].
///
/// Insertion order is execution order. Inserting under an existing name
/// replaces that entry in place and keeps its position. There is no removal:
/// a step that should not run is never added.
pub struct Process<C, E> {
    nodes: Vec<(String, Node<C, E>)>,
}

impl<C, E> Default for Process<C, E> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<C, E> Clone for Process<C, E> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
        }
    }
}

impl<C, E> fmt::Debug for Process<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.nodes.iter().map(|(name, node)| (name, node)))
            .finish()
    }
}

impl<C, E> Process<C, E> {
    /// Create an empty process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append (or replace) a step, builder style.
    pub fn step<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C) -> Result<(), E> + Send + Sync + 'static,
    {
        self.insert_step(name, f);
        self
    }

    /// Append (or replace) a nested process, builder style.
    pub fn sub(mut self, name: impl Into<String>, process: Process<C, E>) -> Self {
        self.insert_process(name, process);
        self
    }

    pub fn insert_step<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&mut C) -> Result<(), E> + Send + Sync + 'static,
    {
        self.insert(name.into(), Node::Step(Arc::new(f)));
    }

    pub fn insert_process(&mut self, name: impl Into<String>, process: Process<C, E>) {
        self.insert(name.into(), Node::Process(process));
    }

    fn insert(&mut self, name: String, node: Node<C, E>) {
        if let Some(slot) = self.nodes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = node;
        } else {
            self.nodes.push((name, node));
        }
    }

    /// Execute every step depth-first in insertion order.
    pub fn run(&self, context: &mut C) -> Result<(), E> {
        for (name, node) in &self.nodes {
            match node {
                Node::Step(step) => {
                    tracing::trace!(step = %name, "run");
                    step(context)?;
                }
                Node::Process(process) => process.run(context)?,
            }
        }
        Ok(())
    }

    /// Top-level names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|(n, _)| n.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Node<C, E>> {
        self.nodes.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    /// Nested process under `name`, if that entry is a process.
    pub fn process(&self, name: &str) -> Option<&Process<C, E>> {
        match self.get(name) {
            Some(Node::Process(p)) => Some(p),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of steps including those in nested processes.
    pub fn step_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|(_, node)| match node {
                Node::Step(_) => 1,
                Node::Process(p) => p.step_count(),
            })
            .sum()
    }
}
