// ordered containers keep traversal of a relation reproducible
use std::collections::{BTreeMap, BTreeSet};

// ------------- Relation -------------
/// A binary relation over nodes of type `T`, stored as ordered successor sets.
/// Nodes may exist without any edges.
#[derive(Debug, Clone)]
pub struct Relation<T: Ord + Clone> {
    nodes: BTreeSet<T>,
    index: BTreeMap<T, BTreeSet<T>>,
}

impl<T: Ord + Clone> Default for Relation<T> {
    fn default() -> Self {
        Self {
            nodes: BTreeSet::new(),
            index: BTreeMap::new(),
        }
    }
}

impl<T: Ord + Clone> Relation<T> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add(&mut self, node: T) -> bool {
        self.nodes.insert(node)
    }
    pub fn add_edge(&mut self, from: T, to: T) {
        self.nodes.insert(from.clone());
        self.nodes.insert(to.clone());
        self.index.entry(from).or_default().insert(to);
    }
    pub fn contains(&self, node: &T) -> bool {
        self.nodes.contains(node)
    }
    pub fn contains_edge(&self, from: &T, to: &T) -> bool {
        self.index.get(from).is_some_and(|s| s.contains(to))
    }
    /// Successors of a node, in node order.
    pub fn get<'r>(&'r self, node: &T) -> impl Iterator<Item = &'r T> + use<'r, T> {
        self.index.get(node).into_iter().flatten()
    }
    pub fn out_degree(&self, node: &T) -> usize {
        self.index.get(node).map_or(0, |s| s.len())
    }
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter()
    }
    /// Finds the kept node equal to `node`.
    pub fn node(&self, node: &T) -> Option<&T> {
        self.nodes.get(node)
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn edges(&self) -> impl Iterator<Item = (&T, &T)> {
        self.index
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (from, to)))
    }
    pub fn edge_count(&self) -> usize {
        self.index.values().map(|s| s.len()).sum()
    }
    pub fn inverse(&self) -> Relation<T> {
        let mut inverse = Relation {
            nodes: self.nodes.clone(),
            index: BTreeMap::new(),
        };
        for (from, to) in self.edges() {
            inverse.add_edge(to.clone(), from.clone());
        }
        inverse
    }
    pub fn map<U: Ord + Clone, F: Fn(&T) -> U>(&self, f: F) -> Relation<U> {
        let mut mapped = Relation::new();
        for node in &self.nodes {
            mapped.add(f(node));
        }
        for (from, to) in self.edges() {
            mapped.add_edge(f(from), f(to));
        }
        mapped
    }
    /// Keeps only the edges that are not implied by a longer path.
    /// The relation is expected to be acyclic.
    pub fn transitive_reduction(&self) -> Relation<T> {
        let mut reachable: BTreeMap<T, BTreeSet<T>> = BTreeMap::new();
        for node in &self.nodes {
            self.descendants(node, &mut reachable);
        }
        let mut reduced = Relation {
            nodes: self.nodes.clone(),
            index: BTreeMap::new(),
        };
        for (from, tos) in &self.index {
            // anything reachable through a successor is reachable the long way
            let mut implied = BTreeSet::new();
            for to in tos {
                if let Some(below) = reachable.get(to) {
                    implied.extend(below.iter().cloned());
                }
            }
            for to in tos.difference(&implied) {
                reduced.add_edge(from.clone(), to.clone());
            }
        }
        reduced
    }
    // memoized set of nodes reachable from node through one or more edges
    fn descendants(&self, node: &T, reachable: &mut BTreeMap<T, BTreeSet<T>>) {
        if reachable.contains_key(node) {
            return;
        }
        let mut below = BTreeSet::new();
        for to in self.get(node) {
            self.descendants(to, reachable);
            below.insert(to.clone());
            if let Some(further) = reachable.get(to) {
                below.extend(further.iter().cloned());
            }
        }
        reachable.insert(node.clone(), below);
    }
}
