//! Galois lattice construction from formal concept analysis.
//!
//! Builds the concept lattice of a feature matrix (an attribute list per
//! segment) restricted to a set of segments, pruning against the subset of
//! segments that are actually observed. The algorithm is a slightly modified
//! version of the one in Choi, Vicky, and Yang Huang. 2006. *Faster Algorithms
//! for Constructing a Galois Lattice, Enumerating All Maximal Bipartite
//! Cliques and Closed Frequent Sets.*
//!
//! Every call to [`LatticeBuilder::build`] starts from fresh state, and all
//! intermediate maps are ordered, so identical inputs give identical output.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::{debug, trace};

use crate::concept::Concept;
use crate::error::{PhonoclassError, Result};
use crate::feature::{FeatureValue, FeatureVector, UNSPECIFIED};
use crate::relation::Relation;
use crate::segment::{SegmentId, SegmentSet};

/// Switches for the lattice builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeOptions {
    /// Block concepts that observed segments cannot tell apart from a superset,
    /// and stop sprouting below extents with no observed member.
    pub prune: bool,
    /// Register the maximal extent before the main loop starts.
    pub topped: bool,
}
impl Default for LatticeOptions {
    fn default() -> Self {
        Self {
            prune: true,
            topped: false,
        }
    }
}

// successor relation between extents while the lattice is being built
type Successors = BTreeMap<SegmentSet, BTreeSet<SegmentSet>>;

// ------------- LatticeBuilder -------------
pub struct LatticeBuilder<'m> {
    rows: &'m [FeatureVector],
    n_features: usize,
    options: LatticeOptions,
}

impl<'m> LatticeBuilder<'m> {
    /// Rows are indexed by segment id and must all have the same length.
    pub fn new(rows: &'m [FeatureVector]) -> Result<Self> {
        let n_features = rows.first().ok_or(PhonoclassError::EmptyFeatureMatrix)?.len();
        if let Some((segment, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(PhonoclassError::FeatureArity {
                segment: segment as SegmentId,
                expected: n_features,
                found: row.len(),
            });
        }
        Ok(Self {
            rows,
            n_features,
            options: LatticeOptions::default(),
        })
    }
    pub fn with_options(mut self, options: LatticeOptions) -> Self {
        self.options = options;
        self
    }
    pub fn options(&self) -> LatticeOptions {
        self.options
    }

    /// Builds the concepts below `sigma`, pruned against `sigma_observed`.
    /// Edges are covering edges plus possibly redundant ones; callers wanting
    /// the Hasse diagram apply a transitive reduction.
    pub fn build(&self, sigma: &SegmentSet, sigma_observed: &SegmentSet) -> Result<Relation<Concept>> {
        self.check_range(sigma)?;
        self.check_range(sigma_observed)?;

        // set of extents, successor relation, blocked extents
        let mut registered: BTreeMap<SegmentSet, FeatureVector> = BTreeMap::new();
        let mut succ: Successors = BTreeMap::new();
        let mut blocked: BTreeSet<SegmentSet> = BTreeSet::new();

        let top = sigma.clone();
        let mut queue: VecDeque<SegmentSet> = VecDeque::new();
        queue.push_back(top.clone());
        if self.options.topped {
            registered.insert(top.clone(), self.closure_intent(&top));
        }

        while let Some(extent) = queue.pop_front() {
            if self.options.prune {
                // all supersets of the extent have been enumerated by now
                if self.blocked(&extent, &top, &succ, sigma_observed) {
                    blocked.insert(extent.clone());
                }
                // subsets of an unobserved extent are unobserved too
                if !extent.intersects(sigma_observed) {
                    continue;
                }
            }

            let parent = Concept::new(extent.clone(), self.closure_intent(&extent));
            for child in self.sprout(&parent) {
                let induced = parent.intent().union(child.intent());
                match registered.get(child.extent()) {
                    None => {
                        if induced == self.closure_intent(child.extent()) {
                            succ.entry(extent.clone()).or_default().insert(child.extent().clone());
                            queue.push_back(child.extent().clone());
                            registered.insert(child.extent().clone(), induced);
                        }
                    }
                    Some(kept) if *kept == induced => {
                        succ.entry(extent.clone()).or_default().insert(child.extent().clone());
                    }
                    Some(_) => trace!(child = %child, "incomplete intent, discarded"),
                }
            }
        }

        debug!(
            registered = registered.len(),
            blocked = blocked.len(),
            "galois lattice enumerated"
        );
        for extent in &blocked {
            registered.remove(extent);
        }

        let mut concepts: BTreeMap<&SegmentSet, Concept> = BTreeMap::new();
        for (extent, intent) in &registered {
            let concept = Concept::new(extent.clone(), intent.clone());
            self.check_closure(&concept, sigma)?;
            concepts.insert(extent, concept);
        }
        let mut lattice = Relation::new();
        for concept in concepts.values() {
            lattice.add(concept.clone());
        }
        for (x, ys) in &succ {
            let Some(cx) = concepts.get(x) else {
                continue;
            };
            for cy in ys.iter().filter_map(|y| concepts.get(y)) {
                lattice.add_edge(cx.clone(), cy.clone());
            }
        }

        // the observed segments sit at the top, as if they shared some property
        let all = Concept::new(sigma_observed.clone(), self.closure_intent(sigma_observed));
        if !lattice.contains(&all) {
            let existing: Vec<Concept> = lattice.nodes().cloned().collect();
            lattice.add(all.clone());
            for concept in existing {
                lattice.add_edge(all.clone(), concept);
            }
        }

        debug!(concepts = lattice.len(), edges = lattice.edge_count(), "galois lattice built");
        Ok(lattice)
    }

    /// Attributes shared by every member of the extent; the closure operator.
    pub fn intent(&self, extent: &SegmentSet) -> Result<FeatureVector> {
        self.check_range(extent)?;
        Ok(self.closure_intent(extent))
    }

    /// Segments of `sigma` carrying every attribute of the intent.
    pub fn extent(&self, intent: &FeatureVector, sigma: &SegmentSet) -> Result<SegmentSet> {
        self.check_range(sigma)?;
        Ok(self.closure_extent(intent, sigma))
    }

    fn check_range(&self, segs: &SegmentSet) -> Result<()> {
        match segs.iter().find(|&s| s as usize >= self.rows.len()) {
            Some(segment) => Err(PhonoclassError::SegmentOutOfRange(segment)),
            None => Ok(()),
        }
    }

    // segments are known to be in range
    fn closure_intent(&self, extent: &SegmentSet) -> FeatureVector {
        let mut intent = FeatureVector::unspecified(self.n_features);
        let Some(first) = extent.first() else {
            return intent;
        };
        for f in 0..self.n_features {
            let v = self.value(first, f);
            if v != UNSPECIFIED && extent.iter().all(|s| self.value(s, f) == v) {
                intent.set(f, v);
            }
        }
        intent
    }

    fn closure_extent(&self, intent: &FeatureVector, sigma: &SegmentSet) -> SegmentSet {
        sigma
            .iter()
            .filter(|&s| intent.subsumes(&self.rows[s as usize]))
            .collect()
    }

    fn value(&self, segment: SegmentId, feature: usize) -> FeatureValue {
        self.rows[segment as usize].get(feature)
    }

    // Children of a concept in the sense of Choi & Huang: one candidate per
    // distinct sub-extent cut out by an attribute not shared by the whole
    // extent, carrying the merged attributes that cut it out.
    fn sprout(&self, parent: &Concept) -> Vec<Concept> {
        let mut proto_children: BTreeMap<(usize, FeatureValue), SegmentSet> = BTreeMap::new();
        for a in parent.extent().iter() {
            for f in 0..self.n_features {
                let v = self.value(a, f);
                if v != UNSPECIFIED && v != parent.intent().get(f) {
                    proto_children.entry((f, v)).or_default().insert(a);
                }
            }
        }

        // collapse proto-children with the same extent
        let mut children: BTreeMap<SegmentSet, FeatureVector> = BTreeMap::new();
        for ((f, v), extent) in proto_children {
            children
                .entry(extent)
                .or_insert_with(|| FeatureVector::unspecified(self.n_features))
                .set(f, v);
        }
        children
            .into_iter()
            .map(|(extent, intent)| Concept::new(extent, intent))
            .collect()
    }

    // An extent is blocked when some superset already in the lattice differs
    // from it only in unobserved segments. Supersets are found by walking
    // down from the top, abandoning branches that stop being supersets.
    fn blocked(&self, child: &SegmentSet, top: &SegmentSet, succ: &Successors, sigma_observed: &SegmentSet) -> bool {
        let mut queue: VecDeque<&SegmentSet> = VecDeque::from([top]);
        let mut visited: BTreeSet<&SegmentSet> = BTreeSet::new();
        while let Some(ancestor) = queue.pop_front() {
            if !visited.insert(ancestor) {
                continue;
            }
            if ancestor == child || !child.is_subset(ancestor) {
                continue;
            }
            if !ancestor.difference(child).intersects(sigma_observed) {
                return true;
            }
            if let Some(below) = succ.get(ancestor) {
                queue.extend(below.iter());
            }
        }
        false
    }

    fn check_closure(&self, concept: &Concept, sigma: &SegmentSet) -> Result<()> {
        if *concept.intent() != self.closure_intent(concept.extent())
            || self.closure_extent(concept.intent(), sigma) != *concept.extent()
        {
            return Err(PhonoclassError::Invariant(format!(
                "concept {} is not a fixed point of the Galois connection",
                concept
            )));
        }
        Ok(())
    }
}
