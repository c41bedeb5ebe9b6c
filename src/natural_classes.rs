//! The natural classes of a projection, as a lattice, a tree and a sorted list.
//!
//! The concept lattice of the projection's feature matrix is reduced to its
//! covering edges and mapped to natural classes with minimal feature
//! descriptions. A spanning tree is then derived by giving every class a
//! unique parent, its least super-class under [`compare`]. Complement classes
//! can be added on top. Classes are finally sorted by [`compare`] and their
//! position in that order becomes their id, which downstream consumers rely on
//! for size-descending, subset-respecting enumeration.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::info;

use crate::concept::Concept;
use crate::error::{PhonoclassError, Result};
use crate::lattice::{LatticeBuilder, LatticeOptions};
use crate::natural_class::{compare, ClassId, NaturalClass};
use crate::notation;
use crate::projection::Projection;
use crate::relation::Relation;
use crate::segment::SegmentSet;

// ------------- NaturalClasses -------------
#[derive(Debug)]
pub struct NaturalClasses {
    lattice: Relation<ClassId>,
    tree: Relation<ClassId>,
    classes: Vec<NaturalClass>,
    sigma: NaturalClass,
}

impl NaturalClasses {
    pub fn new(projection: &Projection) -> Result<Self> {
        Self::build(projection, LatticeOptions::default())
    }

    pub fn build(projection: &Projection, options: LatticeOptions) -> Result<Self> {
        let alphabet = projection.alphabet();
        let mask = projection.segment_mask();

        // concept lattice with covering edges only; at this level every
        // projected segment counts as observed
        let concept_lattice = LatticeBuilder::new(projection.feature_rows())?
            .with_options(options)
            .build(mask, mask)?
            .transitive_reduction();

        // concepts become natural classes, addressed by their position in `kept`
        let mut kept: Vec<NaturalClass> = Vec::with_capacity(concept_lattice.len());
        let mut position: BTreeMap<&Concept, usize> = BTreeMap::new();
        for concept in concept_lattice.nodes() {
            let ftrs = projection.minimal_features(concept.extent(), concept.intent());
            position.insert(concept, kept.len());
            kept.push(NaturalClass::new(alphabet, concept.extent().clone(), Some(ftrs), false));
        }
        let mut lattice: Relation<usize> = Relation::new();
        for (x, y) in concept_lattice.edges() {
            let (cx, cy) = (position[x], position[y]);
            lattice.add_edge(cx, cy);
            // difference between a class and its immediate superset, used for pruning
            let diff = kept[cx].segs().difference(kept[cy].segs());
            kept[cy].diffs.push(diff);
        }
        for &node in position.values() {
            lattice.add(node);
        }

        // every class with super-classes hangs below the least of them
        let super_classes = lattice.inverse();
        let mut tree: Relation<usize> = Relation::new();
        for &y in lattice.nodes() {
            tree.add(y);
            let parent = super_classes.get(&y).min_by(|a, b| compare(&kept[**a], &kept[**b]));
            if let Some(&x) = parent {
                tree.add_edge(x, y);
            }
        }

        // complement classes lie outside of the lattice and the tree
        let mut nodes: Vec<usize> = tree.nodes().copied().collect();
        if projection.complement_classes() {
            let boundaries = projection.boundaries();
            let mut by_order = nodes.clone();
            by_order.sort_by(|a, b| compare(&kept[*a], &kept[*b]));
            let mut present: BTreeSet<SegmentSet> = nodes.iter().map(|&x| kept[x].segs().clone()).collect();
            for x in by_order {
                let segs = mask.difference(kept[x].segs()).difference(&boundaries);
                if segs.is_empty() || present.contains(&segs) {
                    continue;
                }
                present.insert(segs.clone());
                let ftrs = kept[x].ftrs().cloned();
                nodes.push(kept.len());
                kept.push(NaturalClass::new(alphabet, segs, ftrs, true));
            }
        }

        // unique ids follow the total order
        nodes.sort_by(|a, b| compare(&kept[*a], &kept[*b]));
        let mut id_of: BTreeMap<usize, ClassId> = BTreeMap::new();
        let mut slots: Vec<Option<NaturalClass>> = kept.into_iter().map(Some).collect();
        let mut classes = Vec::with_capacity(nodes.len());
        for (id, &node) in nodes.iter().enumerate() {
            let mut class = slots[node].take().ok_or_else(|| {
                PhonoclassError::Invariant(format!("natural class {} listed twice", node))
            })?;
            class.id = Some(id);
            id_of.insert(node, id);
            classes.push(class);
        }
        let lattice = lattice.map(|node| id_of[node]);
        let tree = tree.map(|node| id_of[node]);

        // natural class containing all segments
        let mut sigma = NaturalClass::new(alphabet, mask.clone(), None, false);
        sigma.id = classes.iter().find(|c| c.segs() == mask).and_then(|c| c.id());

        info!(
            projection = projection.name(),
            classes = classes.len(),
            lattice_edges = lattice.edge_count(),
            complements = classes.iter().filter(|c| c.complement()).count(),
            "natural classes built"
        );
        Ok(Self {
            lattice,
            tree,
            classes,
            sigma,
        })
    }

    pub fn lattice(&self) -> &Relation<ClassId> {
        &self.lattice
    }
    pub fn tree(&self) -> &Relation<ClassId> {
        &self.tree
    }
    pub fn classes(&self) -> &[NaturalClass] {
        &self.classes
    }
    pub fn iter(&self) -> impl Iterator<Item = &NaturalClass> {
        self.classes.iter()
    }
    pub fn len(&self) -> usize {
        self.classes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
    pub fn sigma(&self) -> &NaturalClass {
        &self.sigma
    }
    pub fn get(&self, id: ClassId) -> Option<&NaturalClass> {
        self.classes.get(id)
    }
    /// Unique parent of a class in the tree.
    pub fn parent(&self, id: ClassId) -> Option<ClassId> {
        self.tree.edges().find(|(_, child)| **child == id).map(|(parent, _)| *parent)
    }
    pub fn children(&self, id: ClassId) -> impl Iterator<Item = &NaturalClass> {
        self.tree.get(&id).map(move |child| &self.classes[*child])
    }

    // convenience functions mapping segment sets / strings to natural classes

    /// Natural class with exactly this segment set.
    pub fn lookup(&self, segs: &SegmentSet) -> Option<&NaturalClass> {
        self.classes.iter().find(|c| c.segs() == segs)
    }
    pub fn lookup_all(&self, segs: &[SegmentSet]) -> Vec<Option<&NaturalClass>> {
        segs.iter().map(|s| self.lookup(s)).collect()
    }
    /// Natural class denoted by a string in any of the class notations.
    pub fn lookup_notation(&self, projection: &Projection, s: &str) -> Result<Option<&NaturalClass>> {
        let x = notation::parse(projection, s)?;
        Ok(self.lookup(x.segs()))
    }
    pub fn lookup_notations<S: AsRef<str>>(
        &self,
        projection: &Projection,
        strings: &[S],
    ) -> Result<Vec<Option<&NaturalClass>>> {
        strings
            .iter()
            .map(|s| self.lookup_notation(projection, s.as_ref()))
            .collect()
    }
}

impl fmt::Display for NaturalClasses {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for class in &self.classes {
            writeln!(f, "{}", class)?;
        }
        Ok(())
    }
}
