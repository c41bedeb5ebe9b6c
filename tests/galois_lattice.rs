use std::collections::BTreeSet;

use phonoclass::concept::Concept;
use phonoclass::feature::FeatureVector;
use phonoclass::lattice::{LatticeBuilder, LatticeOptions};
use phonoclass::relation::Relation;
use phonoclass::segment::SegmentSet;

// wb, cons, voice, labial for < > p b t d a
const INVENTORY: &[[i8; 4]] = &[
    [1, 0, 0, 0],
    [1, 0, 0, 0],
    [-1, 1, -1, 1],
    [-1, 1, 1, 1],
    [-1, 1, -1, -1],
    [-1, 1, 1, -1],
    [-1, -1, 1, 0],
];

fn setup() -> Vec<FeatureVector> {
    INVENTORY.iter().map(|row| FeatureVector::from(row.to_vec())).collect()
}

fn extents(lattice: &Relation<Concept>) -> BTreeSet<SegmentSet> {
    lattice.nodes().map(|c| c.extent().clone()).collect()
}

#[test]
fn stops_split_by_labiality() {
    // p, t, k over voice and labial
    let rows: Vec<FeatureVector> = vec![vec![-1, 1].into(), vec![-1, -1].into(), vec![-1, -1].into()];
    let builder = LatticeBuilder::new(&rows).expect("matrix ok");
    let sigma = SegmentSet::from([0, 1, 2]);
    let lattice = builder.build(&sigma, &sigma).expect("lattice").transitive_reduction();

    let found: Vec<(SegmentSet, FeatureVector)> =
        lattice.nodes().map(|c| (c.extent().clone(), c.intent().clone())).collect();
    assert_eq!(found.len(), 3);
    assert!(found.contains(&(SegmentSet::from([0, 1, 2]), vec![-1, 0].into())));
    assert!(found.contains(&(SegmentSet::from([0]), vec![-1, 1].into())));
    assert!(found.contains(&(SegmentSet::from([1, 2]), vec![-1, -1].into())));

    let top = lattice.node(&Concept::new(sigma.clone(), FeatureVector::unspecified(2))).expect("top");
    let below: BTreeSet<SegmentSet> = lattice.get(top).map(|c| c.extent().clone()).collect();
    assert_eq!(below, BTreeSet::from([SegmentSet::from([0]), SegmentSet::from([1, 2])]));
    assert_eq!(lattice.edge_count(), 2);
}

#[test]
fn every_concept_is_a_fixed_point() {
    let rows = setup();
    let sigma = SegmentSet::full(rows.len() as u32);
    for prune in [true, false] {
        let builder = LatticeBuilder::new(&rows)
            .expect("matrix ok")
            .with_options(LatticeOptions { prune, topped: false });
        let lattice = builder.build(&sigma, &sigma).expect("lattice");
        assert!(lattice.len() > 3);
        for concept in lattice.nodes() {
            let intent = builder.intent(concept.extent()).expect("segments in range");
            assert_eq!(*concept.intent(), intent, "intent of {}", concept);
            let extent = builder.extent(concept.intent(), &sigma).expect("segments in range");
            assert_eq!(extent, *concept.extent(), "extent of {}", concept);
        }
    }
}

#[test]
fn reduced_edges_are_covering() {
    let rows = setup();
    let sigma = SegmentSet::full(rows.len() as u32);
    let lattice = LatticeBuilder::new(&rows)
        .expect("matrix ok")
        .build(&sigma, &sigma)
        .expect("lattice")
        .transitive_reduction();
    let all = extents(&lattice);
    for (x, y) in lattice.edges() {
        assert!(y.extent().is_strict_subset(x.extent()), "{} -> {}", x, y);
        let between = all
            .iter()
            .filter(|z| y.extent().is_strict_subset(z) && z.is_strict_subset(x.extent()))
            .count();
        assert_eq!(between, 0, "{} -> {} is not a covering edge", x, y);
    }
    // every concept but the top hangs below something
    let inverse = lattice.inverse();
    let roots: Vec<&Concept> = lattice.nodes().filter(|c| inverse.out_degree(c) == 0).collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(*roots[0].extent(), sigma);
}

#[test]
fn unobserved_differences_are_pruned() {
    // p, t, k where only t is observed: {t,k} differs from the top by p alone
    let rows: Vec<FeatureVector> = vec![vec![-1, 1].into(), vec![-1, -1].into(), vec![-1, -1].into()];
    let builder = LatticeBuilder::new(&rows).expect("matrix ok");
    let sigma = SegmentSet::from([0, 1, 2]);
    let observed = SegmentSet::from([1]);
    let lattice = builder.build(&sigma, &observed).expect("lattice");
    let found = extents(&lattice);
    assert!(!found.contains(&SegmentSet::from([1, 2])));
    assert!(found.contains(&SegmentSet::from([0])));
    // the observed segments are put on top
    assert!(found.contains(&observed));
}

#[test]
fn pruning_only_drops_indistinguishable_concepts() {
    let rows = setup();
    let sigma = SegmentSet::full(rows.len() as u32);
    // <, p, d and a observed
    let observed = SegmentSet::from([0, 2, 5, 6]);

    let pruned = LatticeBuilder::new(&rows)
        .expect("matrix ok")
        .build(&sigma, &observed)
        .expect("pruned lattice");
    let unpruned = LatticeBuilder::new(&rows)
        .expect("matrix ok")
        .with_options(LatticeOptions { prune: false, topped: false })
        .build(&sigma, &observed)
        .expect("unpruned lattice");

    let mut kept = extents(&pruned);
    kept.remove(&observed);
    let mut full = extents(&unpruned);
    full.remove(&observed);
    assert!(kept.is_subset(&full));

    for missing in full.difference(&kept).filter(|e| e.intersects(&observed)) {
        let witness = full
            .iter()
            .chain(std::iter::once(&sigma))
            .find(|a| missing.is_strict_subset(a) && !a.difference(missing).intersects(&observed));
        assert!(witness.is_some(), "{} was pruned without a reason", missing);
    }
}

#[test]
fn topped_matches_untopped_when_everything_is_observed() {
    let rows = setup();
    let sigma = SegmentSet::full(rows.len() as u32);
    let build = |topped| {
        LatticeBuilder::new(&rows)
            .expect("matrix ok")
            .with_options(LatticeOptions { prune: true, topped })
            .build(&sigma, &sigma)
            .expect("lattice")
            .transitive_reduction()
    };
    let (topped, untopped) = (build(true), build(false));
    assert_eq!(extents(&topped), extents(&untopped));
    let edges = |lattice: &Relation<Concept>| -> BTreeSet<(SegmentSet, SegmentSet)> {
        lattice
            .edges()
            .map(|(x, y)| (x.extent().clone(), y.extent().clone()))
            .collect()
    };
    assert_eq!(edges(&topped), edges(&untopped));
}

#[test]
fn repeated_builds_are_identical() {
    let rows = setup();
    let sigma = SegmentSet::full(rows.len() as u32);
    let builder = LatticeBuilder::new(&rows).expect("matrix ok");
    let first = builder.build(&sigma, &sigma).expect("lattice");
    let second = builder.build(&sigma, &sigma).expect("lattice");
    let describe = |lattice: &Relation<Concept>| lattice.nodes().map(|c| c.to_string()).collect::<Vec<_>>();
    assert_eq!(describe(&first), describe(&second));
    assert_eq!(first.edge_count(), second.edge_count());
}
