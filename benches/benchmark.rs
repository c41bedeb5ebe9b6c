use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use phonoclass::alphabet::Alphabet;
use phonoclass::feature::FeatureVector;
use phonoclass::lattice::{LatticeBuilder, LatticeOptions};
use phonoclass::natural_classes::NaturalClasses;
use phonoclass::notation;
use phonoclass::projection::Projection;
use phonoclass::segment::SegmentSet;

// deterministic inventory where every feature splits the segments differently
fn inventory(n_segments: usize, n_features: usize) -> Alphabet {
    let feature_names = (0..n_features).map(|f| format!("f{}", f)).collect();
    let rows = (0..n_segments)
        .map(|s| {
            let values = (0..n_features)
                .map(|f| match (s * 7 + f * 13 + s * f) % 5 {
                    0 | 1 => 1,
                    2 | 3 => -1,
                    _ => 0,
                })
                .collect::<Vec<i8>>();
            (format!("s{}", s), FeatureVector::from(values))
        })
        .collect();
    Alphabet::new(feature_names, rows).expect("synthetic inventory")
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let alphabet = inventory(24, 8);
    let sigma = SegmentSet::full(24);
    let observed: SegmentSet = (0..24).filter(|s| s % 3 != 0).collect();
    let builder = LatticeBuilder::new(alphabet.rows()).expect("matrix ok");
    c.bench_function("lattice 24x8", |b| b.iter(|| builder.build(black_box(&sigma), &sigma)));
    c.bench_function("lattice 24x8 observed 2/3", |b| {
        b.iter(|| builder.build(black_box(&sigma), &observed))
    });
    let unpruned = LatticeBuilder::new(alphabet.rows())
        .expect("matrix ok")
        .with_options(LatticeOptions { prune: false, topped: false });
    c.bench_function("lattice 24x8 unpruned", |b| b.iter(|| unpruned.build(black_box(&sigma), &observed)));

    let projection = Projection::new(Arc::new(inventory(40, 10)));
    c.bench_function("natural classes 40x10", |b| {
        b.iter(|| NaturalClasses::new(black_box(&projection)))
    });

    let projection = Projection::default_projection(Arc::new(inventory(40, 10)), true).expect("classes");
    let names: Vec<String> = projection
        .natural_classes()
        .map(|classes| classes.iter().map(|c| c.name().to_owned()).collect())
        .unwrap_or_default();
    c.bench_function("parse class notations", |b| {
        b.iter(|| notation::parse_all(&projection, black_box(names.as_slice())))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
