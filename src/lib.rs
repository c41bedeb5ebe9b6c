//! Phonoclass – the natural classes of a segment inventory.
//!
//! Given a table of binary distinctive features over a segment inventory, this
//! crate enumerates every *natural class*: every set of segments that can be
//! picked out by a (partial) feature specification. The classes are organised
//! as a lattice of immediate sub/super-class relations and as a tree in which
//! every class has a unique parent.
//!
//! * A segment is identified by a [`segment::SegmentId`], its row in the feature matrix.
//! * A [`segment::SegmentSet`] is a set of segments (an *extent*).
//! * A [`feature::FeatureVector`] holds one of `-1`, `0`, `+1` per feature (an *intent*).
//! * A [`concept::Concept`] pairs an extent with its intent.
//! * A [`natural_class::NaturalClass`] is a concept described by a minimal feature
//!   specification, identified by its segments only.
//!
//! ## Modules
//! * [`alphabet`] – Symbols, the feature matrix and word boundaries.
//! * [`reader`] – Tab-separated feature matrix files.
//! * [`lattice`] – Galois lattice construction with attestation-based pruning.
//! * [`projection`] – Segment and feature subsets that classes are computed on.
//! * [`natural_classes`] – The lattice-to-tree builder and the class registry.
//! * [`notation`] – Feature, set and disjunctive notations and their grammar (`notation.pest`).
//! * [`settings`] – Configuration file and environment settings.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use phonoclass::{projection::Projection, reader::parse_feature_matrix};
//! let alphabet = parse_feature_matrix("\tvoice\tlabial\np\t-\t+\nt\t-\t-\nk\t-\t-\n").unwrap();
//! let projection = Projection::default_projection(Arc::new(alphabet), false).unwrap();
//! let classes = projection.natural_classes().unwrap();
//! assert_eq!(classes.len(), 3);
//! assert_eq!(classes.children(0).count(), 2);
//! ```
//!
//! ## Logging
//! Library code logs through `tracing`; installing a subscriber is left to the
//! binary (see `main.rs`).

pub mod alphabet;
pub mod concept;
pub mod error;
pub mod feature;
pub mod lattice;
pub mod natural_class;
pub mod natural_classes;
pub mod notation;
pub mod projection;
pub mod reader;
pub mod relation;
pub mod segment;
pub mod settings;

pub use error::{PhonoclassError, Result};
