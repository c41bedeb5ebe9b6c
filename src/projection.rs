//! Projections of the alphabet.
//!
//! A projection selects a subset of the segments (its segment mask) and a
//! subset of the features; features that are not projected are zeroed in the
//! projection's reduced feature matrix. Natural classes are always computed
//! relative to a projection.
//!
//! Projections can be described by a tab-separated descriptor:
//!
//! ```text
//! name<TAB>segments<TAB>features[<TAB>min length]<TAB>max length
//! ```
//!
//! where `segments` is `any`, an explicit set such as `{p,t,k}` or a feature
//! specification such as `+consonantal,-sonorant`, and `features` is `all` or
//! a comma-separated list of feature names. Word boundaries are always on a
//! projection, and the first feature (the word-boundary feature) is always
//! projected.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{PhonoclassError, Result};
use crate::feature::{FeatureVector, UNSPECIFIED};
use crate::lattice::LatticeOptions;
use crate::natural_classes::NaturalClasses;
use crate::notation;
use crate::segment::{SegmentId, SegmentSet};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SEGMENT_LIST: Regex = Regex::new(r"^\{(.*)\}$").unwrap();
}

// ------------- Projection -------------
#[derive(Debug)]
pub struct Projection {
    name: String,
    is_default: bool,
    alphabet: Arc<Alphabet>,
    segment_mask: SegmentSet,
    any_segment_masked: bool,
    min_con_length: usize,
    max_con_length: usize,
    max_word_length: usize,
    complement_classes: bool,
    // segments with features represented on this projection (other features zeroed out)
    feature_rows: Vec<FeatureVector>,
    natural_classes: Option<NaturalClasses>,
}

impl Projection {
    /// The default projection: every segment and every feature, no natural classes yet.
    pub fn new(alphabet: Arc<Alphabet>) -> Self {
        let segment_mask = SegmentSet::full(alphabet.n_segments() as SegmentId);
        let feature_rows = alphabet.rows().to_vec();
        Self {
            name: String::from("default"),
            is_default: true,
            alphabet,
            segment_mask,
            any_segment_masked: false,
            min_con_length: 0,
            max_con_length: 0,
            max_word_length: 0,
            complement_classes: false,
            feature_rows,
            natural_classes: None,
        }
    }

    /// The default projection with its natural classes built.
    pub fn default_projection(alphabet: Arc<Alphabet>, complement_classes: bool) -> Result<Self> {
        let mut projection = Self::new(alphabet).with_complement_classes(complement_classes);
        projection.build_natural_classes(LatticeOptions::default())?;
        Ok(projection)
    }

    /// Parses a tab-separated descriptor (see the module docs). Natural classes
    /// are not built until [`Projection::build_natural_classes`] is called.
    pub fn from_descriptor(alphabet: Arc<Alphabet>, descriptor: &str) -> Result<Self> {
        let fields: Vec<&str> = descriptor.split('\t').map(str::trim).collect();
        if fields.len() < 4 {
            return Err(PhonoclassError::Parse {
                message: format!("Projection descriptor needs at least 4 fields: {}", descriptor),
                line: None,
                col: None,
            });
        }
        let (min_con_length, max_con_length) = if fields.len() < 5 {
            (1, parse_length(fields[3])?)
        } else {
            (parse_length(fields[3])?, parse_length(fields[4])?)
        };

        let segment_mask = parse_projected_segments(&alphabet, fields[1])?;
        let feature_mask = parse_projected_features(&alphabet, fields[2])?;
        let feature_rows = alphabet
            .rows()
            .iter()
            .enumerate()
            .map(|(segment, row)| {
                let mut reduced = row.clone();
                for (f, projected) in feature_mask.iter().enumerate() {
                    if !projected || !segment_mask.contains(segment as SegmentId) {
                        reduced.set(f, UNSPECIFIED);
                    }
                }
                reduced
            })
            .collect();
        let any_segment_masked = segment_mask.len() < alphabet.n_segments();
        debug!(
            name = fields[0],
            segments = segment_mask.len(),
            features = feature_mask.iter().filter(|p| **p).count(),
            "projection parsed"
        );

        Ok(Self {
            name: fields[0].to_owned(),
            is_default: false,
            alphabet,
            segment_mask,
            any_segment_masked,
            min_con_length,
            max_con_length,
            max_word_length: max_con_length,
            complement_classes: false,
            feature_rows,
            natural_classes: None,
        })
    }

    pub fn with_complement_classes(mut self, complement_classes: bool) -> Self {
        self.complement_classes = complement_classes;
        self
    }
    pub fn set_max_word_length(&mut self, l: usize) -> &mut Self {
        self.max_word_length = l;
        self
    }
    pub fn set_min_con_length(&mut self, l: usize) -> &mut Self {
        self.min_con_length = l;
        self
    }
    pub fn set_max_con_length(&mut self, l: usize) -> &mut Self {
        self.max_con_length = l;
        self
    }

    /// (Re)builds the natural classes on this projection.
    pub fn build_natural_classes(&mut self, options: LatticeOptions) -> Result<&NaturalClasses> {
        let natural_classes = NaturalClasses::build(self, options)?;
        let kept = self.natural_classes.insert(natural_classes);
        Ok(&*kept)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn is_default(&self) -> bool {
        self.is_default
    }
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
    pub fn segment_mask(&self) -> &SegmentSet {
        &self.segment_mask
    }
    pub fn any_segment_masked(&self) -> bool {
        self.any_segment_masked
    }
    pub fn min_con_length(&self) -> usize {
        self.min_con_length
    }
    pub fn max_con_length(&self) -> usize {
        self.max_con_length
    }
    pub fn max_word_length(&self) -> usize {
        self.max_word_length
    }
    pub fn complement_classes(&self) -> bool {
        self.complement_classes
    }
    /// Reduced feature matrix, indexed by segment id.
    pub fn feature_rows(&self) -> &[FeatureVector] {
        &self.feature_rows
    }
    pub fn natural_classes(&self) -> Option<&NaturalClasses> {
        self.natural_classes.as_ref()
    }
    /// Word-begin and word-end segments.
    pub fn boundaries(&self) -> SegmentSet {
        self.alphabet.syms().boundaries().collect()
    }

    /// Segments on this projection whose features are subsumed by `ftrs`. A
    /// complemented description denotes the remaining segments, minus the
    /// word boundaries.
    pub fn denotation(&self, ftrs: &FeatureVector, complement: bool) -> SegmentSet {
        let segs: SegmentSet = self
            .segment_mask
            .iter()
            .filter(|&s| ftrs.subsumes(&self.feature_rows[s as usize]))
            .collect();
        if complement {
            self.segment_mask.difference(&segs).difference(&self.boundaries())
        } else {
            segs
        }
    }

    /// Zeroes specified features from last to first, keeping each one zeroed
    /// only if the denotation stays `segs`.
    pub fn minimal_features(&self, segs: &SegmentSet, ftrs: &FeatureVector) -> FeatureVector {
        let mut reduced = ftrs.clone();
        for f in (0..ftrs.len()).rev() {
            if reduced.get(f) == UNSPECIFIED {
                continue;
            }
            reduced.set(f, UNSPECIFIED);
            if self.denotation(&reduced, false) != *segs {
                reduced.set(f, ftrs.get(f));
            }
        }
        reduced
    }

    /// The subsequence of segments that are on this projection.
    pub fn project(&self, y: &[SegmentId]) -> Vec<SegmentId> {
        y.iter().copied().filter(|&s| self.segment_mask.contains(s)).collect()
    }
}

fn parse_length(field: &str) -> Result<usize> {
    field.parse::<usize>().map_err(|e| PhonoclassError::Parse {
        message: format!("Invalid constraint length '{}': {}", field, e),
        line: None,
        col: None,
    })
}

fn parse_projected_segments(alphabet: &Alphabet, projected_segments: &str) -> Result<SegmentSet> {
    // boundary symbols are always projected
    let mut mask: SegmentSet = alphabet.syms().boundaries().collect();

    if projected_segments == "any" {
        return Ok(SegmentSet::full(alphabet.n_segments() as SegmentId));
    }

    let stripped = WHITESPACE.replace_all(projected_segments, "");
    if let Some(captures) = SEGMENT_LIST.captures(&stripped) {
        for (position, symbol) in captures[1].split(',').filter(|s| !s.is_empty()).enumerate() {
            mask.insert(alphabet.syms().require(symbol, position)?);
        }
        return Ok(mask);
    }

    let criterial = notation::parse_features(alphabet, &format!("[{}]", stripped))?;
    for (segment, ftrs) in alphabet.rows().iter().enumerate() {
        if criterial.subsumes(ftrs) {
            mask.insert(segment as SegmentId);
        }
    }
    Ok(mask)
}

fn parse_projected_features(alphabet: &Alphabet, projected_features: &str) -> Result<Vec<bool>> {
    let mut feature_mask = vec![false; alphabet.n_features()];
    if projected_features == "all" {
        feature_mask.fill(true);
        return Ok(feature_mask);
    }
    // word-boundary feature
    if let Some(first) = feature_mask.first_mut() {
        *first = true;
    }
    let stripped = WHITESPACE.replace_all(projected_features, "");
    for (position, name) in stripped.split(',').filter(|s| !s.is_empty()).enumerate() {
        let f = alphabet.feature(name).ok_or_else(|| PhonoclassError::UnknownFeature {
            token: name.to_owned(),
            position,
        })?;
        feature_mask[f] = true;
    }
    Ok(feature_mask)
}
