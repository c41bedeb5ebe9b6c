// Container for a single natural class.
// Hashing, comparison and equality are based on segments, never on features.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::alphabet::Alphabet;
use crate::feature::FeatureVector;
use crate::notation;
use crate::segment::SegmentSet;

pub type ClassId = usize;

// ------------- NaturalClass -------------
#[derive(Clone, Debug)]
pub struct NaturalClass {
    pub(crate) id: Option<ClassId>,
    name: String,
    segs: SegmentSet,
    ftrs: Option<FeatureVector>,
    complement: bool,
    // differences to the immediately dominating classes in the lattice
    pub(crate) diffs: Vec<SegmentSet>,
}

impl NaturalClass {
    /// A class without a feature description is an ad-hoc segment set and is
    /// named in explicit set notation.
    pub fn new(alphabet: &Alphabet, segs: SegmentSet, ftrs: Option<FeatureVector>, complement: bool) -> Self {
        let name = match &ftrs {
            Some(ftrs) => ftrs.to_notation(alphabet.feature_names(), complement),
            None => notation::set_notation(alphabet, &segs),
        };
        Self {
            id: None,
            name,
            segs,
            ftrs,
            complement,
            diffs: Vec::new(),
        }
    }
    /// Position in the registry, `None` for classes that are not registered.
    pub fn id(&self) -> Option<ClassId> {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn segs(&self) -> &SegmentSet {
        &self.segs
    }
    pub fn ftrs(&self) -> Option<&FeatureVector> {
        self.ftrs.as_ref()
    }
    pub fn size(&self) -> usize {
        self.segs.len()
    }
    pub fn complement(&self) -> bool {
        self.complement
    }
    pub fn diffs(&self) -> &[SegmentSet] {
        &self.diffs
    }
}

/// Orders classes by size (larger first), then by the subset relation, then
/// lexicographically by member ids.
pub fn compare(x: &NaturalClass, y: &NaturalClass) -> Ordering {
    match y.size().cmp(&x.size()) {
        Ordering::Equal => (),
        unequal => return unequal,
    }
    if x.segs == y.segs {
        return Ordering::Equal;
    }
    if subset_of(x, y) {
        return Ordering::Less;
    }
    if subset_of(y, x) {
        return Ordering::Greater;
    }
    for (i, j) in x.segs.iter().zip(y.segs.iter()) {
        match i.cmp(&j) {
            Ordering::Equal => (),
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

/// Is `x` a (not necessarily proper) subset of `y`?
pub fn subset_of(x: &NaturalClass, y: &NaturalClass) -> bool {
    // empty set is a subset of all sets
    if x.size() == 0 {
        return true;
    }
    if x.size() > y.size() {
        return false;
    }
    if x.segs == y.segs {
        return true;
    }
    x.segs.iter().all(|s| y.segs.contains(s))
}

/// A class is closed (unblocked) with respect to a segment set when, for every
/// immediately dominating class, some member of the set lies in the difference
/// between the two. Classes without dominating classes are always closed.
pub fn closed(x: &NaturalClass, segs: &SegmentSet) -> bool {
    x.diffs.iter().all(|diff| diff.intersects(segs))
}

impl PartialEq for NaturalClass {
    fn eq(&self, other: &Self) -> bool {
        self.segs == other.segs
    }
}
impl Eq for NaturalClass {}
impl Hash for NaturalClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segs.hash(state);
    }
}
impl Ord for NaturalClass {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}
impl PartialOrd for NaturalClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Display for NaturalClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
