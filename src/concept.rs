use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::alphabet::SymbolTable;
use crate::feature::FeatureVector;
use crate::segment::SegmentSet;

// ------------- Concept -------------
/// A closed (extent, intent) pair of the segment/feature Galois connection.
/// Two concepts are the same concept whenever their extents are equal.
#[derive(Clone, Debug)]
pub struct Concept {
    extent: SegmentSet,
    intent: FeatureVector,
}

impl Concept {
    pub fn new(extent: SegmentSet, intent: FeatureVector) -> Self {
        Self { extent, intent }
    }
    pub fn extent(&self) -> &SegmentSet {
        &self.extent
    }
    pub fn intent(&self) -> &FeatureVector {
        &self.intent
    }
    pub fn to_notation<S: AsRef<str>>(&self, feature_names: &[S]) -> String {
        self.intent.to_notation(feature_names, false)
    }
    /// Feature notation and explicit segment set, on two lines.
    pub fn describe<S: AsRef<str>>(&self, syms: &SymbolTable, feature_names: &[S]) -> String {
        let segments: Vec<String> = self
            .extent
            .iter()
            .map(|s| syms.symbol(s).map(str::to_owned).unwrap_or_else(|| s.to_string()))
            .collect();
        format!("{}\n{{{}}}", self.to_notation(feature_names), segments.join(","))
    }
}

impl PartialEq for Concept {
    fn eq(&self, other: &Self) -> bool {
        self.extent == other.extent
    }
}
impl Eq for Concept {}
impl Hash for Concept {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.extent.hash(state);
    }
}
impl Ord for Concept {
    fn cmp(&self, other: &Self) -> Ordering {
        self.extent.cmp(&other.extent)
    }
}
impl PartialOrd for Concept {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}:{}>", self.extent, self.intent)
    }
}
