// segment sets are small, so the "roaring bitmaps" are mostly single containers
use roaring::RoaringBitmap;

// custom made ordering for segment sets, so they can key ordered maps
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::fmt;

// ------------- Segment -------------
pub type SegmentId = u32;

// ------------- SegmentSet -------------
/// A set of segment ids. Equality and hashing are by membership, and the
/// ordering is lexicographic over the ascending members, which keeps every
/// ordered map keyed by extents reproducible from run to run.
#[derive(Clone, Default)]
pub struct SegmentSet {
    segments: RoaringBitmap,
}

impl SegmentSet {
    pub fn new() -> Self {
        Self {
            segments: RoaringBitmap::new(),
        }
    }
    /// All ids in `0..n`.
    pub fn full(n: SegmentId) -> Self {
        (0..n).collect()
    }
    pub fn insert(&mut self, segment: SegmentId) -> bool {
        self.segments.insert(segment)
    }
    pub fn remove(&mut self, segment: SegmentId) -> bool {
        self.segments.remove(segment)
    }
    pub fn contains(&self, segment: SegmentId) -> bool {
        self.segments.contains(segment)
    }
    pub fn len(&self) -> usize {
        self.segments.len() as usize
    }
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.segments.iter()
    }
    pub fn first(&self) -> Option<SegmentId> {
        self.segments.min()
    }
    pub fn is_subset(&self, other: &SegmentSet) -> bool {
        self.segments.is_subset(&other.segments)
    }
    pub fn is_strict_subset(&self, other: &SegmentSet) -> bool {
        self.len() < other.len() && self.is_subset(other)
    }
    pub fn intersects(&self, other: &SegmentSet) -> bool {
        !self.segments.is_disjoint(&other.segments)
    }
    pub fn intersection(&self, other: &SegmentSet) -> SegmentSet {
        Self {
            segments: &self.segments & &other.segments,
        }
    }
    pub fn union(&self, other: &SegmentSet) -> SegmentSet {
        Self {
            segments: &self.segments | &other.segments,
        }
    }
    pub fn difference(&self, other: &SegmentSet) -> SegmentSet {
        Self {
            segments: &self.segments - &other.segments,
        }
    }
}

impl FromIterator<SegmentId> for SegmentSet {
    fn from_iter<I: IntoIterator<Item = SegmentId>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}
impl Extend<SegmentId> for SegmentSet {
    fn extend<I: IntoIterator<Item = SegmentId>>(&mut self, iter: I) {
        self.segments.extend(iter)
    }
}
impl<const N: usize> From<[SegmentId; N]> for SegmentSet {
    fn from(segments: [SegmentId; N]) -> Self {
        segments.into_iter().collect()
    }
}

impl PartialEq for SegmentSet {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}
impl Eq for SegmentSet {}
impl Hash for SegmentSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.len().hash(state);
        for segment in self.segments.iter() {
            segment.hash(state);
        }
    }
}
impl Ord for SegmentSet {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments.iter().cmp(other.segments.iter())
    }
}
impl PartialOrd for SegmentSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Display for SegmentSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let members: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{{{}}}", members.join(", "))
    }
}
impl fmt::Debug for SegmentSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_lexicographic_over_members() {
        let a = SegmentSet::from([0, 2]);
        let b = SegmentSet::from([0, 3]);
        let c = SegmentSet::from([0, 2, 5]);
        assert!(a < b);
        assert!(a < c);
        assert!(c < b);
    }

    #[test]
    fn set_algebra() {
        let a = SegmentSet::from([1, 2, 3]);
        let b = SegmentSet::from([3, 4]);
        assert_eq!(a.difference(&b), SegmentSet::from([1, 2]));
        assert_eq!(a.intersection(&b), SegmentSet::from([3]));
        assert!(a.intersects(&b));
        assert!(!SegmentSet::from([1]).intersects(&b));
        assert!(SegmentSet::from([2, 3]).is_strict_subset(&a));
        assert!(!a.is_strict_subset(&a));
        assert_eq!(SegmentSet::full(3), SegmentSet::from([0, 1, 2]));
        assert_eq!(a.to_string(), "{1, 2, 3}");
    }
}
