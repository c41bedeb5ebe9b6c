use std::fmt;

// ------------- FeatureValue -------------
pub type FeatureValue = i8;

pub const PLUS: FeatureValue = 1;
pub const MINUS: FeatureValue = -1;
pub const UNSPECIFIED: FeatureValue = 0;

// ------------- FeatureVector -------------
/// One value in `{-1, 0, +1}` per named feature.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Debug)]
pub struct FeatureVector {
    values: Vec<FeatureValue>,
}

impl FeatureVector {
    /// The maximally underspecified vector.
    pub fn unspecified(n_features: usize) -> Self {
        Self {
            values: vec![UNSPECIFIED; n_features],
        }
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn get(&self, feature: usize) -> FeatureValue {
        self.values[feature]
    }
    pub fn set(&mut self, feature: usize, value: FeatureValue) {
        self.values[feature] = value;
    }
    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }
    pub fn is_unspecified(&self) -> bool {
        self.values.iter().all(|&v| v == UNSPECIFIED)
    }
    /// Indexes of the features carrying a value.
    pub fn specified(&self) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != UNSPECIFIED)
            .map(|(f, _)| f)
    }
    /// Does this vector subsume `other`, i.e. does `other` carry every value specified here?
    pub fn subsumes(&self, other: &FeatureVector) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .rev()
            .all(|(&mine, &theirs)| mine == UNSPECIFIED || mine == theirs)
    }
    /// Union of two vectors where the values of `other` win on conflicts.
    pub fn union(&self, other: &FeatureVector) -> FeatureVector {
        let mut union = self.clone();
        for (f, &v) in other.values.iter().enumerate() {
            if v != UNSPECIFIED {
                union.values[f] = v;
            }
        }
        union
    }
    /// Minimal generalization of this vector given `other`: values on which
    /// the two disagree become unspecified.
    pub fn generalize(&mut self, other: &FeatureVector) {
        for (mine, &theirs) in self.values.iter_mut().zip(other.values.iter()) {
            if *mine != theirs {
                *mine = UNSPECIFIED;
            }
        }
    }
    /// Bracketed notation such as `[+voice,-labial]`, or `[^...]` when complemented.
    pub fn to_notation<S: AsRef<str>>(&self, feature_names: &[S], complement: bool) -> String {
        let specs: Vec<String> = self
            .specified()
            .map(|f| {
                let sign = if self.values[f] == PLUS { "+" } else { "-" };
                format!("{}{}", sign, feature_names[f].as_ref())
            })
            .collect();
        format!("[{}{}]", if complement { "^" } else { "" }, specs.join(","))
    }
}

impl From<Vec<FeatureValue>> for FeatureVector {
    fn from(values: Vec<FeatureValue>) -> Self {
        Self { values }
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsumption_ignores_unspecified_values() {
        let general = FeatureVector::from(vec![0, 1]);
        assert!(general.subsumes(&FeatureVector::from(vec![-1, 1])));
        assert!(general.subsumes(&FeatureVector::from(vec![1, 1])));
        assert!(!general.subsumes(&FeatureVector::from(vec![1, -1])));
        assert!(FeatureVector::unspecified(2).subsumes(&FeatureVector::from(vec![1, -1])));
    }

    #[test]
    fn union_prefers_the_second_vector() {
        let a = FeatureVector::from(vec![-1, 1, 0]);
        let b = FeatureVector::from(vec![0, -1, 1]);
        assert_eq!(a.union(&b), FeatureVector::from(vec![-1, -1, 1]));
    }

    #[test]
    fn generalization_drops_disagreements() {
        let mut a = FeatureVector::from(vec![-1, 1, 1]);
        a.generalize(&FeatureVector::from(vec![-1, -1, 1]));
        assert_eq!(a, FeatureVector::from(vec![-1, 0, 1]));
    }

    #[test]
    fn notation() {
        let names = ["voice", "labial"];
        let v = FeatureVector::from(vec![-1, 1]);
        assert_eq!(v.to_notation(&names, false), "[-voice,+labial]");
        assert_eq!(v.to_notation(&names, true), "[^-voice,+labial]");
        assert_eq!(FeatureVector::unspecified(2).to_notation(&names, false), "[]");
    }
}
