// used to keep the one-to-one mapping between symbols and their segment ids
use bimap::BiMap;

// name lookups use a fast hashing algo
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;
use std::collections::HashMap;
use std::fmt;

use crate::error::{PhonoclassError, Result};
use crate::feature::FeatureVector;
use crate::segment::SegmentId;

pub type NameHasher = BuildHasherDefault<SeaHasher>;

// ------------- SymbolTable -------------
#[derive(Debug, Default)]
pub struct SymbolTable {
    kept: BiMap<String, SegmentId>,
    word_begin: Option<SegmentId>,
    word_end: Option<SegmentId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }
    /// Adds a symbol, returning its id and whether it was previously kept.
    pub fn keep(&mut self, symbol: &str) -> (SegmentId, bool) {
        if let Some(id) = self.kept.get_by_left(symbol) {
            return (*id, true);
        }
        let id = self.kept.len() as SegmentId;
        self.kept.insert(symbol.to_owned(), id);
        (id, false)
    }
    pub fn id(&self, symbol: &str) -> Option<SegmentId> {
        self.kept.get_by_left(symbol).copied()
    }
    pub fn symbol(&self, id: SegmentId) -> Option<&str> {
        self.kept.get_by_right(&id).map(|s| s.as_str())
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
    pub fn set_word_begin(&mut self, symbol: &str) -> Result<()> {
        self.word_begin = Some(self.require(symbol, 0)?);
        Ok(())
    }
    pub fn set_word_end(&mut self, symbol: &str) -> Result<()> {
        self.word_end = Some(self.require(symbol, 0)?);
        Ok(())
    }
    pub fn word_begin(&self) -> Option<SegmentId> {
        self.word_begin
    }
    pub fn word_end(&self) -> Option<SegmentId> {
        self.word_end
    }
    pub fn boundaries(&self) -> impl Iterator<Item = SegmentId> {
        self.word_begin.into_iter().chain(self.word_end)
    }
    /// Looks up a symbol, reporting it together with its position on failure.
    pub fn require(&self, symbol: &str, position: usize) -> Result<SegmentId> {
        self.id(symbol).ok_or_else(|| PhonoclassError::UnknownSymbol {
            token: symbol.to_owned(),
            position,
        })
    }
}

// ------------- Alphabet -------------
/// Symbols together with their feature matrix.
#[derive(Debug)]
pub struct Alphabet {
    feature_names: Vec<String>,
    feature_index: HashMap<String, usize, NameHasher>,
    rows: Vec<FeatureVector>,
    syms: SymbolTable,
}

impl Alphabet {
    /// Rows are given in symbol order; the row index becomes the segment id.
    pub fn new(feature_names: Vec<String>, rows: Vec<(String, FeatureVector)>) -> Result<Self> {
        if rows.is_empty() {
            return Err(PhonoclassError::EmptyFeatureMatrix);
        }
        let mut feature_index = HashMap::<String, usize, NameHasher>::default();
        for (f, name) in feature_names.iter().enumerate() {
            if feature_index.insert(name.clone(), f).is_some() {
                return Err(PhonoclassError::Parse {
                    message: format!("Duplicate feature name '{}'", name),
                    line: None,
                    col: None,
                });
            }
        }
        let mut syms = SymbolTable::new();
        let mut features = Vec::with_capacity(rows.len());
        for (symbol, ftrs) in rows {
            let (id, previously_kept) = syms.keep(&symbol);
            if previously_kept {
                return Err(PhonoclassError::Parse {
                    message: format!("Duplicate segment symbol '{}'", symbol),
                    line: None,
                    col: None,
                });
            }
            if ftrs.len() != feature_names.len() {
                return Err(PhonoclassError::FeatureArity {
                    segment: id,
                    expected: feature_names.len(),
                    found: ftrs.len(),
                });
            }
            features.push(ftrs);
        }
        Ok(Self {
            feature_names,
            feature_index,
            rows: features,
            syms,
        })
    }
    pub fn n_segments(&self) -> usize {
        self.rows.len()
    }
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
    pub fn feature(&self, name: &str) -> Option<usize> {
        self.feature_index.get(name).copied()
    }
    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }
    pub fn row(&self, segment: SegmentId) -> &FeatureVector {
        &self.rows[segment as usize]
    }
    pub fn syms(&self) -> &SymbolTable {
        &self.syms
    }
    pub fn syms_mut(&mut self) -> &mut SymbolTable {
        &mut self.syms
    }
    /// Symbol of a segment, falling back to its id for segments without one.
    pub fn symbol(&self, segment: SegmentId) -> String {
        self.syms
            .symbol(segment)
            .map(str::to_owned)
            .unwrap_or_else(|| segment.to_string())
    }
    /// Encodes a space-delimited string, optionally adding word boundaries.
    pub fn encode(&self, s: &str, add_word_boundaries: bool) -> Result<Vec<SegmentId>> {
        let mut encoded = Vec::new();
        if add_word_boundaries {
            encoded.extend(self.syms.word_begin());
        }
        for (position, symbol) in s.split_whitespace().enumerate() {
            encoded.push(self.syms.require(symbol, position)?);
        }
        if add_word_boundaries {
            encoded.extend(self.syms.word_end());
        }
        Ok(encoded)
    }
    /// Decodes to a space-delimited string, optionally stripping word boundaries.
    pub fn decode(&self, x: &[SegmentId], strip_word_boundaries: bool) -> String {
        x.iter()
            .filter(|&&s| {
                !strip_word_boundaries
                    || (Some(s) != self.syms.word_begin() && Some(s) != self.syms.word_end())
            })
            .map(|&s| self.symbol(s))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "features: {}", self.feature_names.join(", "))?;
        for (id, row) in self.rows.iter().enumerate() {
            writeln!(f, "{} -> {}", self.symbol(id as SegmentId), row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet() -> Alphabet {
        let mut alphabet = Alphabet::new(
            vec!["wb".into(), "labial".into()],
            vec![
                ("<".into(), vec![1, 0].into()),
                (">".into(), vec![1, 0].into()),
                ("p".into(), vec![-1, 1].into()),
                ("t".into(), vec![-1, -1].into()),
            ],
        )
        .unwrap();
        alphabet.syms_mut().set_word_begin("<").unwrap();
        alphabet.syms_mut().set_word_end(">").unwrap();
        alphabet
    }

    #[test]
    fn encode_adds_boundaries() {
        let alphabet = alphabet();
        assert_eq!(alphabet.encode("p t", true).unwrap(), vec![0, 2, 3, 1]);
        assert_eq!(alphabet.encode("t", false).unwrap(), vec![3]);
        assert_eq!(alphabet.decode(&[0, 2, 3, 1], true), "p t");
        assert_eq!(alphabet.decode(&[0, 2, 1], false), "< p >");
    }

    #[test]
    fn encode_reports_unknown_symbol_position() {
        match alphabet().encode("p x", false) {
            Err(PhonoclassError::UnknownSymbol { token, position }) => {
                assert_eq!(token, "x");
                assert_eq!(position, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_ragged_and_empty_matrices() {
        assert!(matches!(
            Alphabet::new(vec!["a".into()], vec![]),
            Err(PhonoclassError::EmptyFeatureMatrix)
        ));
        assert!(matches!(
            Alphabet::new(vec!["a".into()], vec![("p".into(), vec![1, 1].into())]),
            Err(PhonoclassError::FeatureArity { segment: 0, expected: 1, found: 2 })
        ));
    }

    #[test]
    fn rejects_duplicate_feature_names() {
        let rows = vec![("p".into(), vec![1, -1].into()), ("t".into(), vec![-1, -1].into())];
        match Alphabet::new(vec!["voice".into(), "voice".into()], rows) {
            Err(PhonoclassError::Parse { message, .. }) => assert!(message.contains("'voice'"), "{}", message),
            other => panic!("unexpected {:?}", other),
        }
    }
}
