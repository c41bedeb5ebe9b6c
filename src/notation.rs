//! Converting natural classes to and from their string notations.
//!
//! Three notations are understood (see `notation.pest`): feature bundles such
//! as `[+voice,-labial]` (complemented as `[^...]`), explicit segment sets such
//! as `{p,t,k}`, and disjunctions such as `(p|t|k)` over symbols or `(#2|#3)`
//! over segment ids. Ids carry a `#` so that numeric symbols stay symbols.
//! Any class rendered by this module parses back to the same segment set.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::alphabet::Alphabet;
use crate::error::{PhonoclassError, Result};
use crate::feature::{FeatureVector, MINUS, PLUS};
use crate::natural_class::NaturalClass;
use crate::projection::Projection;
use crate::segment::{SegmentId, SegmentSet};

#[derive(Parser)]
#[grammar = "notation.pest"]
pub struct NotationParser;

// ------------- Rendering -------------

/// Explicit set notation over symbols, e.g. `{p,t,k}`.
pub fn set_notation(alphabet: &Alphabet, segs: &SegmentSet) -> String {
    let symbols: Vec<String> = segs.iter().map(|s| alphabet.symbol(s)).collect();
    format!("{{{}}}", symbols.join(","))
}

/// Disjunction over symbols, e.g. `(p|t|k)`.
pub fn symbol_disjunction(alphabet: &Alphabet, segs: &SegmentSet) -> String {
    let symbols: Vec<String> = segs.iter().map(|s| alphabet.symbol(s)).collect();
    format!("({})", symbols.join("|"))
}

/// Disjunction over segment ids, e.g. `(#2|#3|#4)`.
pub fn id_disjunction(segs: &SegmentSet) -> String {
    let ids: Vec<String> = segs.iter().map(|s| format!("#{}", s)).collect();
    format!("({})", ids.join("|"))
}

/// Segments denoted by a feature vector, as a disjunction over symbols.
pub fn feature_disjunction(projection: &Projection, ftrs: &FeatureVector) -> String {
    symbol_disjunction(projection.alphabet(), &projection.denotation(ftrs, false))
}

pub fn sequence_notation(classes: &[&NaturalClass]) -> String {
    classes.iter().map(|x| x.name()).collect()
}

pub fn id_disjunction_sequence(classes: &[&NaturalClass]) -> String {
    classes.iter().map(|x| id_disjunction(x.segs())).collect()
}

// ------------- Parsing -------------

/// Parses a single class. When the projection has natural classes and one of
/// them has the denoted segment set, that registered class is returned.
pub fn parse(projection: &Projection, s: &str) -> Result<NaturalClass> {
    let single = NotationParser::parse(Rule::single, s.trim())?
        .next()
        .and_then(|p| p.into_inner().next())
        .ok_or_else(|| empty_parse(s))?;
    resolve(projection, to_class(projection, single)?)
}

/// Parses concatenated notations such as `[+voice]{p}(t|k)`.
pub fn parse_sequence(projection: &Projection, s: &str) -> Result<Vec<NaturalClass>> {
    let sequence = NotationParser::parse(Rule::sequence, s.trim())?
        .next()
        .ok_or_else(|| empty_parse(s))?;
    sequence
        .into_inner()
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(|pair| resolve(projection, to_class(projection, pair)?))
        .collect()
}

pub fn parse_all<S: AsRef<str>>(projection: &Projection, strings: &[S]) -> Result<Vec<NaturalClass>> {
    strings.iter().map(|s| parse(projection, s.as_ref())).collect()
}

/// Parses a feature bundle such as `[+voice,-labial]` into a feature vector;
/// a complement marker is ignored.
pub fn parse_features(alphabet: &Alphabet, s: &str) -> Result<FeatureVector> {
    let pair = NotationParser::parse(Rule::single, s.trim())?
        .next()
        .and_then(|p| p.into_inner().next())
        .ok_or_else(|| empty_parse(s))?;
    if pair.as_rule() != Rule::bundle {
        return Err(PhonoclassError::Parse {
            message: format!("Expected a feature bundle: {}", s),
            line: None,
            col: None,
        });
    }
    let (ftrs, _) = bundle(alphabet, pair)?;
    Ok(ftrs)
}

fn empty_parse(s: &str) -> PhonoclassError {
    PhonoclassError::Parse {
        message: format!("Nothing to parse in '{}'", s),
        line: None,
        col: None,
    }
}

fn resolve(projection: &Projection, x: NaturalClass) -> Result<NaturalClass> {
    match projection.natural_classes().and_then(|classes| classes.lookup(x.segs())) {
        Some(registered) => Ok(registered.clone()),
        None => Ok(x),
    }
}

fn to_class(projection: &Projection, pair: Pair<Rule>) -> Result<NaturalClass> {
    let alphabet = projection.alphabet();
    match pair.as_rule() {
        Rule::bundle => {
            let (ftrs, complement) = bundle(alphabet, pair)?;
            let segs = projection.denotation(&ftrs, complement);
            Ok(NaturalClass::new(alphabet, segs, Some(ftrs), complement))
        }
        Rule::set => {
            let segs = segments(projection, pair)?;
            Ok(NaturalClass::new(alphabet, segs, None, false))
        }
        Rule::disjunction => {
            let segs = segments(projection, pair)?;
            Ok(NaturalClass::new(alphabet, segs, None, false))
        }
        rule => Err(PhonoclassError::Parse {
            message: format!("Unexpected {:?} in class notation", rule),
            line: None,
            col: None,
        }),
    }
}

fn bundle(alphabet: &Alphabet, pair: Pair<Rule>) -> Result<(FeatureVector, bool)> {
    let mut ftrs = FeatureVector::unspecified(alphabet.n_features());
    let mut complement = false;
    let mut position = 0;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::negation => complement = true,
            Rule::feature => {
                let mut parts = inner.into_inner();
                let (Some(polarity), Some(name)) = (parts.next(), parts.next()) else {
                    continue;
                };
                let f = alphabet.feature(name.as_str()).ok_or_else(|| PhonoclassError::UnknownFeature {
                    token: name.as_str().to_owned(),
                    position,
                })?;
                ftrs.set(f, if polarity.as_str() == "+" { PLUS } else { MINUS });
                position += 1;
            }
            _ => (),
        }
    }
    Ok((ftrs, complement))
}

fn segments(projection: &Projection, pair: Pair<Rule>) -> Result<SegmentSet> {
    let alphabet = projection.alphabet();
    let mut segs = SegmentSet::new();
    for (position, member) in pair.into_inner().enumerate() {
        let token = member.as_str();
        let segment = match member.as_rule() {
            // `#<id>`, only produced inside disjunctions
            Rule::id => token[1..]
                .parse::<SegmentId>()
                .ok()
                .filter(|&id| (id as usize) < alphabet.n_segments())
                .ok_or_else(|| PhonoclassError::UnknownSymbol {
                    token: token.to_owned(),
                    position,
                })?,
            _ => alphabet.syms().require(token, position)?,
        };
        if !projection.segment_mask().contains(segment) {
            return Err(PhonoclassError::OffProjection {
                token: token.to_owned(),
                position,
            });
        }
        segs.insert(segment);
    }
    Ok(segs)
}
