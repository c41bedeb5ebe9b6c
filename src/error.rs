use thiserror::Error;

use crate::segment::SegmentId;
use crate::notation::Rule;

#[derive(Error, Debug)]
pub enum PhonoclassError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Parse error: {message}")]
    Parse { message: String, line: Option<usize>, col: Option<usize> },
    #[error("Unknown symbol '{token}' at position {position}")]
    UnknownSymbol { token: String, position: usize },
    #[error("Unknown feature '{token}' at position {position}")]
    UnknownFeature { token: String, position: usize },
    #[error("Segment '{token}' at position {position} is not on the projection")]
    OffProjection { token: String, position: usize },
    #[error("Feature matrix is empty")]
    EmptyFeatureMatrix,
    #[error("Segment {segment} has {found} feature values, expected {expected}")]
    FeatureArity { segment: SegmentId, expected: usize, found: usize },
    #[error("Segment {0} has no row in the feature matrix")]
    SegmentOutOfRange(SegmentId),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, PhonoclassError>;

// Helper conversions
impl From<config::ConfigError> for PhonoclassError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<std::io::Error> for PhonoclassError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
impl From<pest::error::Error<Rule>> for PhonoclassError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        let (line, col) = match e.line_col {
            pest::error::LineColLocation::Pos((l, c)) => (l, c),
            pest::error::LineColLocation::Span((l, c), _) => (l, c),
        };
        Self::Parse { message: e.variant.message().to_string(), line: Some(line), col: Some(col) }
    }
}
