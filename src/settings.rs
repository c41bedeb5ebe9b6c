//! Settings for building natural classes, layered from an optional
//! configuration file and `PHONOCLASS_*` environment variables.
//!
//! ```toml
//! word_begin = "<"
//! word_end = ">"
//! complement_classes = true
//! prune = true
//! projections = ["stops\t{p,t,k}\tall\t3"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::lattice::LatticeOptions;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Symbol of the word-begin segment, defaults to the first symbol.
    pub word_begin: Option<String>,
    /// Symbol of the word-end segment, defaults to the second symbol.
    pub word_end: Option<String>,
    pub complement_classes: bool,
    pub prune: bool,
    pub topped: bool,
    /// Projection descriptors, see [`crate::projection::Projection::from_descriptor`].
    pub projections: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            word_begin: None,
            word_end: None,
            complement_classes: false,
            prune: true,
            topped: false,
            projections: Vec::new(),
        }
    }
}

impl Settings {
    /// Reads the file at `path` if it exists, then lets the environment override it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("PHONOCLASS").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn lattice_options(&self) -> LatticeOptions {
        LatticeOptions {
            prune: self.prune,
            topped: self.topped,
        }
    }
}
