use crate::prelude::*;
use csv;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::io::Read;

/// Markers of phagotrophy, in matrix row order.
///
/// Each entry pairs the marker's row name with the start of the protein
/// names it stands for. A `.` in a pattern stands for any single character,
/// which covers separator variants like "Rac-GTPase" and "Rac1 GTPase".
/// `Chl` is a phototrophy proxy rather than a phagotrophy marker.
pub const PHAGOTROPHY_MARKERS: [(&str, &str); 11] = [
    ("Cat", "Cathepsin"),
    ("Cdc", "CDC42"),
    ("Chl", "cytochrome"),
    ("Pho", "phosphatidylinositol.3.phosphate"),
    ("Rab", "RAB"),
    ("Rac", "RAC.GTP"),
    ("Rap", "RAP.GTP"),
    ("Rho", "Rho.GTP"),
    ("Snare", "SNARE"),
    ("Wash", "WASH"),
    ("Wasp", "WASP"),
];

/// A named protein-name pattern
#[derive(Debug, Clone)]
pub struct MarkerDefinition {
    name: String,
    pattern: String,
    regex: Regex,
}

impl MarkerDefinition {
    /// Compiles `pattern` as a case-insensitive match anchored at the
    /// first character of the description.
    pub fn new(name: &str, pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::EmptyPattern(name.into()));
        }
        let regex = RegexBuilder::new(&format!("^(?:{})", pattern))
            .case_insensitive(true)
            .build()
            .map_err(|source| Error::InvalidPattern {
                name: name.into(),
                source,
            })?;
        Ok(Self {
            name: name.into(),
            pattern: pattern.into(),
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Tests whether `text` begins with this marker's pattern.
    ///
    /// Trailing characters are unconstrained. Empty or too short
    /// descriptions simply do not match.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// The ordered set of markers looked for in every annotation table
#[derive(Debug, Clone)]
pub struct MarkerRegistry {
    definitions: Vec<MarkerDefinition>,
}

impl MarkerRegistry {
    /// Builds a registry from `(name, pattern)` pairs, keeping their order.
    pub fn from_pairs<N, P>(pairs: &[(N, P)]) -> Result<Self>
    where
        N: AsRef<str>,
        P: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut definitions = Vec::with_capacity(pairs.len());
        for (name, pattern) in pairs {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(Error::DuplicateMarker(name.into()));
            }
            definitions.push(MarkerDefinition::new(name, pattern.as_ref())?);
        }
        Ok(Self { definitions })
    }

    /// The built-in phagotrophy marker set
    pub fn phagotrophy() -> Result<Self> {
        Self::from_pairs(&PHAGOTROPHY_MARKERS)
    }

    /// Reads a registry from a tab-delimited table with a `name` and a
    /// `pattern` column. `label` names the source in error messages.
    pub fn from_tsv<R: Read>(reader: R, label: &str) -> Result<Self> {
        let unreadable = |source| Error::UnreadableFile {
            file: label.into(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(reader);

        let headers = rdr.headers().map_err(unreadable)?.clone();
        let column = |wanted: &str| {
            headers
                .iter()
                .position(|h| h == wanted)
                .ok_or_else(|| Error::MissingColumn {
                    file: label.into(),
                    column: wanted.into(),
                })
        };
        let name_idx = column("name")?;
        let pattern_idx = column("pattern")?;

        let mut pairs = vec![];
        for (idx, record) in rdr.records().enumerate() {
            let record = record.map_err(unreadable)?;
            let name = record.get(name_idx).unwrap_or_default().trim();
            let pattern = record.get(pattern_idx).unwrap_or_default().trim();
            if name.is_empty() {
                if pattern.is_empty() {
                    continue;
                }
                return Err(Error::UnnamedMarker {
                    file: label.into(),
                    row: idx + 1,
                });
            }
            pairs.push((name.to_string(), pattern.to_string()));
        }
        Self::from_pairs(&pairs)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MarkerDefinition> {
        self.definitions.iter()
    }

    /// Marker names in row order
    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name()).collect()
    }

    /// Row index of the marker called `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.definitions.iter().position(|d| d.name == name)
    }
}

impl<'a> IntoIterator for &'a MarkerRegistry {
    type Item = &'a MarkerDefinition;
    type IntoIter = std::slice::Iter<'a, MarkerDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
