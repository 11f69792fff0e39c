use crate::prelude::*;
use csv;
use ndarray::{Array1, Array2, ErrorKind, ShapeError};
use std::fmt;
use std::io::Write;

/// Extension of the annotation tables, stripped to get a species identifier
pub const TSV_EXTENSION: &str = ".tsv";

/// Identifier of the species an annotation table belongs to
///
/// Returns `None` for names that are not annotation tables. Identifiers are
/// not checked for uniqueness.
pub fn species_id(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(TSV_EXTENSION)
}

/// Markers observed in one species
///
/// Starts with every marker of the registry absent. A marker can only be
/// marked present, never reset.
#[derive(Debug, Clone)]
pub struct SpeciesMarkerVector<'r> {
    registry: &'r MarkerRegistry,
    present: Array1<bool>,
}

impl<'r> SpeciesMarkerVector<'r> {
    pub fn new(registry: &'r MarkerRegistry) -> Self {
        Self {
            registry,
            present: Array1::from_elem(registry.len(), false),
        }
    }

    /// Records the marker at row `idx` as present.
    ///
    /// Returns true if it had not been seen before.
    pub fn mark(&mut self, idx: usize) -> bool {
        let first = !self.present[idx];
        self.present[idx] = true;
        first
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.registry.position(name).map(|idx| self.present[idx])
    }

    /// `(marker name, presence)` pairs in registry order
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.registry
            .iter()
            .zip(self.present.iter())
            .map(|(d, present)| (d.name(), *present))
    }

    pub fn present(&self) -> &Array1<bool> {
        &self.present
    }

    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    pub fn registry(&self) -> &MarkerRegistry {
        self.registry
    }
}

impl PartialEq for SpeciesMarkerVector<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.registry.names() == other.registry.names() && self.present == other.present
    }
}

/// Boolean table of markers (rows) by annotation table (columns)
#[derive(Debug, Clone)]
pub struct PresenceAbsenceMatrix {
    markers: Vec<String>,
    columns: Vec<String>,
    data: Array2<bool>,
}

impl PresenceAbsenceMatrix {
    /// An empty matrix with one row per marker of `registry`
    pub fn new(registry: &MarkerRegistry) -> Self {
        Self {
            markers: registry.names().into_iter().map(String::from).collect(),
            columns: vec![],
            data: Array2::from_elem((registry.len(), 0), false),
        }
    }

    /// Stores `vector` as the column called `name`.
    ///
    /// A new name appends a column, an existing one is overwritten in place.
    pub fn assign_column(&mut self, name: &str, vector: &SpeciesMarkerVector) -> Result<()> {
        if !vector.iter().map(|(n, _)| n).eq(self.markers.iter().map(String::as_str)) {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }
        match self.columns.iter().position(|c| c == name) {
            Some(idx) => self.data.column_mut(idx).assign(vector.present()),
            None => {
                self.data.push_column(vector.present().view())?;
                self.columns.push(name.into());
            }
        }
        Ok(())
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn data(&self) -> &Array2<bool> {
        &self.data
    }

    pub fn get(&self, marker: &str, column: &str) -> Option<bool> {
        let row = self.markers.iter().position(|m| m == marker)?;
        let col = self.columns.iter().position(|c| c == column)?;
        Some(self.data[[row, col]])
    }

    /// `(marker name, presence)` pairs of one column
    pub fn column(&self, name: &str) -> Option<Vec<(&str, bool)>> {
        let col = self.columns.iter().position(|c| c == name)?;
        Some(
            self.markers
                .iter()
                .map(String::as_str)
                .zip(self.data.column(col).iter().copied())
                .collect(),
        )
    }

    /// Writes the matrix as a tab separated table.
    ///
    /// The header is an empty cell followed by the column names, each row is
    /// a marker name followed by `True` or `False` per column.
    pub fn write_tsv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        wtr.write_record(std::iter::once("").chain(self.columns.iter().map(String::as_str)))?;
        for (marker, row) in self.markers.iter().zip(self.data.rows()) {
            wtr.write_record(
                std::iter::once(marker.as_str()).chain(row.iter().map(|p| render(*p))),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn render(present: bool) -> &'static str {
    if present {
        "True"
    } else {
        "False"
    }
}

impl fmt::Display for PresenceAbsenceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self.markers.iter().map(|m| m.len()).max().unwrap_or(0);
        write!(f, "{:width$}", "", width = label_width)?;
        for column in &self.columns {
            write!(f, "  {:>5}", column)?;
        }
        for (marker, row) in self.markers.iter().zip(self.data.rows()) {
            write!(f, "\n{:width$}", marker, width = label_width)?;
            for (column, present) in self.columns.iter().zip(row.iter()) {
                write!(f, "  {:>width$}", render(*present), width = column.len().max(5))?;
            }
        }
        Ok(())
    }
}
