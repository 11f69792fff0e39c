use crate::prelude::*;
use csv;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Column of the annotation tables holding the protein/domain names
pub const DESCRIPTION_COLUMN: &str = "signature_description";

/// Text a missing description cell is read as
pub const MISSING: &str = "nan";

/// Supplies the protein descriptions of one annotation table
///
/// `file_name` is a name as produced by a `FileLister`. All rows are read
/// before anything is returned, so a table that fails halfway never
/// contributes a partial column.
pub trait AnnotationSource {
    fn descriptions(&self, file_name: &str) -> Result<Vec<String>>;
}

/// Reads tab delimited annotation tables from a directory
///
/// Constructed through `TsvReaderBuilder`.
pub struct TsvAnnotationReader {
    directory: PathBuf,
    delimiter: u8,
    column: String,
}

impl TsvAnnotationReader {
    /// Reads the description column of a table from any reader.
    ///
    /// `file_name` only labels errors.
    pub fn read_from<R: Read>(&self, reader: R, file_name: &str) -> Result<Vec<String>> {
        let unreadable = |source| Error::UnreadableFile {
            file: file_name.into(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let idx = rdr
            .headers()
            .map_err(unreadable)?
            .iter()
            .position(|h| h == self.column)
            .ok_or_else(|| Error::MissingColumn {
                file: file_name.into(),
                column: self.column.clone(),
            })?;

        let mut descriptions = vec![];
        for record in rdr.records() {
            let record = record.map_err(unreadable)?;
            let description = match record.get(idx) {
                Some(cell) if !cell.is_empty() => cell,
                _ => MISSING,
            };
            descriptions.push(description.to_string());
        }
        Ok(descriptions)
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }
}

impl AnnotationSource for TsvAnnotationReader {
    fn descriptions(&self, file_name: &str) -> Result<Vec<String>> {
        let file = File::open(self.path(file_name)).map_err(|e| Error::UnreadableFile {
            file: file_name.into(),
            source: e.into(),
        })?;
        self.read_from(file, file_name)
    }
}

pub struct TsvReaderBuilder {
    directory: PathBuf,
    delimiter: u8,
    column: String,
}

impl TsvReaderBuilder {
    /// Construct a new builder reading tables out of `directory`
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            delimiter: b'\t',
            column: DESCRIPTION_COLUMN.to_owned(),
        }
    }

    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn column(&mut self, column: &str) -> &mut Self {
        self.column = column.to_owned();
        self
    }

    pub fn build(&self) -> TsvAnnotationReader {
        TsvAnnotationReader {
            directory: self.directory.clone(),
            delimiter: self.delimiter,
            column: self.column.clone(),
        }
    }
}
