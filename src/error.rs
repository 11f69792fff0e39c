use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// The annotation table could not be opened or parsed as delimited data.
    #[error("could not read annotation table {file}: {source}")]
    UnreadableFile {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// The annotation table has no column holding the protein descriptions.
    #[error("annotation table {file} has no `{column}` column")]
    MissingColumn { file: String, column: String },

    #[error("invalid pattern for marker {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("marker {0} has an empty pattern")]
    EmptyPattern(String),

    #[error("row {row} of marker table {file} has a pattern but no name")]
    UnnamedMarker { file: String, row: usize },

    #[error("marker {0} is defined more than once")]
    DuplicateMarker(String),

    #[error("could not list input directory {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("could not write matrix to {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("matrix column does not fit the marker rows: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
