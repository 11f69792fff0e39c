pub use crate::annotation::{AnnotationSource, TsvAnnotationReader, TsvReaderBuilder};
pub use crate::builder::{
    run, scan, DirectoryLister, FailurePolicy, FileFailure, FileLister, MatrixBuilder, MatrixSink,
    ScanReport, TsvFileSink,
};
pub use crate::error::{Error, Result};
pub use crate::markers::{MarkerDefinition, MarkerRegistry};
pub use crate::matrix::{species_id, PresenceAbsenceMatrix, SpeciesMarkerVector};
