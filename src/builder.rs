use crate::prelude::*;
use log::{debug, error, info, warn};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the candidate annotation tables of a run
pub trait FileLister {
    fn list(&self) -> Result<Vec<String>>;
}

/// Lists the regular files directly inside a directory, sorted by name
pub struct DirectoryLister {
    directory: PathBuf,
}

impl DirectoryLister {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }
}

impl FileLister for DirectoryLister {
    fn list(&self) -> Result<Vec<String>> {
        let mut names = vec![];
        for entry in WalkDir::new(&self.directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) if source.depth() > 0 => {
                    warn!("Skipping unreadable entry in {}: {}", self.directory.display(), source);
                    continue;
                }
                Err(source) => {
                    return Err(Error::ListDirectory {
                        path: self.directory.clone(),
                        source,
                    })
                }
            };
            if entry.file_type().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }
}

/// Receives the finished matrix once per run
pub trait MatrixSink {
    fn write(&mut self, matrix: &PresenceAbsenceMatrix) -> Result<()>;
}

/// Writes the matrix as a tab separated file
///
/// The table goes to `<path>.partial` and is renamed to `path` once complete.
pub struct TsvFileSink {
    path: PathBuf,
}

impl TsvFileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatrixSink for TsvFileSink {
    fn write(&mut self, matrix: &PresenceAbsenceMatrix) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut partial = self.path.clone().into_os_string();
        partial.push(".partial");
        let partial = PathBuf::from(partial);

        let write_output = |source| Error::WriteOutput {
            path: self.path.clone(),
            source,
        };
        let file = File::create(&partial).map_err(|e| write_output(e.into()))?;
        let written = matrix
            .write_tsv(BufWriter::new(file))
            .map_err(write_output)
            .and_then(|()| fs::rename(&partial, &self.path).map_err(Error::from));
        if let Err(e) = written {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
        info!("Wrote {}", self.path.display());
        Ok(())
    }
}

/// What to do when one annotation table cannot be used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and leave the table out of the matrix
    #[default]
    Skip,
    /// Stop the run with the table's error
    Abort,
}

/// An annotation table left out of the matrix
#[derive(Debug)]
pub struct FileFailure {
    pub file: String,
    pub error: Error,
}

/// Outcome of scanning a set of annotation tables
#[derive(Debug)]
pub struct ScanReport {
    pub matrix: PresenceAbsenceMatrix,
    /// Names without the `.tsv` extension
    pub skipped: Vec<String>,
    pub failed: Vec<FileFailure>,
}

/// Scans the descriptions of one annotation table against every marker.
pub fn scan<'r, I, S>(registry: &'r MarkerRegistry, descriptions: I) -> SpeciesMarkerVector<'r>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut vector = SpeciesMarkerVector::new(registry);
    for description in descriptions {
        let description = description.as_ref();
        for (idx, definition) in registry.iter().enumerate() {
            if definition.matches(description) && vector.mark(idx) {
                info!("Found : {} ({})", definition.name(), description);
            }
        }
    }
    vector
}

/// Assembles a `PresenceAbsenceMatrix` from annotation tables
pub struct MatrixBuilder<'r> {
    registry: &'r MarkerRegistry,
    policy: FailurePolicy,
}

impl<'r> MatrixBuilder<'r> {
    pub fn new(registry: &'r MarkerRegistry) -> Self {
        Self {
            registry,
            policy: FailurePolicy::default(),
        }
    }

    pub fn failure_policy(&mut self, policy: FailurePolicy) -> &mut Self {
        self.policy = policy;
        self
    }

    /// Scans every `.tsv` name of `file_names`, in order, into one column each.
    ///
    /// Columns are named by the file name, extension included. Other names are
    /// skipped. A table that cannot be read never gets a column.
    pub fn build<I, S, A>(&self, file_names: I, source: &A) -> Result<ScanReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        A: AnnotationSource + ?Sized,
    {
        let mut report = ScanReport {
            matrix: PresenceAbsenceMatrix::new(self.registry),
            skipped: vec![],
            failed: vec![],
        };

        for file_name in file_names {
            let file_name = file_name.as_ref();
            let species = match species_id(file_name) {
                Some(species) => species,
                None => {
                    debug!("Skipping {}: not an annotation table", file_name);
                    report.skipped.push(file_name.into());
                    continue;
                }
            };
            info!("{} (species {})", file_name, species);

            let descriptions = match source.descriptions(file_name) {
                Ok(descriptions) => descriptions,
                Err(e) => match self.policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Skip => {
                        error!("Leaving out {}: {}", file_name, e);
                        report.failed.push(FileFailure {
                            file: file_name.into(),
                            error: e,
                        });
                        continue;
                    }
                },
            };

            let vector = scan(self.registry, &descriptions);
            debug!("{}: {:?}", file_name, vector.iter().collect::<Vec<_>>());
            report.matrix.assign_column(file_name, &vector)?;
        }

        if !report.failed.is_empty() {
            warn!(
                "{} annotation table(s) left out of the matrix",
                report.failed.len()
            );
        }
        Ok(report)
    }
}

/// Lists, scans and writes one presence/absence matrix.
///
/// The sink only sees the matrix after every table has been processed; a run
/// that aborts writes nothing.
pub fn run<L, A, K>(
    lister: &L,
    source: &A,
    registry: &MarkerRegistry,
    sink: &mut K,
    policy: FailurePolicy,
) -> Result<ScanReport>
where
    L: FileLister + ?Sized,
    A: AnnotationSource + ?Sized,
    K: MatrixSink + ?Sized,
{
    let file_names = lister.list()?;
    let report = MatrixBuilder::new(registry)
        .failure_policy(policy)
        .build(&file_names, source)?;
    debug!("\n{}", report.matrix);
    sink.write(&report.matrix)?;
    Ok(report)
}
