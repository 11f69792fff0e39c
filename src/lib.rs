#![crate_name = "phagomarkers"]
//! Presence/absence of phagotrophy markers across annotated genomes.
//!
//! Each species is one tab separated functional annotation table. Every
//! protein description in its `signature_description` column is tested
//! against an ordered `MarkerRegistry`, and the markers seen at least once
//! become one boolean column of a `PresenceAbsenceMatrix`.
//!
//! ```no_run
//! use phagomarkers::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = MarkerRegistry::phagotrophy()?;
//! let reader = TsvReaderBuilder::new("annotations").build();
//! let mut sink = TsvFileSink::new("out/presence_absence.tsv");
//! let report = run(
//!     &DirectoryLister::new("annotations"),
//!     &reader,
//!     &registry,
//!     &mut sink,
//!     FailurePolicy::Skip,
//! )?;
//! println!("{}", report.matrix);
//! # Ok(())
//! # }
//! ```

pub mod prelude;

pub mod annotation;
pub mod builder;
pub mod error;
pub mod markers;
pub mod matrix;

pub use crate::error::{Error, Result};
