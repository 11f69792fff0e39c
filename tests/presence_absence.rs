//! End to end runs over annotation tables on disk

use phagomarkers::prelude::*;
use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const HEADER: &str = "protein_accession\tanalysis\tsignature_description\tscore\n";

fn write_table(dir: &Path, name: &str, descriptions: &[&str]) -> std::io::Result<()> {
    let mut table = HEADER.to_string();
    for (i, description) in descriptions.iter().enumerate() {
        table.push_str(&format!("prot{}\tPfam\t{}\t1e-10\n", i, description));
    }
    fs::write(dir.join(name), table)
}

#[test]
fn test_marker_vector_of_a_table() -> Result<(), Box<dyn Error>> {
    let input = tempdir()?;
    write_table(
        input.path(),
        "SpeciesA.tsv",
        &["Rab GTPase X", "unrelated protein", "Cathepsin B"],
    )?;

    let registry = MarkerRegistry::phagotrophy()?;
    let reader = TsvReaderBuilder::new(input.path()).build();
    let report = MatrixBuilder::new(&registry).build(&["SpeciesA.tsv"], &reader)?;

    let column = report.matrix.column("SpeciesA.tsv").ok_or("no column")?;
    assert_eq!(column.len(), registry.len());
    for (marker, present) in column {
        assert_eq!(present, marker == "Rab" || marker == "Cat", "{}", marker);
    }
    Ok(())
}

#[test]
fn test_table_without_rows_is_all_absent() -> Result<(), Box<dyn Error>> {
    let input = tempdir()?;
    write_table(input.path(), "Empty.tsv", &[])?;

    let registry = MarkerRegistry::phagotrophy()?;
    let reader = TsvReaderBuilder::new(input.path()).build();
    let report = MatrixBuilder::new(&registry).build(&["Empty.tsv"], &reader)?;

    assert_eq!(report.matrix.columns(), &["Empty.tsv".to_string()]);
    let column = report.matrix.column("Empty.tsv").ok_or("no column")?;
    assert_eq!(column.len(), 11);
    assert!(column.iter().all(|(_, present)| !present));
    Ok(())
}

#[test]
fn test_full_run_writes_matrix() -> Result<(), Box<dyn Error>> {
    let input = tempdir()?;
    let output = tempdir()?;
    write_table(input.path(), "SpeciesA.tsv", &["WASH complex subunit"])?;
    write_table(input.path(), "SpeciesB.tsv", &["rho-GTPase activating protein"])?;
    fs::write(input.path().join("readme.txt"), "not a table")?;
    fs::create_dir(input.path().join("nested.tsv"))?;

    let registry = MarkerRegistry::phagotrophy()?;
    let reader = TsvReaderBuilder::new(input.path()).build();
    let out_path = output.path().join("matrices").join("presence_absence.tsv");
    let mut sink = TsvFileSink::new(&out_path);
    let report = run(
        &DirectoryLister::new(input.path()),
        &reader,
        &registry,
        &mut sink,
        FailurePolicy::Skip,
    )?;

    assert_eq!(report.skipped, vec!["readme.txt"]);
    assert!(report.failed.is_empty());

    let written = fs::read_to_string(&out_path)?;
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 12);
    assert_eq!(lines[0], "\tSpeciesA.tsv\tSpeciesB.tsv");
    assert_eq!(lines[1], "Cat\tFalse\tFalse");
    assert_eq!(lines[8], "Rho\tFalse\tTrue");
    assert_eq!(lines[10], "Wash\tTrue\tFalse");
    assert_eq!(lines[11], "Wasp\tFalse\tFalse");
    assert!(!output.path().join("matrices").join("presence_absence.tsv.partial").exists());
    Ok(())
}

#[test]
fn test_only_tsv_names_become_columns() -> Result<(), Box<dyn Error>> {
    let input = tempdir()?;
    fs::write(input.path().join("readme.txt"), "signature_description\nRAB5\n")?;

    let registry = MarkerRegistry::phagotrophy()?;
    let reader = TsvReaderBuilder::new(input.path()).build();
    let report = MatrixBuilder::new(&registry).build(&["readme.txt"], &reader)?;

    assert!(report.matrix.columns().is_empty());
    assert!(report.failed.is_empty());
    assert_eq!(report.skipped, vec!["readme.txt"]);
    Ok(())
}

#[test]
fn test_table_without_description_column_is_left_out() -> Result<(), Box<dyn Error>> {
    let input = tempdir()?;
    write_table(input.path(), "Good.tsv", &["SNARE domain"])?;
    fs::write(input.path().join("Bad.tsv"), "protein\tdescription\np1\tSNARE\n")?;

    let registry = MarkerRegistry::phagotrophy()?;
    let reader = TsvReaderBuilder::new(input.path()).build();
    let report = MatrixBuilder::new(&registry).build(&["Bad.tsv", "Good.tsv"], &reader)?;

    assert_eq!(report.matrix.columns(), &["Good.tsv".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(
        &report.failed[0].error,
        phagomarkers::Error::MissingColumn { file, .. } if file == "Bad.tsv"
    ));
    Ok(())
}

#[test]
fn test_strict_run_writes_nothing_on_failure() -> Result<(), Box<dyn Error>> {
    let input = tempdir()?;
    let output = tempdir()?;
    write_table(input.path(), "Good.tsv", &["SNARE domain"])?;
    fs::write(input.path().join("Bad.tsv"), "protein\tdescription\np1\tSNARE\n")?;

    let registry = MarkerRegistry::phagotrophy()?;
    let reader = TsvReaderBuilder::new(input.path()).build();
    let out_path = output.path().join("presence_absence.tsv");
    let result = run(
        &DirectoryLister::new(input.path()),
        &reader,
        &registry,
        &mut TsvFileSink::new(&out_path),
        FailurePolicy::Abort,
    );

    assert!(result.is_err());
    assert!(!out_path.exists());
    Ok(())
}

#[test]
fn test_missing_input_directory_aborts() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    let result = DirectoryLister::new(root.path().join("absent")).list();
    assert!(matches!(
        result,
        Err(phagomarkers::Error::ListDirectory { .. })
    ));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_does_not_abort_listing() -> Result<(), Box<dyn Error>> {
    let input = tempdir()?;
    write_table(input.path(), "SpeciesA.tsv", &["Cathepsin B"])?;
    std::os::unix::fs::symlink("/nonexistent/target", input.path().join("notes.txt"))?;

    let names = DirectoryLister::new(input.path()).list()?;
    assert_eq!(names, vec!["SpeciesA.tsv"]);
    Ok(())
}

#[test]
fn test_failed_write_leaves_no_partial_file() -> Result<(), Box<dyn Error>> {
    let output = tempdir()?;
    let out_path = output.path().join("presence_absence.tsv");
    fs::create_dir(&out_path)?;
    fs::write(out_path.join("keep"), "occupied")?;

    let registry = MarkerRegistry::phagotrophy()?;
    let matrix = PresenceAbsenceMatrix::new(&registry);
    let result = TsvFileSink::new(&out_path).write(&matrix);

    assert!(result.is_err());
    assert!(!output.path().join("presence_absence.tsv.partial").exists());
    Ok(())
}
