use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::io::{RunReport, write_utterance_tsv};
use crate::models::RunSummary;
use crate::tokenize::Tokenizer;

use super::{aggregate_directory, aggregate_files, resolve_output_dir, write_totag_files};

/// How the parse run interprets its input paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Explicit `.eaf` files
    File,
    /// A directory searched recursively for `.eaf` files
    Directory,
}

/// Explicit context for one parse run. Every stage reads from this struct;
/// nothing is carried in shared mutable state between stages.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Input paths: one directory in directory mode, `.eaf` files in file mode
    pub inputs: Vec<PathBuf>,
    pub kind: InputKind,
    /// Directory-mode: base name for numbered run directories.
    /// File-mode: parent directory for the per-file run directory.
    pub output_base: PathBuf,
    /// Also write per-speaker tagging-input files
    pub prepare_totag: bool,
    /// Create a run directory; when false, artifacts land directly in
    /// `output_base` and no report file is written
    pub create_run_dir: bool,
}

/// Artifacts written by a completed parse run
#[derive(Debug)]
pub struct RunOutcome {
    pub run_dir: PathBuf,
    pub tsv_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub totag_dir: Option<PathBuf>,
    pub record_count: usize,
}

/// Execute a full parse run: resolve the output location, aggregate
/// annotations from the input, and write the table, report and optional
/// per-speaker files.
pub fn execute_run(config: &RunConfig, tokenizer: &dyn Tokenizer) -> Result<RunOutcome> {
    let first = config.inputs.first().context("No input path given")?;
    validate_inputs(config, first)?;

    let stem = first
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    // Output collisions surface before any parsing work is done
    let (run_dir, with_report) = if config.create_run_dir {
        match config.kind {
            InputKind::File => {
                let dir = config.output_base.join(&stem);
                if dir.exists() {
                    bail!(
                        "Output directory already exists: {}. Fix and run again.",
                        dir.display()
                    );
                }
                (dir, true)
            }
            InputKind::Directory => (resolve_output_dir(&config.output_base, 0), true),
        }
    } else {
        (config.output_base.clone(), false)
    };
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create output directory: {}", run_dir.display()))?;
    info!("Writing output to {}", run_dir.display());

    let records = match config.kind {
        InputKind::Directory => aggregate_directory(first)?,
        InputKind::File => aggregate_files(&config.inputs)?,
    };
    info!("Aggregated {} annotation records", records.len());

    let tsv_name = match config.kind {
        InputKind::File => format!("{stem}.tsv"),
        InputKind::Directory => "utterances.tsv".to_string(),
    };
    let tsv_path = run_dir.join(tsv_name);
    write_utterance_tsv(&tsv_path, &records)?;
    info!("Utterance table written to {}", tsv_path.display());

    let report_path = if with_report {
        let name = match config.kind {
            InputKind::File => format!("{stem}.info"),
            InputKind::Directory => "run.info".to_string(),
        };
        let path = run_dir.join(name);
        let summary = RunSummary::from_records(&records);
        RunReport::new(&summary).write_file(&path)?;
        info!("Run report written to {}", path.display());
        Some(path)
    } else {
        None
    };

    let totag_dir = if config.prepare_totag {
        let dir = write_totag_files(&run_dir, &records, tokenizer)?;
        info!("Per-speaker tagging files written to {}", dir.display());
        Some(dir)
    } else {
        None
    };

    Ok(RunOutcome {
        run_dir,
        tsv_path,
        report_path,
        totag_dir,
        record_count: records.len(),
    })
}

fn validate_inputs(config: &RunConfig, first: &Path) -> Result<()> {
    match config.kind {
        InputKind::Directory => {
            if first.extension().is_some_and(|ext| ext == "eaf") {
                bail!(
                    "Input kind 'dir' given, but {} looks like a single file",
                    first.display()
                );
            }
            if !first.is_dir() {
                bail!("Cannot find input directory: {}", first.display());
            }
        }
        InputKind::File => {
            for path in &config.inputs {
                if !path.is_file() {
                    bail!("Cannot find input file: {}", path.display());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::WordTokenizer;

    const MINIMAL_EAF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ANNOTATION_DOCUMENT>
    <TIME_ORDER>
        <TIME_SLOT TIME_SLOT_ID="ts1" TIME_VALUE="0"/>
        <TIME_SLOT TIME_SLOT_ID="ts2" TIME_VALUE="1000"/>
    </TIME_ORDER>
    <TIER TIER_ID="Sif">
        <ANNOTATION>
            <ALIGNABLE_ANNOTATION ANNOTATION_ID="a1" TIME_SLOT_REF1="ts1" TIME_SLOT_REF2="ts2">
                <ANNOTATION_VALUE>hæ hæ</ANNOTATION_VALUE>
            </ALIGNABLE_ANNOTATION>
        </ANNOTATION>
    </TIER>
</ANNOTATION_DOCUMENT>"#;

    fn dir_mode_config(input: &Path, output_base: &Path) -> RunConfig {
        RunConfig {
            inputs: vec![input.to_path_buf()],
            kind: InputKind::Directory,
            output_base: output_base.to_path_buf(),
            prepare_totag: false,
            create_run_dir: true,
        }
    }

    #[test]
    fn test_directory_run_writes_table_and_report() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("uppskriftir");
        std::fs::create_dir(&input).unwrap();
        std::fs::write(input.join("a.eaf"), MINIMAL_EAF).unwrap();

        let base = workspace.path().join("elan-out_");
        let outcome = execute_run(&dir_mode_config(&input, &base), &WordTokenizer).unwrap();

        assert_eq!(outcome.run_dir, workspace.path().join("elan-out_0"));
        assert_eq!(outcome.record_count, 1);
        assert!(outcome.tsv_path.is_file());
        assert!(outcome.report_path.unwrap().is_file());
        assert!(outcome.totag_dir.is_none());
    }

    #[test]
    fn test_directory_runs_do_not_collide() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("uppskriftir");
        std::fs::create_dir(&input).unwrap();
        std::fs::write(input.join("a.eaf"), MINIMAL_EAF).unwrap();

        let base = workspace.path().join("elan-out_");
        let config = dir_mode_config(&input, &base);
        let first = execute_run(&config, &WordTokenizer).unwrap();
        let second = execute_run(&config, &WordTokenizer).unwrap();

        assert_eq!(first.run_dir, workspace.path().join("elan-out_0"));
        assert_eq!(second.run_dir, workspace.path().join("elan-out_1"));
    }

    #[test]
    fn test_file_mode_collision_is_fatal() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("a.eaf");
        std::fs::write(&input, MINIMAL_EAF).unwrap();

        let output = workspace.path().join("output");
        std::fs::create_dir_all(output.join("a")).unwrap();

        let config = RunConfig {
            inputs: vec![input],
            kind: InputKind::File,
            output_base: output,
            prepare_totag: false,
            create_run_dir: true,
        };
        let err = execute_run(&config, &WordTokenizer).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_file_mode_writes_stem_named_artifacts() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("viku04_a.eaf");
        std::fs::write(&input, MINIMAL_EAF).unwrap();

        let config = RunConfig {
            inputs: vec![input],
            kind: InputKind::File,
            output_base: workspace.path().join("output"),
            prepare_totag: true,
            create_run_dir: true,
        };
        let outcome = execute_run(&config, &WordTokenizer).unwrap();

        assert!(outcome.run_dir.ends_with("viku04_a"));
        assert_eq!(outcome.tsv_path.file_name().unwrap(), "viku04_a.tsv");
        assert_eq!(
            outcome.report_path.unwrap().file_name().unwrap(),
            "viku04_a.info"
        );
        let totag = outcome.totag_dir.unwrap();
        assert!(totag.join("Sif_test.in").is_file());
    }

    #[test]
    fn test_dir_kind_rejects_eaf_path() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("a.eaf");
        std::fs::write(&input, MINIMAL_EAF).unwrap();

        let config = dir_mode_config(&input, &workspace.path().join("out"));
        let err = execute_run(&config, &WordTokenizer).unwrap_err();
        assert!(err.to_string().contains("looks like a single file"));
    }

    #[test]
    fn test_missing_input_directory_writes_nothing() {
        let workspace = tempfile::tempdir().unwrap();
        let missing = workspace.path().join("no-such-dir");
        let base = workspace.path().join("elan-out_");

        let result = execute_run(&dir_mode_config(&missing, &base), &WordTokenizer);
        assert!(result.is_err());
        assert!(!workspace.path().join("elan-out_0").exists());
    }

    #[test]
    fn test_no_dir_mode_skips_report() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("uppskriftir");
        std::fs::create_dir(&input).unwrap();
        std::fs::write(input.join("a.eaf"), MINIMAL_EAF).unwrap();

        let output = workspace.path().join("output");
        let config = RunConfig {
            inputs: vec![input],
            kind: InputKind::Directory,
            output_base: output.clone(),
            prepare_totag: false,
            create_run_dir: false,
        };
        let outcome = execute_run(&config, &WordTokenizer).unwrap();

        assert_eq!(outcome.run_dir, output);
        assert!(outcome.report_path.is_none());
        assert!(outcome.tsv_path.is_file());
    }
}
