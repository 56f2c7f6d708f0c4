use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use spjall::{
    InputKind, RunConfig, WordTokenizer, collect_class_lines, count_content_words,
    count_lemmas_by_class, count_word_classes, execute_run, extract_audio_batch,
    extract_video_batch, format_hms, scan_wav_lengths, write_frequency_tsv,
};

#[derive(Parser)]
#[command(name = "spjall")]
#[command(author, version, about = "Batch utilities for an ELAN transcription corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    File,
    Dir,
}

impl From<Kind> for InputKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::File => InputKind::File,
            Kind::Dir => InputKind::Directory,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert ELAN transcriptions to an utterance table plus run artifacts
    Parse {
        /// Designate the input as a single file or a directory
        #[arg(short = 't', long, value_enum, default_value_t = Kind::Dir)]
        kind: Kind,

        /// Prepare separate per-speaker files for PoS tagging
        #[arg(short = 'T', long)]
        totag: bool,

        /// Do not create a run directory; write straight into the output path
        #[arg(short, long)]
        no_dir: bool,

        /// Input path: a directory, or one or more .eaf files in file mode
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output directory (in dir mode, the base name run numbers append to)
        #[arg(short, long, default_value = "output/elan-out_")]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Count lemmas of one word class in a tagged file into a sorted table
    CountLemmas {
        /// PoS-tagged, lemmatized input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output .tsv frequency table
        #[arg(short, long)]
        output: PathBuf,

        /// Word-class code to count (tag first character; 's' selects verbs)
        #[arg(short, long, default_value_t = 's')]
        class: char,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Count word-class codes in a tagged file
    CountClasses {
        /// PoS-tagged input file
        #[arg(short, long)]
        input: PathBuf,

        /// Print the lines of one word class instead of counting
        #[arg(long)]
        show_class: Option<char>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Count content words in a tagged file, excluding punctuation
    CountWords {
        /// PoS-tagged input file
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Sum the lengths of the .wav files under a directory
    WavLength {
        /// Directory to scan recursively
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Extract .wav audio from the video files in a directory
    ExtractAudio {
        /// Directory holding the source video files
        #[arg(short, long)]
        input: PathBuf,

        /// Directory the .wav files are written to
        #[arg(short, long)]
        output: PathBuf,

        /// Extension of the source video files
        #[arg(short, long, default_value = "mp4")]
        extension: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert .MOD camera files to .mov and extract .wav audio
    ExtractVideo {
        /// Directory holding the .MOD source files
        #[arg(short, long)]
        input: PathBuf,

        /// Directory the per-file output directories are created in
        #[arg(short, long)]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            kind,
            totag,
            no_dir,
            input,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            run_parse(input, kind, output, totag, no_dir)
        }
        Commands::CountLemmas {
            input,
            output,
            class,
            verbose,
        } => {
            setup_logging(verbose);
            run_count_lemmas(input, output, class)
        }
        Commands::CountClasses {
            input,
            show_class,
            verbose,
        } => {
            setup_logging(verbose);
            run_count_classes(input, show_class)
        }
        Commands::CountWords { input, verbose } => {
            setup_logging(verbose);
            run_count_words(input)
        }
        Commands::WavLength { input, verbose } => {
            setup_logging(verbose);
            run_wav_length(input)
        }
        Commands::ExtractAudio {
            input,
            output,
            extension,
            verbose,
        } => {
            setup_logging(verbose);
            run_extract_audio(input, output, extension).await
        }
        Commands::ExtractVideo {
            input,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            run_extract_video(input, output).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn run_parse(
    input: Vec<PathBuf>,
    kind: Kind,
    output: PathBuf,
    totag: bool,
    no_dir: bool,
) -> Result<()> {
    let config = RunConfig {
        inputs: input,
        kind: kind.into(),
        output_base: output,
        prepare_totag: totag,
        create_run_dir: !no_dir,
    };

    let outcome = execute_run(&config, &WordTokenizer)?;
    info!(
        "Complete: {} records written to {}",
        outcome.record_count,
        outcome.run_dir.display()
    );
    Ok(())
}

fn run_count_lemmas(input: PathBuf, output: PathBuf, class: char) -> Result<()> {
    let reader = open_input(&input)?;
    let table = count_lemmas_by_class(reader, class)?;
    info!("Counted {} distinct lemmas of class '{}'", table.len(), class);

    write_frequency_tsv(&output, &table.into_sorted())?;
    info!("Frequency table written to {}", output.display());
    Ok(())
}

fn run_count_classes(input: PathBuf, show_class: Option<char>) -> Result<()> {
    let reader = open_input(&input)?;

    match show_class {
        Some(class) => {
            for line in collect_class_lines(reader, class)? {
                println!("{line}");
            }
        }
        None => {
            for (class, count) in count_word_classes(reader)?.into_sorted() {
                println!("{class}\t{count}");
            }
        }
    }
    Ok(())
}

fn run_count_words(input: PathBuf) -> Result<()> {
    let reader = open_input(&input)?;
    println!("{}", count_content_words(reader)?);
    Ok(())
}

fn run_wav_length(input: PathBuf) -> Result<()> {
    let scan = scan_wav_lengths(&input)?;
    info!("Scanned {} .wav files", scan.files.len());

    println!("total length = {} hours", scan.total_seconds / 3600.0);
    println!("{}", format_hms(scan.total_seconds));
    Ok(())
}

async fn run_extract_audio(input: PathBuf, output: PathBuf, extension: String) -> Result<()> {
    let outcome = extract_audio_batch(&input, &output, &extension).await?;
    info!(
        "Extraction complete: {} converted, {} failed",
        outcome.converted, outcome.failed
    );
    Ok(())
}

async fn run_extract_video(input: PathBuf, output: PathBuf) -> Result<()> {
    let outcome = extract_video_batch(&input, &output).await?;
    info!(
        "Conversion complete: {} converted, {} failed, {} skipped",
        outcome.converted, outcome.failed, outcome.skipped
    );
    Ok(())
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open input file: {}", path.display()))?;
    Ok(BufReader::new(file))
}
