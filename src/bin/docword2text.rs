#![forbid(unsafe_code)]
//! # docword2text
//!
//! Converts a UCI bag-of-words dataset into one text line per document.
//!
//! Given `NAME`, reads `docword.NAME.txt` and `vocab.NAME.txt` and writes
//! `NAME.txt`, all inside `--data-dir`.
//!
//! ## Example
//! ```bash
//! cargo run --release --bin docword2text -- kos --data-dir data/
//! ```

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};
use topic_text::{DatasetPaths, FinalDocument, FormatError, convert_dataset};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Dataset name (e.g. "kos" for docword.kos.txt / vocab.kos.txt)
    name: String,

    /// Directory containing the dataset files
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Write here instead of <data-dir>/<name>.txt
    #[arg(long)]
    output: Option<PathBuf>,

    /// Reproduce the old converter, which never wrote the last document
    #[arg(long, default_value_t = false)]
    legacy_drop_last: bool,
}

fn run(cli: &Cli, last: FinalDocument) -> Result<(usize, PathBuf), FormatError> {
    let mut paths = DatasetPaths::new(&cli.data_dir, &cli.name)?;
    if let Some(output) = &cli.output {
        paths.output = output.clone();
    }
    let n = convert_dataset(&paths, last)?;
    Ok((n, paths.output))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let last = if cli.legacy_drop_last {
        FinalDocument::Drop
    } else {
        FinalDocument::Flush
    };

    match run(&cli, last) {
        Ok((n, output)) => info!("Wrote {} documents to {}", n, output.display()),
        Err(e) => {
            error!("Error converting {}: {}", cli.name, e);
            process::exit(1);
        }
    }
}
