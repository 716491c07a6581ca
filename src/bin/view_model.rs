#![forbid(unsafe_code)]
//! # view_model
//!
//! Prints a trained topic-word matrix as ranked term lists, one block per topic.
//!
//! ## Example
//! ```bash
//! cargo run --release --bin view_model -- lda_model.txt model_view.txt
//! cargo run --release --bin view_model -- lda_model.txt - --export-format json
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};
use topic_text::{ExportFormat, FormatError, export_topics, rank_model_file};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Model file: one `term<TAB>weights` line per term
    model: PathBuf,

    /// Where to write the readable view ("-" for stdout)
    viewable: PathBuf,

    /// Output format (txt, csv, json)
    #[arg(long, default_value = "txt")]
    export_format: ExportFormat,
}

fn run(cli: &Cli) -> Result<usize, FormatError> {
    let ranked = rank_model_file(&cli.model)?;
    let mut sink: Box<dyn Write> = if cli.viewable.as_os_str() == "-" {
        Box::new(io::stdout().lock())
    } else {
        Box::new(BufWriter::new(File::create(&cli.viewable)?))
    };
    export_topics(&ranked, cli.export_format, &mut sink)?;
    Ok(ranked.len())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(n) => info!("Wrote {} topics to {}", n, cli.viewable.display()),
        Err(e) => {
            error!("Error viewing {}: {}", cli.model.display(), e);
            process::exit(1);
        }
    }
}
