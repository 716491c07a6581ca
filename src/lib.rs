#![forbid(unsafe_code)]
//! # topic_text
//!
//! Turns the numeric files around an LDA run into something a person can read:
//!
//! - [`corpus`]: a UCI-style `docword` corpus plus its vocabulary becomes one
//!   line of `term count` tokens per document.
//! - [`topics`]: a topic-word weight matrix becomes, per topic, the list of
//!   terms with weight above [`RETENTION_THRESHOLD`], heaviest first.
//!
//! Both are exposed as binaries (`docword2text`, `view_model`); the library
//! holds the parsing, grouping and ranking so it can be tested without files.
//!
//! ## Example
//! ```
//! use topic_text::{DocwordCorpus, FinalDocument, Vocabulary};
//! let vocab = Vocabulary::from_lines(["cat", "dog", "fish"]);
//! let corpus = DocwordCorpus::parse("2\n3\n4\n1 1 5\n1 2 2\n2 3 7\n2 1 1\n").unwrap();
//! let docs = corpus.convert(&vocab, FinalDocument::Flush).unwrap();
//! assert_eq!(docs[0].to_string(), "cat 5 dog 2 ");
//! assert_eq!(docs[1].to_string(), "fish 7 cat 1 ");
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub mod corpus;
pub mod error;
pub mod export;
pub mod topics;
pub mod vocab;

pub use corpus::{
    CorpusHeader, DocumentLine, DocwordCorpus, FinalDocument, SparseTriple, write_documents,
};
pub use error::{FormatError, Result};
pub use export::{ExportFormat, csv_safe_cell, export_topics, format_weight};
pub use topics::{RETENTION_THRESHOLD, RankedTerm, RankedTopic, TopicWeightMatrix};
pub use vocab::Vocabulary;

/// File locations for one named docword dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub docword: PathBuf,
    pub vocab: PathBuf,
    pub output: PathBuf,
}

impl DatasetPaths {
    /// `docword.<name>.txt`, `vocab.<name>.txt` and `<name>.txt` inside `dir`.
    ///
    /// An empty name is a usage error.
    /// # Example
    /// ```
    /// use topic_text::DatasetPaths;
    /// use std::path::Path;
    /// let p = DatasetPaths::new(Path::new("data"), "kos").unwrap();
    /// assert!(DatasetPaths::new(Path::new("data"), " ").is_err());
    /// assert_eq!(p.docword, Path::new("data/docword.kos.txt"));
    /// assert_eq!(p.vocab, Path::new("data/vocab.kos.txt"));
    /// assert_eq!(p.output, Path::new("data/kos.txt"));
    /// ```
    pub fn new(dir: &Path, name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(FormatError::Usage("dataset name must not be empty".to_string()));
        }
        Ok(DatasetPaths {
            docword: dir.join(format!("docword.{name}.txt")),
            vocab: dir.join(format!("vocab.{name}.txt")),
            output: dir.join(format!("{name}.txt")),
        })
    }
}

/// Converts a docword dataset to text.
///
/// Inputs are read fully and validated before the output file is created, so
/// a failed run leaves no output behind. Returns the number of documents written.
pub fn convert_dataset(paths: &DatasetPaths, last: FinalDocument) -> Result<usize> {
    let vocab_text = std::fs::read_to_string(&paths.vocab)?;
    let vocab = Vocabulary::from_lines(vocab_text.lines());
    let corpus = DocwordCorpus::parse(&std::fs::read_to_string(&paths.docword)?)?;
    let docs = corpus.convert(&vocab, last)?;

    let mut out = BufWriter::new(File::create(&paths.output)?);
    write_documents(&docs, &mut out)?;
    Ok(docs.len())
}

/// Reads a model file and ranks every topic.
pub fn rank_model_file(model: &Path) -> Result<Vec<RankedTopic>> {
    let text = std::fs::read_to_string(model)?;
    let matrix = TopicWeightMatrix::from_lines(text.lines())?;
    Ok(matrix.rank_all())
}
