//! UCI "docword" bag-of-words corpora.
//!
//! File layout: three header lines (document count, term count, number of
//! nonzero entries) followed by `doc-id term-index count` triples. Triples of
//! one document must be adjacent and document ids must never decrease; the
//! converter groups on adjacency and does not sort.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use log::{info, trace, warn};

use crate::error::{FormatError, Result};
use crate::vocab::Vocabulary;

/// The three header lines of a docword file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusHeader {
    pub documents: usize,
    pub terms: usize,
    /// Declared number of triples. Only used for a warning.
    pub nonzeros: usize,
}

/// One nonzero entry of the document-term matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseTriple {
    pub doc_id: u64,
    /// 1-based index into the vocabulary.
    pub term_index: usize,
    pub count: u64,
    /// 1-based line number in the source file.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocwordCorpus {
    pub header: CorpusHeader,
    pub triples: Vec<SparseTriple>,
}

/// What to do with the document still buffered when the triples run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalDocument {
    /// Emit it like every other document.
    #[default]
    Flush,
    /// Reproduce the old converter, which silently lost the last document.
    Drop,
}

/// All `(term, count)` pairs of one document, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine {
    pub doc_id: u64,
    pub tokens: Vec<(String, u64)>,
}

impl fmt::Display for DocumentLine {
    /// `term count ` per token, trailing space included.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (term, count) in &self.tokens {
            write!(f, "{term} {count} ")?;
        }
        Ok(())
    }
}

fn parse_field<T: FromStr>(field: &str, line: usize, what: &str) -> Result<T> {
    field
        .parse()
        .map_err(|_| FormatError::malformed(line, format!("{what} is not an integer: {field:?}")))
}

fn parse_triple(raw: &str, line: usize) -> Result<SparseTriple> {
    let mut fields = raw.split_whitespace();
    let mut next = |what: &str| {
        fields
            .next()
            .ok_or_else(|| FormatError::malformed(line, format!("missing {what}")))
    };
    let (d, w, c) = (next("document id")?, next("term index")?, next("count")?);
    let triple = SparseTriple {
        doc_id: parse_field(d, line, "document id")?,
        term_index: parse_field(w, line, "term index")?,
        count: parse_field(c, line, "count")?,
        line,
    };
    if triple.term_index == 0 {
        return Err(FormatError::malformed(line, "term index must be at least 1"));
    }
    if triple.count == 0 {
        return Err(FormatError::malformed(line, "count must be positive"));
    }
    Ok(triple)
}

impl DocwordCorpus {
    /// Parses a whole docword file held in memory.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
        let mut header_field = |what: &str| -> Result<usize> {
            match lines.next() {
                Some((n, l)) => parse_field(l.trim(), n, what),
                None => Err(FormatError::malformed(0, format!("missing header line: {what}"))),
            }
        };
        let header = CorpusHeader {
            documents: header_field("document count")?,
            terms: header_field("term count")?,
            nonzeros: header_field("nonzero count")?,
        };

        let triples = lines
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(n, l)| parse_triple(l, n))
            .collect::<Result<Vec<_>>>()?;

        if triples.len() != header.nonzeros {
            warn!(
                "Header declares {} nonzero entries, found {}",
                header.nonzeros,
                triples.len()
            );
        }
        Ok(DocwordCorpus { header, triples })
    }

    /// Fails unless the declared term count matches the vocabulary length.
    pub fn check_vocabulary(&self, vocab: &Vocabulary) -> Result<()> {
        if self.header.terms != vocab.len() {
            return Err(FormatError::Consistency {
                declared: self.header.terms,
                actual: vocab.len(),
            });
        }
        Ok(())
    }

    /// Groups adjacent triples into one [`DocumentLine`] per document id.
    ///
    /// Nothing is produced unless the whole corpus is consistent with `vocab`.
    pub fn convert(&self, vocab: &Vocabulary, last: FinalDocument) -> Result<Vec<DocumentLine>> {
        self.check_vocabulary(vocab)?;

        let resolve = |t: &SparseTriple| -> Result<(String, u64)> {
            let term = vocab.term(t.term_index).ok_or_else(|| {
                FormatError::malformed(
                    t.line,
                    format!(
                        "term index {} outside vocabulary of {} terms",
                        t.term_index,
                        vocab.len()
                    ),
                )
            })?;
            Ok((term.to_string(), t.count))
        };

        let mut out = Vec::with_capacity(self.header.documents.min(self.triples.len()));
        let mut triples = self.triples.iter();
        let Some(first) = triples.next() else {
            return Ok(out);
        };
        let mut current = DocumentLine {
            doc_id: first.doc_id,
            tokens: vec![resolve(first)?],
        };

        for t in triples {
            trace!("line {}: {:?}", t.line, t);
            if t.doc_id == current.doc_id {
                current.tokens.push(resolve(t)?);
                continue;
            }
            if t.doc_id < current.doc_id {
                return Err(FormatError::malformed(
                    t.line,
                    format!(
                        "document id {} after {}: triples of a document must be adjacent and ids ascending",
                        t.doc_id, current.doc_id
                    ),
                ));
            }
            let next = DocumentLine {
                doc_id: t.doc_id,
                tokens: vec![resolve(t)?],
            };
            out.push(std::mem::replace(&mut current, next));
        }

        match last {
            FinalDocument::Flush => out.push(current),
            FinalDocument::Drop => warn!("Dropping final document {}", current.doc_id),
        }

        if out.len() != self.header.documents {
            warn!(
                "Header declares {} documents, emitting {}",
                self.header.documents,
                out.len()
            );
        }
        info!("Converted {} triples into {} documents", self.triples.len(), out.len());
        Ok(out)
    }
}

/// Writes one line per document to `sink`.
pub fn write_documents<W: Write>(docs: &[DocumentLine], sink: &mut W) -> Result<()> {
    for doc in docs {
        writeln!(sink, "{doc}")?;
    }
    sink.flush()?;
    Ok(())
}
