//! Topic-word matrices as written by the LDA trainer: one line per term,
//! `term<TAB>w0 w1 ... wN-1` with one weight per topic.

use std::collections::HashMap;

use log::{debug, info};
use serde::Serialize;

use crate::error::{FormatError, Result};

/// Weights at or below this value are not retained for a topic.
pub const RETENTION_THRESHOLD: f64 = 1.0;

/// Retained weights per topic, built in one pass over the model file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicWeightMatrix {
    topics: Vec<HashMap<String, f64>>,
    totals: Vec<f64>,
    term_sums: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTerm {
    pub term: String,
    pub weight: f64,
}

/// One topic's retained terms, heaviest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTopic {
    pub topic: usize,
    /// Sum of the retained weights.
    pub total: f64,
    pub terms: Vec<RankedTerm>,
}

fn parse_weights(field: &str, line: usize) -> Result<Vec<f64>> {
    field
        .split_whitespace()
        .map(|w| {
            w.parse::<f64>()
                .map_err(|_| FormatError::malformed(line, format!("weight is not a number: {w:?}")))
        })
        .collect()
}

impl TopicWeightMatrix {
    /// Reads model rows. The first row fixes the topic count; every later
    /// row must carry exactly as many weights.
    ///
    /// Blank lines are skipped. A repeated term overwrites its earlier weight
    /// in a topic, but both occurrences count towards the totals.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut matrix = TopicWeightMatrix::default();
        let mut rows = 0usize;

        for (idx, raw) in lines.into_iter().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let mut fields = raw.split('\t');
            let term = fields.next().unwrap_or_default();
            let weights = fields
                .next()
                .ok_or_else(|| FormatError::malformed(line, "expected term<TAB>weights"))?;
            let weights = parse_weights(weights, line)?;

            if rows == 0 {
                if weights.is_empty() {
                    return Err(FormatError::malformed(line, "first row has no topic weights"));
                }
                matrix.topics = vec![HashMap::new(); weights.len()];
                matrix.totals = vec![0.0; weights.len()];
                debug!("Model has {} topics", weights.len());
            } else if weights.len() != matrix.num_topics() {
                return Err(FormatError::malformed(
                    line,
                    format!(
                        "expected {} weights, found {}",
                        matrix.num_topics(),
                        weights.len()
                    ),
                ));
            }
            rows += 1;

            for (topic, &w) in weights.iter().enumerate() {
                if w > RETENTION_THRESHOLD {
                    matrix.topics[topic].insert(term.to_string(), w);
                    matrix.totals[topic] += w;
                    *matrix.term_sums.entry(term.to_string()).or_insert(0.0) += w;
                }
            }
        }

        info!(
            "Read {} model rows, {} topics, {} distinct retained terms",
            rows,
            matrix.num_topics(),
            matrix.term_sums.len()
        );
        Ok(matrix)
    }

    pub fn num_topics(&self) -> usize {
        self.topics.len()
    }

    /// Retained weight of `term` in `topic`.
    pub fn weight(&self, topic: usize, term: &str) -> Option<f64> {
        self.topics.get(topic)?.get(term).copied()
    }

    pub fn topic_total(&self, topic: usize) -> Option<f64> {
        self.totals.get(topic).copied()
    }

    /// Sum of a term's retained weights over all topics.
    pub fn term_sum(&self, term: &str) -> Option<f64> {
        self.term_sums.get(term).copied()
    }

    pub fn term_sums(&self) -> &HashMap<String, f64> {
        &self.term_sums
    }

    /// Retained terms of `topic` by weight descending, ties broken by term
    /// descending (reverse lexicographic).
    pub fn rank_topic(&self, topic: usize) -> Option<RankedTopic> {
        let weights = self.topics.get(topic)?;
        let mut terms: Vec<RankedTerm> = weights
            .iter()
            .map(|(term, &weight)| RankedTerm {
                term: term.clone(),
                weight,
            })
            .collect();
        terms.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| b.term.cmp(&a.term))
        });
        Some(RankedTopic {
            topic,
            total: self.totals[topic],
            terms,
        })
    }

    /// [`rank_topic`](Self::rank_topic) for every topic in index order.
    pub fn rank_all(&self) -> Vec<RankedTopic> {
        (0..self.num_topics())
            .filter_map(|t| self.rank_topic(t))
            .collect()
    }
}
