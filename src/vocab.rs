use log::debug;

/// Ordered term list. Position `i` (0-based) holds the term with corpus index `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    /// Builds the vocabulary from one term per line, trimming each line.
    ///
    /// Order is preserved and duplicates are kept.
    /// # Example
    /// ```
    /// use topic_text::Vocabulary;
    /// let vocab = Vocabulary::from_lines(" cat\ndog \nfish\n".lines());
    /// assert_eq!(vocab.len(), 3);
    /// assert_eq!(vocab.term(1), Some("cat"));
    /// assert_eq!(vocab.term(0), None);
    /// ```
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let terms: Vec<String> = lines.into_iter().map(|l| l.trim().to_string()).collect();
        debug!("Loaded vocabulary of {} terms: {:?}", terms.len(), terms);
        Vocabulary { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Resolves a 1-based corpus term index.
    pub fn term(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.terms.get(i))
            .map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
